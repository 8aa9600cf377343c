//! Stack growth for deeply recursive Lox programs.
//!
//! Every Lox call nests several Rust frames (`evaluate`, `execute`,
//! `execute_block`, `call`). Wrapping each call in [`ensure_sufficient_stack`]
//! moves evaluation onto a fresh heap-allocated segment when the native stack
//! runs low, so recursion depth is bounded by the interpreter's own limit and
//! not by the thread's stack size.

/// Grow when less than this much stack remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_recursion_does_not_overflow() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(100_000), 100_000);
    }
}
