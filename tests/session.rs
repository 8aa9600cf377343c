mod common;

#[cfg(test)]
mod session_tests {
    use pretty_assertions::assert_eq;

    use rox::error::LoxError;
    use rox::reporter::{EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

    use super::common::{run, session};

    #[test]
    fn test_state_persists_between_runs() {
        let (mut lox, buffer) = session();

        lox.run(b"var greeting = \"hello\";");
        lox.run(b"fun shout(s) { return s + \"!\"; }");
        lox.run(b"{ var local = shout(greeting); print local; }");

        assert!(lox.reporter().diagnostics().is_empty());
        assert_eq!(buffer.lines(), ["hello!"]);
    }

    #[test]
    fn test_closures_from_earlier_runs_keep_their_resolution() {
        let (mut lox, buffer) = session();

        lox.run(b"fun make() { var n = 0; fun next() { n = n + 1; return n; } return next; }");
        lox.run(b"var next = make();");
        lox.run(b"next();");
        lox.run(b"print next();");

        assert_eq!(buffer.lines(), ["2"]);
    }

    #[test]
    fn test_session_recovers_after_reset() {
        let (mut lox, buffer) = session();

        lox.run(b"print nil + 1;");
        assert_eq!(lox.reporter().exit_code(), Some(EXIT_RUNTIME_ERROR));

        lox.reporter_mut().reset();
        lox.run(b"print \"still alive\";");

        assert_eq!(lox.reporter().exit_code(), None);
        assert_eq!(buffer.lines(), ["still alive"]);
    }

    #[test]
    fn test_clean_program_has_no_exit_code() {
        let outcome = run("print 1;");

        assert_eq!(outcome.output, ["1"]);
        assert_eq!(outcome.exit_code, None);
    }

    #[test]
    fn test_lex_errors_are_reported_and_block_execution() {
        let outcome = run("print 1;\nvar @ = 2;");

        assert!(outcome.output.is_empty());
        assert_eq!(outcome.exit_code, Some(EXIT_STATIC_ERROR));
        assert_eq!(
            outcome.diagnostics.first().map(String::as_str),
            Some("[line 2] Error: Unexpected character.")
        );
    }

    #[test]
    fn test_parse_errors_exit_65() {
        let outcome = run("print (1;");

        assert!(outcome.output.is_empty());
        assert_eq!(outcome.exit_code, Some(EXIT_STATIC_ERROR));
        assert_eq!(
            outcome.diagnostics,
            ["[line 1] Error at ';': Expected ')' after expression"]
        );
    }

    #[test]
    fn test_runtime_errors_exit_70() {
        let (mut lox, _buffer) = session();
        lox.run(b"undefinedFunction();");

        assert_eq!(lox.reporter().exit_code(), Some(EXIT_RUNTIME_ERROR));
        assert!(lox.reporter().had_runtime_error());
        assert!(!lox.reporter().had_error());
        assert!(matches!(
            lox.reporter().diagnostics(),
            [LoxError::Runtime(_)]
        ));
    }
}
