use std::fs::File;
use std::io::{self, BufRead, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::interpreter::Interpreter;
use rox::lox::Lox;
use rox::parser::Parser;
use rox::reporter::{EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};
use rox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints the AST of each statement
    Parse { filename: PathBuf },

    /// Evaluates a file holding a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Script contents, memory-mapped when non-empty.
enum Source {
    Mapped(Mmap),
    Empty,
}

impl Deref for Source {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Source::Mapped(map) => map,
            Source::Empty => &[],
        }
    }
}

fn read_file(filename: &Path) -> Result<Source> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", filename))?
        .len();

    if len == 0 {
        return Ok(Source::Empty);
    }

    // SAFETY: the mapping is read once, start to finish, before the process
    // does anything else with the file.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    info!("Mapped {} bytes from {:?}", map.len(), filename);

    Ok(Source::Mapped(map))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let (tokens, errors) = Scanner::new(&source).scan_all();

    for e in &errors {
        eprintln!("{}", e);
    }

    if json {
        let rendered = serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
        println!("{}", rendered);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if !errors.is_empty() {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_all();

    let mut failed = !lex_errors.is_empty();
    for e in lex_errors {
        eprintln!("{}", e);
    }

    let printer = AstPrinter;

    for stmt in Parser::new(tokens) {
        match stmt {
            Ok(stmt) => println!("{}", printer.print_stmt(&stmt)),
            Err(e) => {
                failed = true;
                eprintln!("{}", e);
            }
        }
    }

    if failed {
        process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn evaluate(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_all();

    if let Some(e) = lex_errors.first() {
        eprintln!("{}", e);
        process::exit(EXIT_STATIC_ERROR);
    }

    let expr = match Parser::new(tokens).parse_expression() {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_STATIC_ERROR);
        }
    };

    match Interpreter::new().evaluate(&expr) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_RUNTIME_ERROR);
        }
    }

    Ok(())
}

fn run(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    lox.run(&source);

    for diagnostic in lox.reporter().diagnostics() {
        eprintln!("{}", diagnostic);
    }

    if let Some(code) = lox.reporter().exit_code() {
        debug!("Exiting with code {}", code);
        process::exit(code);
    }

    info!("Program executed successfully");
    Ok(())
}

fn repl() -> Result<()> {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        line.clear();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?
            == 0
        {
            break;
        }

        lox.run(line.as_bytes());

        for diagnostic in lox.reporter().diagnostics() {
            eprintln!("{}", diagnostic);
        }
        lox.reporter_mut().reset();
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(&filename, json),
        Some(Commands::Parse { filename }) => parse(&filename),
        Some(Commands::Evaluate { filename }) => evaluate(&filename),
        Some(Commands::Run { filename }) => run(&filename),
        Some(Commands::Repl) | None => repl(),
    }
}
