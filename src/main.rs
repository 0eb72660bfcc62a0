// cfront: tokenize or parse an expression file and print the result

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use crossterm::style::{Color, Stylize};
use log::{Level, LevelFilter, Log, Metadata, Record};

use cfront::parser::lexer::Tokenizer;
use cfront::parser::lexicon::Lexicon;
use cfront::parser::parse::Parser;
use cfront::parser::registry::{TypeInfo, TypeRegistry};
use cfront::parser::token::{Token, TokenKind};

/// Command-line options.
#[derive(Debug, Default, PartialEq)]
struct Config {
    tokens: bool,
    types: Vec<String>,
    file: PathBuf,
}

impl Config {
    fn from_args(args: &[String]) -> Result<Config, String> {
        let mut config = Config::default();
        let mut file = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--tokens" => config.tokens = true,
                "--type" => match iter.next() {
                    Some(name) => config.types.push(name.clone()),
                    None => return Err("--type requires a type name".to_string()),
                },
                flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
                path if file.is_none() => file = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument '{extra}'")),
            }
        }
        config.file = file.ok_or_else(|| "no input file provided".to_string())?;
        Ok(config)
    }

    fn lexicon(&self) -> Lexicon {
        let registry = self
            .types
            .iter()
            .fold(TypeRegistry::primitives(), |registry, name| {
                registry.with_type(TypeInfo::new(name.as_str()))
            });
        Lexicon::new(registry)
    }
}

/// Minimal stderr logger; level comes from `CFRONT_LOG`.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR".red(),
            Level::Warn => "WARN".yellow(),
            Level::Info => "INFO".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".dark_grey(),
        };
        eprintln!("{level} {}: {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

fn init_logging() {
    let level = std::env::var("CFRONT_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {program_name} [--tokens] [--type NAME]... <file>");
    eprintln!();
    eprintln!("  --tokens      Print the token stream instead of the expression tree");
    eprintln!("  --type NAME   Register NAME as a type (repeatable)");
    eprintln!();
    eprintln!("Set CFRONT_LOG=debug or CFRONT_LOG=trace for diagnostics.");
}

fn kind_color(token: &Token) -> Color {
    if token.is_error() {
        return Color::Red;
    }
    match token.kind {
        TokenKind::Keyword => Color::Magenta,
        TokenKind::Identifier => Color::Cyan,
        TokenKind::Operator => Color::White,
        TokenKind::Int | TokenKind::Float => Color::Yellow,
        TokenKind::Char | TokenKind::String => Color::Green,
    }
}

fn dump_tokens(tokenizer: &mut Tokenizer<'_, File>) -> Result<bool, Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    let mut clean = true;
    while let Some(token) = tokenizer.next_token()? {
        clean &= !token.is_error();
        writeln!(stdout, "{}", token.to_string().with(kind_color(&token)))?;
    }
    Ok(clean)
}

fn run(config: &Config) -> Result<bool, Box<dyn std::error::Error>> {
    let lexicon = config.lexicon();
    let file = File::open(&config.file)
        .map_err(|e| format!("cannot open '{}': {e}", config.file.display()))?;
    let mut tokenizer = Tokenizer::new(file, &lexicon);

    if config.tokens {
        return dump_tokens(&mut tokenizer);
    }

    let tree = Parser::new(tokenizer).parse()?;
    print!("{}", tree.root.render_tree());
    println!("{}", tree.root.to_string().bold());
    Ok(true)
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("cfront");
    let config = match Config::from_args(args.get(1..).unwrap_or_default()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{} {message}", "error:".red().bold());
            eprintln!();
            print_usage(program_name);
            process::exit(2);
        }
    };

    match run(&config) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            process::exit(1);
        }
    }
}
