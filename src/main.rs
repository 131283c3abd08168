// sysyc: SysY front end driver

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};

use sysyc::parser::lexer::Lexer;

#[derive(Parser)]
#[command(name = "sysyc", version, about = "Parse and statically check a SysY program")]
struct Cli {
    /// Source file path
    file: PathBuf,

    /// What to print once the file checks cleanly
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Repeat for more log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// The raw token stream
    Tokens,
    /// The syntax tree before checking
    Ast,
    /// The annotated and folded syntax tree
    Checked,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over the flag
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => fail(format!("cannot read '{}': {}", cli.file.display(), e)),
    };
    info!("read {} bytes from {}", source.len(), cli.file.display());

    match cli.emit {
        Some(Emit::Tokens) => {
            let tokens = Lexer::new(&source).tokenize();
            println!("{:#?}", tokens);
        }
        Some(Emit::Ast) => match sysyc::parse(&source) {
            Ok(program) => println!("{:#?}", program),
            Err(e) => fail(e),
        },
        Some(Emit::Checked) => match sysyc::compile(&source) {
            Ok(checked) => println!("{:#?}", checked.program),
            Err(e) => fail(e),
        },
        None => match sysyc::compile(&source) {
            Ok(checked) => {
                let globals = checked.program.globals().count();
                let functions = checked.program.functions().count();
                println!(
                    "{}: ok ({} global declaration(s), {} function(s))",
                    cli.file.display(),
                    globals,
                    functions
                );
            }
            Err(e) => fail(e),
        },
    }
}
