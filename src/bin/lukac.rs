use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use clap::Parser as ClapParser;
use colored::Colorize;
use log::{error, LevelFilter};
use lukac::error::ExitCode;
use lukac::logger::Logger;

/// Compiler front-end driver: lex, parse, resolve, fill, check. Codegen
/// and linking are an external toolchain's job (spec §1) — the flags
/// below are accepted and recorded but a `CodegenBackend` is what would
/// actually act on them.
#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Source file to compile.
    file: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Repeatable; each occurrence raises verbosity by one level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short = 'O', long, default_value_t = 0)]
    opt_level: u8,

    #[arg(long)]
    emit_bitcode: bool,

    #[arg(short = 'c', long)]
    compile_only: bool,

    #[arg(short = 'S', long)]
    assemble_only: bool,

    #[arg(long)]
    no_link: bool,
}

fn main() -> ProcessExitCode {
    let args = Cli::parse();

    let log_path = std::env::temp_dir().join("luka.log");
    let verbosity = args.verbose as usize;
    match Logger::initialize(&log_path, verbosity) {
        Ok(logger) => {
            let level = if verbosity > 0 { LevelFilter::Debug } else { LevelFilter::Info };
            if logger.install(level).is_err() {
                eprintln!("logger already installed");
            }
        }
        Err(e) => eprintln!("warning: could not open log file '{}': {e}", log_path.display()),
    }

    if args.opt_level > 3 {
        error!("opt-level must be between 0 and 3, got {}", args.opt_level);
        return exit_with(ExitCode::WrongParameters);
    }

    match lukac::compile_file(&args.file) {
        Ok(_module) => exit_with(ExitCode::Success),
        Err(e) => {
            error!("{e}");
            eprintln!("{}: {e}", "error".red().bold());
            exit_with(e.exit_code())
        }
    }
}

fn exit_with(code: ExitCode) -> ProcessExitCode {
    ProcessExitCode::from(code as i32 as u8)
}
