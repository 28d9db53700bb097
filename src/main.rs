//! sqlmap CLI
//!
//! Usage:
//!   sqlmap check <MAPPER>
//!   sqlmap render <MAPPER> <METHOD> [--arg FILE]...
//!
//! Options:
//!   -v, --verbose  Log resolution details to stderr
//!   -h, --help     Print help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sqlmap::config::load_argument;
use sqlmap::{MapperConfig, RegisterError};

#[derive(Parser)]
#[command(name = "sqlmap")]
#[command(about = "Compile and render named SQL statement templates")]
struct Cli {
    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every statement in a mapper file and report malformed templates
    Check {
        /// Mapper file (TOML format)
        mapper: PathBuf,
    },

    /// Render one statement with argument objects loaded from TOML files
    Render {
        /// Mapper file (TOML format)
        mapper: PathBuf,

        /// Statement method name
        method: String,

        /// Argument object file (TOML, tags under `[_meta]`); repeat for several arguments
        #[arg(short, long = "arg")]
        args: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Command::Check { mapper } => check(&mapper),
        Command::Render {
            mapper,
            method,
            args,
        } => render(&mapper, &method, &args),
    };
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_mapper(path: &Path) -> Option<MapperConfig> {
    match MapperConfig::from_file(path) {
        Ok(mapper) => Some(mapper),
        Err(e) => {
            eprintln!("Error loading mapper '{}': {}", path.display(), e);
            None
        }
    }
}

fn check(path: &Path) -> i32 {
    let Some(mapper) = load_mapper(path) else {
        return 1;
    };

    let failures = mapper.check();
    for failure in &failures {
        match failure {
            RegisterError::Pattern(e) => eprint!("{}", e.format()),
            other => eprintln!("Error: {}", other),
        }
    }

    if failures.is_empty() {
        println!("{} statement(s) OK", mapper.statements.len());
        0
    } else {
        eprintln!("{} of {} statement(s) failed", failures.len(), mapper.statements.len());
        1
    }
}

fn render(path: &Path, method: &str, arg_paths: &[PathBuf]) -> i32 {
    let Some(mapper) = load_mapper(path) else {
        return 1;
    };

    let dao = match mapper.into_dao() {
        Ok(dao) => dao,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut args = Vec::with_capacity(arg_paths.len());
    for arg_path in arg_paths {
        match load_argument(arg_path) {
            Ok(arg) => args.push(arg),
            Err(e) => {
                eprintln!("Error loading argument '{}': {}", arg_path.display(), e);
                return 1;
            }
        }
    }

    let arg_refs: Vec<_> = args.iter().collect();
    match dao.render(method, &arg_refs) {
        Ok(sql) => {
            println!("{}", sql);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
