use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};

mod convert;
mod describe;
mod dump;
mod error;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "jwkpem")]
#[command(about = "Convert JSON Web Keys to PEM public keys", long_about = None)]
struct Cli {
    /// Enable debug logging (otherwise controlled by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JWK or JWKS to a PEM public key
    Convert {
        #[command(flatten)]
        config: convert::Config,
    },
    /// Print the key type (and curve) of a JWK or JWKS
    Describe {
        #[command(flatten)]
        config: describe::Config,
    },
    /// Convert and print the resulting DER structure
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert { config } => convert::execute(config),
        Commands::Describe { config } => describe::execute(config),
        Commands::Dump { config } => dump::execute(config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
