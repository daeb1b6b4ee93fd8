use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use jwk::{Format, Options};
use log::info;

use crate::error::Result;
use crate::utils::{default_file_name, read_input};

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// X.509 SubjectPublicKeyInfo (PUBLIC KEY)
    Spki,
    /// PKCS#1 RSAPublicKey (RSA PUBLIC KEY), RSA keys only
    Pkcs1,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Spki => Format::Spki,
            OutputFormat::Pkcs1 => Format::Pkcs1,
        }
    }
}

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the JWK or JWKS file. If not specified, reads from stdin
    file: Option<String>,

    /// Write the PEM to this file instead of stdout
    #[arg(short, long, conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write the PEM to jwk_<YYYY-MM-DD>.pem in the current directory
    #[arg(long)]
    save: bool,

    /// Output structure
    #[arg(short, long, value_enum, default_value = "spki")]
    format: OutputFormat,

    /// Reject EC coordinates that are not exactly the curve's field size
    #[arg(long)]
    strict: bool,
}

impl Config {
    fn options(&self) -> Options {
        Options {
            format: self.format.into(),
            strict_coordinates: self.strict,
        }
    }

    fn destination(&self) -> Option<PathBuf> {
        if self.save {
            return Some(PathBuf::from(default_file_name(
                Local::now().date_naive(),
            )));
        }
        self.output.clone()
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let json = read_input(config.file.as_deref())?;
    let pem = jwk::convert_with(&json, &config.options())?;

    match config.destination() {
        Some(path) => {
            fs::write(&path, format!("{pem}\n"))?;
            info!("wrote {}", path.display());
        }
        None => println!("{pem}"),
    }

    Ok(())
}
