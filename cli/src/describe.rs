use clap::Args;

use crate::error::Result;
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the JWK or JWKS file. If not specified, reads from stdin
    file: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let json = read_input(config.file.as_deref())?;
    println!("{}", jwk::describe(&json)?);
    Ok(())
}
