use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Jwk(#[from] jwk::Error),

    #[error("PEM decode error: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("DER decode error: {0}")]
    Der(#[from] der::error::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
