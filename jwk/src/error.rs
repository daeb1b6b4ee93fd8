//! Error types for JWK conversion.

use thiserror::Error;

use crate::Format;
use crate::algorithm::NamedCurve;
use crate::key::KeyType;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a whole conversion request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The input parsed but does not hold a usable key object
    #[error("invalid JWK: {0}")]
    InvalidKey(String),

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("{kty} key missing required parameters ({params})")]
    MissingParameter { kty: KeyType, params: &'static str },

    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    #[error("{kty} key cannot be written as {format}")]
    UnsupportedFormat { kty: KeyType, format: Format },

    #[error("failed to convert: {0}")]
    Conversion(#[from] ConversionError),
}

/// Failure while assembling DER from an already resolved key.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid base64 encoding in `{parameter}`: {source}")]
    Decode {
        parameter: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{curve} coordinate `{parameter}` is {actual} bytes, expected {expected}")]
    CoordinateLength {
        curve: NamedCurve,
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("DER: {0}")]
    Der(#[from] der::error::Error),
}

/// Flat classification of [`Error`] for callers rendering diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidJson,
    InvalidKey,
    UnsupportedKeyType,
    MissingParameter,
    UnsupportedCurve,
    UnsupportedFormat,
    CoordinateLength,
    Decode,
    Encoding,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidJson(_) => ErrorKind::InvalidJson,
            Error::InvalidKey(_) => ErrorKind::InvalidKey,
            Error::UnsupportedKeyType(_) => ErrorKind::UnsupportedKeyType,
            Error::MissingParameter { .. } => ErrorKind::MissingParameter,
            Error::UnsupportedCurve(_) => ErrorKind::UnsupportedCurve,
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::Conversion(ConversionError::Decode { .. }) => ErrorKind::Decode,
            Error::Conversion(ConversionError::CoordinateLength { .. }) => {
                ErrorKind::CoordinateLength
            }
            Error::Conversion(ConversionError::Der(_)) => ErrorKind::Encoding,
        }
    }
}
