use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when reading PEM text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN ...-----` line was found
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// The block was never closed with `-----END ...-----`
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    /// No base64 lines between the boundaries
    #[error("missing PEM data")]
    MissingData,

    #[error("invalid label")]
    InvalidLabel,

    /// BEGIN and END name different labels
    #[error("label doesn't match")]
    LabelMissMatch,

    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}
