//! base64url handling for JWK parameters.
//!
//! JWK values are unpadded base64url (RFC 7515 Section 2). They are rewritten
//! to padded standard base64 and then decoded. Encoding for output is done by
//! the PEM framer.

use base64::{
    DecodeError, Engine, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};

use crate::error::ConversionError;

/// Standard alphabet, tolerant of non-zero trailing bits like browser `atob`.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Rewrite base64url text as padded standard base64.
///
/// Whitespace is dropped. The character set is not checked here; bad input
/// fails in [`decode_to_bytes`].
pub fn to_standard_base64(text: &str) -> String {
    let mut out = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect::<String>();
    let pad = (4 - out.len() % 4) % 4;
    out.push_str(&"=".repeat(pad));
    out
}

pub fn decode_to_bytes(base64_text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD_LENIENT.decode(base64_text)
}

/// Decode a base64url JWK parameter to raw bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    decode_to_bytes(&to_standard_base64(text))
}

/// [`decode`], naming the JWK member on failure.
pub(crate) fn decode_parameter(
    parameter: &'static str,
    value: &str,
) -> Result<Vec<u8>, ConversionError> {
    decode(value).map_err(|source| ConversionError::Decode { parameter, source })
}
