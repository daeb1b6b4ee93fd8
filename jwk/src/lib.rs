//! JSON Web Key to PEM conversion.
//!
//! Converts an RSA or EC public key given as a JWK, or the first key of a
//! JWKS, into a PEM encoded X.509 SubjectPublicKeyInfo.
//!
//! ```text
//! JSON text ─ parse ─ select key ─ resolve kty ─ assemble DER ─ frame PEM
//! ```
//!
//! Every stage fails fast; no partial output is returned. Conversion is a
//! pure function of its input and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! let pem = jwk::convert(
//!     r#"{"kty":"EC","crv":"P-256",
//!        "x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
//!        "y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM"}"#,
//! )?;
//! assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
//! # Ok::<(), jwk::Error>(())
//! ```

use std::fmt::{Display, Formatter};

use der::Der;
use jwkpem::decoder::Decoder;
use jwkpem::encoder::Encoder;
use log::debug;
use pem::{Label, Pem};

pub mod algorithm;
pub mod base64url;
mod ec;
pub mod error;
pub mod key;
mod rsa;

pub use algorithm::NamedCurve;
pub use error::{ConversionError, Error, ErrorKind, Result};
pub use key::{EcPublicJwk, JsonWebKey, KeyType, RsaPublicJwk, describe};

/// Output structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// X.509 SubjectPublicKeyInfo, `PUBLIC KEY`
    #[default]
    Spki,
    /// PKCS#1 RSAPublicKey, `RSA PUBLIC KEY` (RSA only)
    Pkcs1,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Spki => write!(f, "SubjectPublicKeyInfo"),
            Format::Pkcs1 => write!(f, "PKCS#1"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub format: Format,
    /// Require EC coordinates to be exactly the curve's field size.
    pub strict_coordinates: bool,
}

/// Convert JWK or JWKS text to a `PUBLIC KEY` PEM document.
pub fn convert(json: &str) -> Result<String> {
    convert_with(json, &Options::default())
}

pub fn convert_with(json: &str, options: &Options) -> Result<String> {
    let key: JsonWebKey = json.decode()?;
    let (label, der) = assemble(&key, options)?;
    debug!(
        "encoded {} key as {}, {} DER bytes",
        key,
        options.format,
        der.len()
    );
    Ok(Pem::from_bytes(label, der.as_bytes()).to_string())
}

fn assemble(key: &JsonWebKey, options: &Options) -> Result<(Label, Der)> {
    let assembled = match (key, options.format) {
        (JsonWebKey::Rsa(rsa), Format::Spki) => (Label::PublicKey, rsa.encode()?),
        (JsonWebKey::Rsa(rsa), Format::Pkcs1) => (Label::RSAPublicKey, rsa.rsa_public_key()?),
        (JsonWebKey::Ec(ec), Format::Spki) if options.strict_coordinates => {
            (Label::PublicKey, ec.encode_strict()?)
        }
        (JsonWebKey::Ec(ec), Format::Spki) => (Label::PublicKey, ec.encode()?),
        (JsonWebKey::Ec(_), format) => {
            return Err(Error::UnsupportedFormat {
                kty: KeyType::Ec,
                format,
            });
        }
    };
    Ok(assembled)
}
