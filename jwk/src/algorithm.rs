//! Algorithm identifiers and named curves.
//!
//! OIDs are kept pre-encoded (tag, length and arcs) since only these few are
//! ever written.
//!
//! ```asn1
//! AlgorithmIdentifier  ::=  SEQUENCE  {
//!     algorithm   OBJECT IDENTIFIER,
//!     parameters  ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use der::Der;

use crate::error::Error;

/// rsaEncryption, 1.2.840.113549.1.1.1 (RFC 3279 Section 2.3.1)
pub const RSA_ENCRYPTION: &[u8] = &[
    0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01,
];
/// id-ecPublicKey, 1.2.840.10045.2.1 (RFC 5480 Section 2.1.1)
pub const EC_PUBLIC_KEY: &[u8] = &[0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
pub const NULL: &[u8] = &[0x05, 0x00];

const OID_SECP256R1: &[u8] = &[0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
const OID_SECP384R1: &[u8] = &[0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x22];
const OID_SECP521R1: &[u8] = &[0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x23];

/// Curves accepted in the JWK `crv` member (RFC 7518 Section 6.2.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// secp256r1, OID 1.2.840.10045.3.1.7
    P256,
    /// secp384r1, OID 1.3.132.0.34
    P384,
    /// secp521r1, OID 1.3.132.0.35
    P521,
}

impl NamedCurve {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// DER encoded OBJECT IDENTIFIER of the curve.
    pub const fn oid(&self) -> &'static [u8] {
        match self {
            Self::P256 => OID_SECP256R1,
            Self::P384 => OID_SECP384R1,
            Self::P521 => OID_SECP521R1,
        }
    }

    /// Size in bytes of one affine coordinate.
    pub const fn coordinate_size(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

impl Display for NamedCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for NamedCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P-256" => Ok(Self::P256),
            "P-384" => Ok(Self::P384),
            "P-521" => Ok(Self::P521),
            _ => Err(Error::UnsupportedCurve(s.to_string())),
        }
    }
}

/// `SEQUENCE { rsaEncryption, NULL }`
pub(crate) fn rsa_algorithm_identifier() -> Der {
    Der::sequence(&[Der::from_encoded(RSA_ENCRYPTION), Der::from_encoded(NULL)])
}

/// `SEQUENCE { id-ecPublicKey, namedCurve }`
pub(crate) fn ec_algorithm_identifier(curve: NamedCurve) -> Der {
    Der::sequence(&[Der::from_encoded(EC_PUBLIC_KEY), Der::from_encoded(curve.oid())])
}
