//! RSA public keys.
//!
//! [RFC 8017 Appendix A.1.1](https://datatracker.ietf.org/doc/html/rfc8017#appendix-A.1.1):
//!
//! ```asn1
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER   -- e
//! }
//! ```
//!
//! In an SPKI the RSAPublicKey DER is the content of the BIT STRING and the
//! algorithm is `rsaEncryption` with NULL parameters (RFC 3279).

use der::Der;
use jwkpem::encoder::{EncodableTo, Encoder};
use log::debug;

use crate::algorithm::rsa_algorithm_identifier;
use crate::base64url::decode_parameter;
use crate::error::ConversionError;
use crate::key::RsaPublicJwk;

impl RsaPublicJwk {
    /// PKCS#1 `RSAPublicKey`.
    pub fn rsa_public_key(&self) -> Result<Der, ConversionError> {
        let n = decode_parameter("n", self.n())?;
        let e = decode_parameter("e", self.e())?;
        debug!("RSA modulus is {} bytes, exponent {} bytes", n.len(), e.len());

        Ok(Der::sequence(&[Der::integer(&n)?, Der::integer(&e)?]))
    }
}

impl EncodableTo<RsaPublicJwk> for Der {}

impl Encoder<RsaPublicJwk, Der> for RsaPublicJwk {
    type Error = ConversionError;

    /// SubjectPublicKeyInfo.
    fn encode(&self) -> Result<Der, Self::Error> {
        let public_key = self.rsa_public_key()?;
        Ok(Der::sequence(&[
            rsa_algorithm_identifier(),
            Der::bit_string(public_key.as_bytes()),
        ]))
    }
}
