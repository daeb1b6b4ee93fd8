//! JSON Web Key model.
//!
//! The key type is resolved once, when the JSON text is decoded, into a
//! [`JsonWebKey`] whose variants carry exactly the members that key type
//! needs. Later stages never look at the raw JSON again.
//!
//! Only the public members are read. Anything else in the object (`kid`,
//! `use`, `alg`, private members) is ignored.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use jwkpem::decoder::{DecodableFrom, Decoder};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::algorithm::NamedCurve;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Rsa,
    Ec,
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::Ec => write!(f, "EC"),
        }
    }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RSA" => Ok(KeyType::Rsa),
            "EC" => Ok(KeyType::Ec),
            _ => Err(Error::UnsupportedKeyType(s.to_string())),
        }
    }
}

/// RSA public key members (RFC 7518 Section 6.3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicJwk {
    n: String,
    e: String,
}

impl RsaPublicJwk {
    pub fn new(n: impl Into<String>, e: impl Into<String>) -> Result<Self> {
        match (required(Some(n.into())), required(Some(e.into()))) {
            (Some(n), Some(e)) => Ok(RsaPublicJwk { n, e }),
            _ => Err(Error::MissingParameter {
                kty: KeyType::Rsa,
                params: "n, e",
            }),
        }
    }

    /// Modulus, base64url.
    pub fn n(&self) -> &str {
        &self.n
    }

    /// Public exponent, base64url.
    pub fn e(&self) -> &str {
        &self.e
    }
}

/// EC public key members (RFC 7518 Section 6.2.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicJwk {
    crv: NamedCurve,
    x: String,
    y: String,
}

impl EcPublicJwk {
    pub fn new(crv: NamedCurve, x: impl Into<String>, y: impl Into<String>) -> Result<Self> {
        match (required(Some(x.into())), required(Some(y.into()))) {
            (Some(x), Some(y)) => Ok(EcPublicJwk { crv, x, y }),
            _ => Err(Error::MissingParameter {
                kty: KeyType::Ec,
                params: "x, y, crv",
            }),
        }
    }

    pub fn crv(&self) -> NamedCurve {
        self.crv
    }

    pub fn x(&self) -> &str {
        &self.x
    }

    pub fn y(&self) -> &str {
        &self.y
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonWebKey {
    Rsa(RsaPublicJwk),
    Ec(EcPublicJwk),
}

impl JsonWebKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            JsonWebKey::Rsa(_) => KeyType::Rsa,
            JsonWebKey::Ec(_) => KeyType::Ec,
        }
    }
}

impl Display for JsonWebKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonWebKey::Rsa(_) => write!(f, "RSA"),
            JsonWebKey::Ec(ec) => write!(f, "EC ({})", ec.crv()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RsaMembers {
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EcMembers {
    crv: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

/// Type the members one key type needs. Other members are not looked at.
fn members<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(object)).map_err(|e| Error::InvalidKey(e.to_string()))
}

/// The `kty` member as text. Non-string values are rendered as JSON.
fn key_type_name(object: &Map<String, Value>) -> Result<String> {
    match object.get("kty") {
        Some(Value::String(kty)) => Ok(kty.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(Error::InvalidKey("missing key type (kty)".to_string())),
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<Map<String, Value>> for JsonWebKey {
    type Error = Error;

    fn try_from(object: Map<String, Value>) -> Result<Self> {
        match key_type_name(&object)?.parse::<KeyType>()? {
            KeyType::Rsa => {
                let RsaMembers { n, e } = members(object)?;
                let (Some(n), Some(e)) = (required(n), required(e)) else {
                    return Err(Error::MissingParameter {
                        kty: KeyType::Rsa,
                        params: "n, e",
                    });
                };
                Ok(JsonWebKey::Rsa(RsaPublicJwk { n, e }))
            }
            KeyType::Ec => {
                let EcMembers { crv, x, y } = members(object)?;
                let (Some(x), Some(y), Some(crv)) = (required(x), required(y), required(crv))
                else {
                    return Err(Error::MissingParameter {
                        kty: KeyType::Ec,
                        params: "x, y, crv",
                    });
                };
                let crv = crv.parse::<NamedCurve>()?;
                Ok(JsonWebKey::Ec(EcPublicJwk { crv, x, y }))
            }
        }
    }
}

/// Parse JSON text, failing with [`Error::InvalidJson`].
pub(crate) fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(Error::InvalidJson)
}

/// Pick the key object out of a parsed document.
///
/// An object whose `keys` member is an array is a JWKS and yields its first
/// entry; further entries are ignored. Anything else, including an object
/// with a non-array `keys`, must itself be a key object.
pub(crate) fn select_key(document: Value) -> Result<Map<String, Value>> {
    let candidate = match document {
        Value::Object(mut object) => match object.remove("keys") {
            Some(Value::Array(keys)) => {
                debug!("key set holds {} keys, using the first", keys.len());
                keys.into_iter()
                    .next()
                    .ok_or_else(|| Error::InvalidKey("key set is empty".to_string()))?
            }
            Some(keys) => {
                object.insert("keys".to_string(), keys);
                Value::Object(object)
            }
            None => Value::Object(object),
        },
        other => other,
    };

    match candidate {
        Value::Object(object) => Ok(object),
        _ => Err(Error::InvalidKey(
            "expected a single key object".to_string(),
        )),
    }
}

/// Short label for the key in `text`: `RSA`, `EC (<crv>)`, or the raw `kty`.
///
/// Unlike conversion this does not require the key parameters, and an EC key
/// without a usable `crv` is shown as `EC (Unknown)`.
pub fn describe(text: &str) -> Result<String> {
    let object = select_key(parse_json(text)?)?;
    let kty = key_type_name(&object)?;

    let description = match kty.as_str() {
        "EC" => {
            let crv = object
                .get("crv")
                .and_then(Value::as_str)
                .filter(|crv| !crv.is_empty())
                .unwrap_or("Unknown");
            format!("EC ({crv})")
        }
        _ => kty,
    };
    Ok(description)
}

impl DecodableFrom<&str> for JsonWebKey {}

impl Decoder<&str, JsonWebKey> for &str {
    type Error = Error;

    fn decode(&self) -> Result<JsonWebKey> {
        let object = select_key(parse_json(self)?)?;
        let key = JsonWebKey::try_from(object)?;
        debug!("resolved {} key", key);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use jwkpem::decoder::Decoder;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    fn decode(text: &str) -> Result<JsonWebKey> {
        text.decode()
    }

    #[test]
    fn test_decode_rsa() {
        let key = decode(r#"{"kty":"RSA","n":"AQAB","e":"AQAB","kid":"k1","use":"sig"}"#).unwrap();
        assert_eq!(JsonWebKey::Rsa(RsaPublicJwk::new("AQAB", "AQAB").unwrap()), key);
        assert_eq!(KeyType::Rsa, key.key_type());
    }

    #[test]
    fn test_decode_ec() {
        let key = decode(r#"{"kty":"EC","crv":"P-384","x":"AA","y":"AQ"}"#).unwrap();
        let JsonWebKey::Ec(ec) = key else {
            panic!("expected an EC key");
        };
        assert_eq!(NamedCurve::P384, ec.crv());
        assert_eq!("AA", ec.x());
        assert_eq!("AQ", ec.y());
    }

    #[test]
    fn test_decode_first_of_key_set() {
        let key = decode(
            r#"{"keys":[{"kty":"RSA","n":"AQAB","e":"Aw"},{"kty":"EC","crv":"P-256","x":"AA","y":"AA"}]}"#,
        )
        .unwrap();
        assert_eq!(KeyType::Rsa, key.key_type());
    }

    #[rstest(input, expected,
        case("not json", ErrorKind::InvalidJson),
        case("{\"kty\":\"RSA\",", ErrorKind::InvalidJson),
        case("", ErrorKind::InvalidJson),
        case(r#"{"keys":[]}"#, ErrorKind::InvalidKey),
        case(r#"{"keys":{}}"#, ErrorKind::InvalidKey),
        case(r#"{"keys":[42]}"#, ErrorKind::InvalidKey),
        case(r#"[{"kty":"RSA"}]"#, ErrorKind::InvalidKey),
        case(r#""RSA""#, ErrorKind::InvalidKey),
        case("null", ErrorKind::InvalidKey),
        case(r#"{"n":"AQAB","e":"AQAB"}"#, ErrorKind::InvalidKey),
        case(r#"{"kty":"RSA","n":5,"e":"AQAB"}"#, ErrorKind::InvalidKey),
        case(r#"{"kty":"OKP","crv":"Ed25519","x":"AA"}"#, ErrorKind::UnsupportedKeyType),
        case(r#"{"kty":"oct","k":"AA"}"#, ErrorKind::UnsupportedKeyType),
        case(r#"{"kty":5}"#, ErrorKind::UnsupportedKeyType),
        case(r#"{"kty":null,"n":"AQAB","e":"AQAB"}"#, ErrorKind::UnsupportedKeyType),
        case(r#"{"kty":"RSA","n":"AQAB"}"#, ErrorKind::MissingParameter),
        case(r#"{"kty":"RSA","n":"","e":"AQAB"}"#, ErrorKind::MissingParameter),
        case(r#"{"kty":"EC","crv":"P-256","x":"AA"}"#, ErrorKind::MissingParameter),
        case(r#"{"kty":"EC","x":"AA","y":"AA"}"#, ErrorKind::MissingParameter),
        case(r#"{"kty":"EC","crv":"P-192","x":"AA","y":"AA"}"#, ErrorKind::UnsupportedCurve),
        case(r#"{"kty":"EC","crv":"secp256k1","x":"AA","y":"AA"}"#, ErrorKind::UnsupportedCurve)
    )]
    fn test_decode_error(input: &str, expected: ErrorKind) {
        let err = decode(input).unwrap_err();
        assert_eq!(expected, err.kind(), "{}", err);
    }

    #[test]
    fn test_unsupported_key_type_names_value() {
        let err = decode(r#"{"kty":"OKP","crv":"Ed25519","x":"AA"}"#).unwrap_err();
        assert!(matches!(&err, Error::UnsupportedKeyType(kty) if kty == "OKP"));
        assert_eq!("unsupported key type: OKP", err.to_string());
    }

    #[rstest(input, expected,
        case(r#"{"kty":5}"#, "unsupported key type: 5"),
        case(r#"{"kty":["RSA"]}"#, "unsupported key type: [\"RSA\"]")
    )]
    fn test_unsupported_key_type_non_string(input: &str, expected: &str) {
        let err = decode(input).unwrap_err();
        assert_eq!(ErrorKind::UnsupportedKeyType, err.kind());
        assert_eq!(expected, err.to_string());
    }

    #[rstest(keys,
        case("null"),
        case(r#""RSA""#),
        case("{}"),
        case("false")
    )]
    fn test_decode_non_array_keys_is_plain_key(keys: &str) {
        let key = decode(&format!(r#"{{"keys":{keys},"kty":"RSA","n":"ww","e":"AQAB"}}"#)).unwrap();
        assert_eq!(JsonWebKey::Rsa(RsaPublicJwk::new("ww", "AQAB").unwrap()), key);
    }

    #[rstest(input,
        case(r#"{"kty":"RSA","n":"AQAB","e":"AQAB","crv":5,"x":false,"y":[]}"#),
        case(r#"{"kty":"EC","crv":"P-256","x":"AA","y":"AA","n":5,"e":{}}"#)
    )]
    fn test_decode_ignores_members_of_other_key_types(input: &str) {
        assert!(decode(input).is_ok());
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = decode(r#"{"kty":"RSA","e":"AQAB"}"#).unwrap_err();
        assert_eq!("RSA key missing required parameters (n, e)", err.to_string());
    }

    #[test]
    fn test_select_key_plain_object() {
        let object = select_key(json!({"kty": "EC"})).unwrap();
        assert_eq!(Some(&json!("EC")), object.get("kty"));
    }

    #[rstest(input, expected,
        case(r#"{"kty":"RSA","n":"AQAB","e":"AQAB"}"#, "RSA"),
        case(r#"{"kty":"RSA"}"#, "RSA"),
        case(r#"{"kty":"EC","crv":"P-521"}"#, "EC (P-521)"),
        case(r#"{"kty":"EC"}"#, "EC (Unknown)"),
        case(r#"{"kty":"EC","crv":""}"#, "EC (Unknown)"),
        case(r#"{"kty":"EC","crv":null}"#, "EC (Unknown)"),
        case(r#"{"kty":5}"#, "5"),
        case(r#"{"keys":null,"kty":"RSA"}"#, "RSA"),
        case(r#"{"kty":"OKP","crv":"Ed25519"}"#, "OKP"),
        case(r#"{"keys":[{"kty":"EC","crv":"P-384"},{"kty":"RSA"}]}"#, "EC (P-384)")
    )]
    fn test_describe(input: &str, expected: &str) {
        assert_eq!(expected, describe(input).unwrap());
    }

    #[test]
    fn test_display_resolved_key() {
        let key = decode(r#"{"kty":"EC","crv":"P-256","x":"AA","y":"AA"}"#).unwrap();
        assert_eq!("EC (P-256)", key.to_string());
    }
}
