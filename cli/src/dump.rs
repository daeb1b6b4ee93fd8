use clap::Args;
use der::{Tag, Tlv};
use jwk::NamedCurve;
use jwk::algorithm::{EC_PUBLIC_KEY, RSA_ENCRYPTION};
use jwkpem::decoder::Decoder;
use pem::Pem;

use crate::convert::OutputFormat;
use crate::error::Result;
use crate::utils::read_input;

/// INTEGERs wider than this are shown by bit length only.
const MAX_DECIMAL_BYTES: usize = 8;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the JWK or JWKS file. If not specified, reads from stdin
    file: Option<String>,

    /// Structure to build before dumping
    #[arg(short, long, value_enum, default_value = "spki")]
    format: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let json = read_input(config.file.as_deref())?;
    let options = jwk::Options {
        format: config.format.into(),
        ..jwk::Options::default()
    };
    let text = jwk::convert_with(&json, &options)?;

    let pem: Pem = text.as_str().decode()?;
    let der: Vec<u8> = pem.decode()?;
    let tlv: Tlv = der.as_slice().decode()?;

    println!("{}", pem.label());
    print!("{}", format_tlv(&tlv));
    Ok(())
}

/// Format a DER tree, one element per line, children indented.
pub(crate) fn format_tlv(tlv: &Tlv) -> String {
    let mut output = String::new();
    format_element(tlv, 0, &mut output);
    output
}

fn format_element(tlv: &Tlv, depth: usize, output: &mut String) {
    let prefix = "  ".repeat(depth);

    if let Some(children) = tlv.children() {
        let name = match tlv.tag() {
            Tag::Set => "SET",
            _ => "SEQUENCE",
        };
        output.push_str(&format!("{}{} ({} elem)\n", prefix, name, children.len()));
        for child in children {
            format_element(child, depth + 1, output);
        }
        return;
    }

    let data = tlv.data().unwrap_or_default();
    match tlv.tag() {
        Tag::Integer => {
            output.push_str(&format!("{}INTEGER {}\n", prefix, format_integer(data)));
        }
        Tag::BitString => {
            let (unused, bits) = match data.split_first() {
                Some((unused, bits)) => (usize::from(*unused), bits),
                None => (0, data),
            };
            output.push_str(&format!(
                "{}BIT STRING ({} bits)\n",
                prefix,
                (bits.len() * 8).saturating_sub(unused)
            ));
            // An RSAPublicKey is itself DER; an EC point is not
            if bits.first() == Some(&u8::from(Tag::Sequence)) {
                let inner: std::result::Result<Tlv, _> = bits.decode();
                if let Ok(inner) = inner {
                    format_element(&inner, depth + 1, output);
                }
            }
        }
        Tag::OctetString => {
            output.push_str(&format!("{}OCTET STRING ({} bytes)\n", prefix, data.len()));
        }
        Tag::Null => {
            output.push_str(&format!("{}NULL\n", prefix));
        }
        Tag::ObjectIdentifier => {
            let dotted = format_oid(data);
            match oid_name(data) {
                Some(name) => output.push_str(&format!(
                    "{}OBJECT IDENTIFIER {} ({})\n",
                    prefix, dotted, name
                )),
                None => output.push_str(&format!("{}OBJECT IDENTIFIER {}\n", prefix, dotted)),
            }
        }
        tag => {
            output.push_str(&format!(
                "{}[0x{:02x}] ({} bytes)\n",
                prefix,
                u8::from(tag),
                data.len()
            ));
        }
    }
}

fn format_integer(data: &[u8]) -> String {
    let magnitude = match data {
        [0x00, rest @ ..] if !rest.is_empty() => rest,
        _ => data,
    };
    if magnitude.len() > MAX_DECIMAL_BYTES {
        return format!("({} bit)", bit_length(magnitude));
    }
    let value = magnitude
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    value.to_string()
}

fn bit_length(magnitude: &[u8]) -> usize {
    match magnitude.iter().position(|b| *b != 0) {
        Some(i) => (magnitude.len() - i) * 8 - magnitude[i].leading_zeros() as usize,
        None => 0,
    }
}

/// Dotted decimal form of OBJECT IDENTIFIER content octets.
fn format_oid(data: &[u8]) -> String {
    let Some((first, rest)) = data.split_first() else {
        return String::new();
    };
    let mut arcs = vec![u64::from(first / 40), u64::from(first % 40)];
    let mut arc = 0u64;
    for byte in rest {
        arc = (arc << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            arcs.push(arc);
            arc = 0;
        }
    }
    arcs.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn oid_name(data: &[u8]) -> Option<&'static str> {
    // Encoded constants carry a 2 byte tag and length
    let known = [
        (RSA_ENCRYPTION, "rsaEncryption"),
        (EC_PUBLIC_KEY, "ecPublicKey"),
        (NamedCurve::P256.oid(), "secp256r1"),
        (NamedCurve::P384.oid(), "secp384r1"),
        (NamedCurve::P521.oid(), "secp521r1"),
    ];
    known
        .into_iter()
        .find(|(encoded, _)| &encoded[2..] == data)
        .map(|(_, name)| name)
}
