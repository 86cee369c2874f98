//! Blueprint string format: a version character followed by base64 of the
//! zlib-compressed JSON document.

use crate::error::Error;
use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use std::io::{Read, Write};

pub const VERSION: char = '0';

pub fn compress(json: &str) -> Result<Vec<u8>, Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes())?;
    Ok(encoder.finish()?)
}

pub fn decompress(bytes: &[u8]) -> Result<String, Error> {
    let mut json = Vec::new();
    ZlibDecoder::new(bytes).read_to_end(&mut json)?;
    Ok(String::from_utf8(json)?)
}

pub fn encode_text(bytes: &[u8]) -> String {
    format!("{}{}", VERSION, STANDARD.encode(bytes))
}

/// Returns the version character and the decoded payload.
pub fn decode_text(text: &str) -> Result<(char, Vec<u8>), Error> {
    let text = text.trim();
    let mut chars = text.chars();
    let version = chars.next().ok_or(Error::Empty)?;
    Ok((version, STANDARD.decode(chars.as_str())?))
}

pub fn encode(json: &str) -> Result<String, Error> {
    Ok(encode_text(&compress(json)?))
}

pub fn decode(text: &str) -> Result<(char, String), Error> {
    let (version, bytes) = decode_text(text)?;
    Ok((version, decompress(&bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_string_carries_version() {
        let s = encode(r#"{"blueprint":{}}"#).unwrap();
        assert!(s.starts_with(VERSION));
        assert!(s.len() > 1);
    }

    #[test]
    fn decode_restores_json() {
        let json = r#"{"blueprint":{"label":"Program - PROM"}}"#;
        let (version, back) = decode(&encode(json).unwrap()).unwrap();
        assert_eq!(version, VERSION);
        assert_eq!(back, json);
    }

    #[test]
    fn decode_reports_foreign_version() {
        let s = encode("{}").unwrap().replacen('0', "1", 1);
        let (version, back) = decode(&s).unwrap();
        assert_eq!(version, '1');
        assert_eq!(back, "{}");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(matches!(decode("  \n"), Err(Error::Empty)));
        assert!(matches!(decode("0***"), Err(Error::Base64(_))));
    }
}
