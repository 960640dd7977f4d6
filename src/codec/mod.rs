//! Byte-level envelope around the serialized text.
//!
//! Saving turns text into bytes in the configured encoding, then optionally
//! compresses and encrypts them. Loading runs the same steps in reverse and
//! fails before any parsing if a step fails.
//!
//! ```text
//! save: text -> encode -> compress? -> encrypt? -> bytes
//! load: bytes -> decrypt? -> decompress? -> decode -> text
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{codec, IniOptions};
//!
//! let options = IniOptions::new()
//!     .with_compression(true)
//!     .with_encryption_password("secret");
//!
//! let sealed = codec::seal("[S]\nk=v\n", &options).unwrap();
//! assert_eq!(codec::open(&sealed, &options).unwrap(), "[S]\nk=v\n");
//! ```

pub mod compression;
pub mod crypto;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use log::debug;
use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::options::IniOptions;

/// Encodes `text` in `encoding`.
///
/// UTF-16 output starts with a byte order mark.
///
/// # Errors
///
/// [`Error::Encoding`] if a character is not representable.
pub fn encode_text(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok(encode_utf16(text, encoding == UTF_16LE));
    }
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(Error::Encoding(format!(
            "text contains characters not representable in {}",
            used.name()
        )));
    }
    Ok(bytes.into_owned())
}

/// `encoding_rs` only decodes UTF-16, so it is encoded here.
fn encode_utf16(text: &str, little_endian: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
        let pair = if little_endian {
            unit.to_le_bytes()
        } else {
            unit.to_be_bytes()
        };
        bytes.extend_from_slice(&pair);
    }
    bytes
}

/// Decodes `bytes` from `encoding`. A byte order mark overrides the encoding.
///
/// # Errors
///
/// [`Error::Encoding`] on malformed input.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (encoding, bytes) = match Encoding::for_bom(bytes) {
        Some((detected, bom_length)) => (detected, &bytes[bom_length..]),
        None => (encoding, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::Encoding(format!("input is not valid {}", encoding.name())))
}

/// Encodes `text` and applies compression and encryption as configured.
pub fn seal(text: &str, options: &IniOptions) -> Result<Vec<u8>> {
    let mut bytes = encode_text(text, options.encoding)?;
    if options.compression {
        bytes = compression::compress(&bytes)?;
    }
    if let Some(password) = options.password() {
        bytes = crypto::encrypt(&bytes, password)?;
    }
    debug!(
        "sealed {} bytes (compression: {}, encryption: {})",
        bytes.len(),
        options.compression,
        options.password().is_some()
    );
    Ok(bytes)
}

/// Reverses [`seal`]: decrypts and decompresses as configured, then decodes.
pub fn open(bytes: &[u8], options: &IniOptions) -> Result<String> {
    let mut data = Cow::Borrowed(bytes);
    if let Some(password) = options.password() {
        data = Cow::Owned(crypto::decrypt(&data, password)?);
    }
    if options.compression {
        data = Cow::Owned(compression::decompress(&data)?);
    }
    debug!("opened {} bytes into {} bytes", bytes.len(), data.len());
    decode_text(&data, options.encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_round_trip() {
        let options = IniOptions::default();
        let sealed = seal("[S]\nk=v\n", &options).unwrap();
        assert_eq!(sealed, b"[S]\nk=v\n");
        assert_eq!(open(&sealed, &options).unwrap(), "[S]\nk=v\n");
    }

    #[test]
    fn test_legacy_encoding() {
        let options = IniOptions::default().with_encoding(encoding_rs::WINDOWS_1252);
        let sealed = seal("k=caf\u{e9}\n", &options).unwrap();
        assert_eq!(sealed, b"k=caf\xe9\n");
        assert_eq!(open(&sealed, &options).unwrap(), "k=caf\u{e9}\n");
    }

    #[test]
    fn test_unrepresentable_text() {
        let options = IniOptions::default().with_encoding(encoding_rs::WINDOWS_1252);
        assert!(matches!(seal("k=\u{4e2d}\n", &options), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_utf16_round_trip() {
        let text = "[S]\nk=caf\u{e9}\n";
        for (encoding, bom) in [(UTF_16LE, [0xff, 0xfe]), (UTF_16BE, [0xfe, 0xff])] {
            let options = IniOptions::default().with_encoding(encoding);
            let sealed = seal(text, &options).unwrap();
            assert_eq!(sealed[..2], bom);
            assert_eq!(sealed.len(), 2 + 2 * text.chars().count());
            assert_eq!(open(&sealed, &options).unwrap(), text);
            // The byte order mark wins over a UTF-8 configuration
            assert_eq!(open(&sealed, &IniOptions::default()).unwrap(), text);
        }
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            decode_text(b"k=\xff\xfe\xfd", encoding_rs::UTF_8),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_bom_is_stripped() {
        assert_eq!(
            decode_text(b"\xef\xbb\xbfk=v", encoding_rs::UTF_8).unwrap(),
            "k=v"
        );
    }

    #[test]
    fn test_compression_only() {
        let options = IniOptions::default().with_compression(true);
        let sealed = seal("[S]\nk=v\n", &options).unwrap();
        assert_eq!(&sealed[..2], &[0x1f, 0x8b]);
        assert_eq!(open(&sealed, &options).unwrap(), "[S]\nk=v\n");
    }
}
