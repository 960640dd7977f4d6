//! Gzip compression of the serialized byte stream.
//!
//! The gzip trailer carries a CRC-32 and the uncompressed length, so corrupted
//! or truncated input fails instead of yielding partial text. The stream must
//! be a single gzip member with nothing after it.

use std::io::{Read, Write};

use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::trace;

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compresses `data` into a gzip stream.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Envelope(format!("gzip compression failed: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| Error::Envelope(format!("gzip compression failed: {}", e)))?;
    trace!("Compressed {} bytes -> {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

/// Decompresses a gzip stream.
///
/// # Errors
///
/// [`Error::Decompression`] if `data` is not gzip, fails its integrity checks
/// or has bytes after the gzip member.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Err(Error::Decompression("missing gzip header".to_string()));
    }
    let mut output = Vec::with_capacity(data.len() * 2);
    let mut decoder = GzDecoder::new(data);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(format!("gzip decompression failed: {}", e)))?;
    let rest = decoder.into_inner();
    if !rest.is_empty() {
        return Err(Error::Decompression(format!(
            "{} unexpected bytes after the gzip stream",
            rest.len()
        )));
    }
    trace!("Decompressed {} bytes -> {} bytes", data.len(), output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = b"[Section]\nkey=value\n".repeat(50);
        let compressed = compress(&text).unwrap();
        assert!(compressed.len() < text.len());
        assert_eq!(decompress(&compressed).unwrap(), text);
    }

    #[test]
    fn test_not_gzip() {
        assert!(matches!(
            decompress(b"[Section]\n"),
            Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_corrupted_payload() {
        let mut compressed = compress(&b"key=value\n".repeat(20)).unwrap();
        let middle = compressed.len() / 2;
        compressed[middle] ^= 0xff;
        assert!(matches!(
            decompress(&compressed),
            Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let compressed = compress(b"key=value\n").unwrap();

        let mut junk = compressed.clone();
        junk.extend_from_slice(b"junk");
        assert!(matches!(decompress(&junk), Err(Error::Decompression(_))));

        let mut two_members = compressed.clone();
        two_members.extend_from_slice(&compress(b"other=1\n").unwrap());
        assert!(matches!(
            decompress(&two_members),
            Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let compressed = compress(&b"key=value\n".repeat(20)).unwrap();
        let truncated = &compressed[..compressed.len() - 4];
        assert!(decompress(truncated).is_err());
    }
}
