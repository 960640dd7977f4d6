//! Password-based encryption of the serialized byte stream.
//!
//! ## Format
//!
//! ```text
//! "INIE" | version (1 byte) | salt (16 bytes) | nonce (12 bytes) | ciphertext + tag
//! ```
//!
//! The key is derived with Argon2id from the password and salt; the payload is
//! sealed with AES-256-GCM. A wrong password or any modified byte fails tag
//! verification.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use log::trace;

use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"INIE";
const VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = MAGIC.len() + 1 + SALT_LEN + NONCE_LEN;

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Envelope(format!("key derivation failed: {}", e)))?;
    Ok(key)
}

fn cipher(password: &str, salt: &[u8]) -> Result<Aes256Gcm> {
    let key = derive_key(password, salt)?;
    Aes256Gcm::new_from_slice(&key).map_err(|e| Error::Envelope(format!("invalid key: {}", e)))
}

/// Encrypts `data` with a key derived from `password`.
pub fn encrypt(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut salt)
        .and_then(|()| getrandom::getrandom(&mut nonce))
        .map_err(|e| Error::Envelope(format!("random source failed: {}", e)))?;

    let ciphertext = cipher(password, &salt)?
        .encrypt(Nonce::from_slice(&nonce), data)
        .map_err(|e| Error::Envelope(format!("encryption failed: {}", e)))?;

    let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    output.extend_from_slice(MAGIC);
    output.push(VERSION);
    output.extend_from_slice(&salt);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    trace!("Encrypted {} bytes -> {} bytes", data.len(), output.len());
    Ok(output)
}

/// Decrypts data produced by [`encrypt`].
///
/// # Errors
///
/// [`Error::Decryption`] for a wrong password, a foreign or truncated header,
/// or any modification of the ciphertext.
pub fn decrypt(data: &[u8], password: &str) -> Result<Vec<u8>> {
    if data.len() < HEADER_LEN + TAG_LEN {
        return Err(Error::Decryption("input is too short".to_string()));
    }
    let (header, ciphertext) = data.split_at(HEADER_LEN);
    if &header[..MAGIC.len()] != MAGIC {
        return Err(Error::Decryption("missing encryption header".to_string()));
    }
    if header[MAGIC.len()] != VERSION {
        return Err(Error::Decryption(format!(
            "unsupported format version {}",
            header[MAGIC.len()]
        )));
    }
    let salt = &header[MAGIC.len() + 1..MAGIC.len() + 1 + SALT_LEN];
    let nonce = &header[MAGIC.len() + 1 + SALT_LEN..];

    let plain = cipher(password, salt)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::Decryption("wrong password or corrupted data".to_string()))?;
    trace!("Decrypted {} bytes -> {} bytes", data.len(), plain.len());
    Ok(plain)
}
