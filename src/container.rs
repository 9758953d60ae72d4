//! On-disk layout of an encrypted file.
//!
//! ```text
//! SALT (16) | NONCE (12) | CIPHERTEXT || TAG (16)
//! ```
//!
//! There is no magic number and no version field: any input of at least
//! [`HEADER_LEN`] bytes is a candidate and is only rejected once tag
//! verification fails.

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::{Error, Result};

/// Length of the fixed header preceding the ciphertext.
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// A parsed encrypted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Container {
    pub fn new(salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serializes to `salt || nonce || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());

        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.ciphertext);

        buf
    }

    /// Splits raw bytes into salt, nonce and ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainer`] if `data` is shorter than
    /// [`HEADER_LEN`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(Error::InvalidContainer { len: data.len() });
        }

        let (salt, rest) = data.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let salt: [u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| Error::InvalidContainer { len: data.len() })?;
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| Error::InvalidContainer { len: data.len() })?;

        Ok(Self::new(salt, nonce, ciphertext.to_vec()))
    }
}
