use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::HEADER_LEN;

/// Errors returned by the encryption core and the file layer.
///
/// Display texts never include the passphrase, the derived key or any
/// plaintext.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS random generator could not provide salt or nonce bytes.
    #[error("OS random generator unavailable")]
    RandomnessUnavailable,

    /// Input is too short to hold a salt and a nonce.
    #[error("invalid encrypted file: {len} bytes, expected at least {}", HEADER_LEN)]
    InvalidContainer { len: usize },

    /// Tag verification failed. A wrong passphrase and tampered data both
    /// end up here and must stay indistinguishable.
    #[error("invalid password or corrupted data")]
    AuthenticationFailed,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for failures of the cryptographic core, as opposed to
    /// filesystem or usage problems.
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Error::RandomnessUnavailable | Error::InvalidContainer { .. } | Error::AuthenticationFailed
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
