//! Cryptographic primitives for encrypted files.
//!
//! Provides key derivation, secure randomness and authenticated encryption.
//! The sizes and the iteration count below are part of the file format:
//! changing any of them makes previously written files undecryptable.

pub mod aead;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_nonce, generate_salt};
pub use kdf::derive_key;

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (12 bytes for AES-256-GCM).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;
/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
