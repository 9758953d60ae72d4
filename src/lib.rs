//! Password-based file encryption.
//!
//! A passphrase is stretched with PBKDF2-HMAC-SHA256 over a fresh random
//! salt, and the data is sealed with AES-256-GCM under a fresh random
//! nonce. The result is a self-contained byte buffer laid out as described
//! in [`container`]. Every operation works on whole in-memory buffers and
//! holds no state between calls, so independent files may be processed on
//! as many threads as the caller likes.

pub mod container;
pub mod crypto;
mod error;
mod storage;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use crate::container::Container;
pub use crate::error::{Error, Result};
use crate::storage::Storage;
use zeroize::Zeroizing;

/// Suffix appended to encrypted files.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Encrypts `plaintext` under `passphrase` and returns the container bytes.
///
/// Each call draws a new salt and nonce, so encrypting the same input twice
/// yields different output.
///
/// # Errors
///
/// Returns [`Error::RandomnessUnavailable`] if the OS random source fails.
pub fn encrypt(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
    let salt = crypto::generate_salt()?;
    let nonce = crypto::generate_nonce()?;

    let key = crypto::derive_key(passphrase.as_bytes(), &salt);
    let ciphertext = crypto::encrypt(&key, &nonce, plaintext)?;
    drop(key);

    let container = Container::new(salt, nonce, ciphertext).to_bytes();
    tracing::debug!(
        plaintext_len = plaintext.len(),
        container_len = container.len(),
        "encrypted"
    );
    Ok(container)
}

/// Decrypts container bytes produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`Error::InvalidContainer`] if `data` is too short to be a
/// container, and [`Error::AuthenticationFailed`] if the passphrase is wrong
/// or the data was modified.
pub fn decrypt(passphrase: &str, data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let container = Container::parse(data)?;

    let key = crypto::derive_key(passphrase.as_bytes(), container.salt());
    let plaintext = crypto::decrypt(&key, container.nonce(), container.ciphertext())?;

    tracing::debug!(
        container_len = data.len(),
        plaintext_len = plaintext.len(),
        "decrypted"
    );
    Ok(plaintext)
}

/// Returns the default output path for encrypting `input`: `input.enc`.
pub fn encrypted_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// Returns the default output path for decrypting `input` by removing its
/// `.enc` suffix.
///
/// # Errors
///
/// Returns [`Error::Usage`] if `input` does not end in `.enc` or nothing
/// would be left after removing it; writing next to the input would
/// otherwise overwrite it.
pub fn decrypted_path(input: &Path) -> Result<PathBuf> {
    let suffix = ENCRYPTED_SUFFIX.trim_start_matches('.');

    if input.extension().is_some_and(|ext| ext == suffix) {
        return Ok(input.with_extension(""));
    }

    Err(Error::Usage(format!(
        "{} has no {ENCRYPTED_SUFFIX} suffix; pass an explicit output path",
        input.display()
    )))
}

/// Encrypts the file at `input` and writes the container to `output`, or to
/// [`encrypted_path`] when no output is given. Returns the written path.
pub fn encrypt_file(passphrase: &str, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => encrypted_path(input),
    };
    let _span = tracing::debug_span!("encrypt_file", input = %input.display()).entered();

    let plaintext = Zeroizing::new(Storage::new(input).load()?);
    let container = encrypt(passphrase, &plaintext)?;
    Storage::new(&output).save(&container)?;

    Ok(output)
}

/// Decrypts the file at `input` and writes the plaintext to `output`, or to
/// [`decrypted_path`] when no output is given. Returns the written path.
///
/// Nothing is written unless decryption succeeds.
pub fn decrypt_file(passphrase: &str, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => decrypted_path(input)?,
    };
    let _span = tracing::debug_span!("decrypt_file", input = %input.display()).entered();

    let data = Storage::new(input).load()?;
    let plaintext = decrypt(passphrase, &data)?;
    Storage::new(&output).save(&plaintext)?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::HEADER_LEN;
    use crate::crypto::TAG_LEN;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn hello_world_scenario() {
        let container = encrypt("correct horse", b"hello world").unwrap();
        assert_eq!(container.len(), 55);

        let plaintext = decrypt("correct horse", &container).unwrap();
        assert_eq!(plaintext.as_slice(), b"hello world");

        assert!(matches!(
            decrypt("wrong horse", &container),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let container = encrypt("pw", b"").unwrap();
        assert_eq!(container.len(), HEADER_LEN + TAG_LEN);

        assert!(decrypt("pw", &container).unwrap().is_empty());
    }

    #[test]
    fn encrypting_twice_differs() {
        let a = encrypt("pw", b"same").unwrap();
        let b = encrypt("pw", b"same").unwrap();

        assert_ne!(a, b);
        assert_ne!(a[..16], b[..16]);
        assert_ne!(a[16..28], b[16..28]);
    }

    #[test]
    fn short_input_fails_before_any_crypto() {
        assert!(matches!(
            decrypt("pw", &[0u8; HEADER_LEN - 1]),
            Err(Error::InvalidContainer { len: 27 })
        ));
    }

    #[test]
    fn corrupted_salt_or_nonce_fails_authentication() {
        let container = encrypt("pw", b"secret").unwrap();

        for index in [0, 15, 16, 27] {
            let mut tampered = container.clone();
            tampered[index] ^= 0x01;
            assert!(matches!(
                decrypt("pw", &tampered),
                Err(Error::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn header_only_input_fails_authentication() {
        assert!(matches!(
            decrypt("pw", &[0u8; HEADER_LEN]),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn errors_do_not_leak_passphrase() {
        let container = encrypt("hunter2-secret", b"plain words").unwrap();
        let err = decrypt("hunter3-secret", &container).unwrap_err();

        let msg = format!("{err} {err:?}");
        assert!(!msg.contains("hunter"));
        assert!(!msg.contains("plain words"));
    }

    #[test]
    fn default_output_paths() {
        assert_eq!(
            encrypted_path(Path::new("dir/report.pdf")),
            PathBuf::from("dir/report.pdf.enc")
        );
        assert_eq!(
            decrypted_path(Path::new("dir/report.pdf.enc")).unwrap(),
            PathBuf::from("dir/report.pdf")
        );
        assert!(matches!(
            decrypted_path(Path::new("dir/report.pdf")),
            Err(Error::Usage(_))
        ));
        assert_eq!(
            decrypted_path(Path::new("archive.tar.enc")).unwrap(),
            PathBuf::from("archive.tar")
        );
        assert!(decrypted_path(Path::new(".enc")).is_err());
        assert!(decrypted_path(Path::new("dir/.enc")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_keep_their_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"dir/caf\xe9.txt.enc"));
        let output = decrypted_path(input).unwrap();

        assert_eq!(output.as_os_str().as_bytes(), b"dir/caf\xe9.txt");

        let plain = Path::new(OsStr::from_bytes(b"dir/caf\xe9.txt"));
        assert_eq!(encrypted_path(plain).as_os_str().as_bytes(), b"dir/caf\xe9.txt.enc");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"file contents").unwrap();

        let encrypted = encrypt_file("pw", &input, None).unwrap();
        assert_eq!(encrypted, dir.path().join("notes.txt.enc"));

        fs::remove_file(&input).unwrap();

        let decrypted = decrypt_file("pw", &encrypted, None).unwrap();
        assert_eq!(decrypted, input);
        assert_eq!(fs::read(&input).unwrap(), b"file contents");
    }

    #[test]
    fn failed_decrypt_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, b"file contents").unwrap();
        let encrypted = encrypt_file("pw", &input, None).unwrap();
        fs::remove_file(&input).unwrap();

        assert!(matches!(
            decrypt_file("wrong", &encrypted, None),
            Err(Error::AuthenticationFailed)
        ));
        assert!(!input.exists());
    }

    #[test]
    fn explicit_output_path_is_used() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data.bin");
        let sealed = dir.path().join("sealed");
        let opened = dir.path().join("opened");
        fs::write(&input, [0u8, 1, 2, 255]).unwrap();

        assert_eq!(encrypt_file("pw", &input, Some(&sealed)).unwrap(), sealed);
        assert_eq!(decrypt_file("pw", &sealed, Some(&opened)).unwrap(), opened);
        assert_eq!(fs::read(opened).unwrap(), [0u8, 1, 2, 255]);
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let err = encrypt_file("pw", &dir.path().join("absent"), None).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(!err.is_crypto());
    }
}
