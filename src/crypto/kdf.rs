use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};

/// Derive the file encryption key from a passphrase and salt.
///
/// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds. The same inputs
/// always produce the same key, which is how decryption recovers the key
/// from the stored salt.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut *key);
    key
}
