//! Passphrase-based artifact encryption.
//!
//! Artifact format V1:
//!
//! ```text
//! [ Magic: "DVLT" (4) ]
//! [ Version: u16 be (2) ]
//! [ Salt: 16B ]
//! [ Nonce: 12B ]
//! [ Ciphertext + Tag: N + 16 ]
//! ```
//!
//! The key is derived per artifact from the passphrase and the stored salt
//! with Argon2id; the ciphertext is ChaCha20Poly1305. A wrong passphrase or
//! any tampering surfaces as an authentication failure on decrypt.

use crate::error::{CryptoError, CryptoResult};
use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

const MAGIC: &[u8; 4] = b"DVLT";
const VERSION: u16 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 4 + 2 + SALT_LEN + NONCE_LEN;

/// Capability contract for encrypting artifact bytes.
///
/// Synchronous, whole-buffer; no streaming contract.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>>;
    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// Passphrase-backed [`Encryptor`] producing the V1 artifact format.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PassphraseEncryptor {
    passphrase: String,
}

impl PassphraseEncryptor {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    fn derive_key(&self, salt: &[u8]) -> CryptoResult<[u8; KEY_LEN]> {
        let mut key = [0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(self.passphrase.as_bytes(), salt, &mut key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(key)
    }
}

impl Encryptor for PassphraseEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce_bytes);

        let mut key = self.derive_key(&salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| CryptoError::Encryption);
        key.zeroize();
        let ciphertext = ciphertext?;

        // Stable, endian-independent on-disk layout
        let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        output.extend_from_slice(MAGIC);
        output.extend_from_slice(&VERSION.to_be_bytes());
        output.extend_from_slice(&salt);
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);

        Ok(output)
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        if data.len() < HEADER_LEN {
            return Err(CryptoError::InvalidInput("artifact too short".into()));
        }

        if &data[0..4] != MAGIC {
            return Err(CryptoError::InvalidInput("invalid artifact signature".into()));
        }

        let version = u16::from_be_bytes([data[4], data[5]]);
        if version != VERSION {
            return Err(CryptoError::InvalidInput(format!(
                "unsupported artifact version: {}",
                version
            )));
        }

        let salt = &data[6..6 + SALT_LEN];
        let nonce_bytes = &data[6 + SALT_LEN..HEADER_LEN];
        let ciphertext = &data[HEADER_LEN..];

        let mut key = self.derive_key(salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::Decryption);
        key.zeroize();

        plaintext
    }
}
