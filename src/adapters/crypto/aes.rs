//! AES-256-GCM payload encryption
//!
//! Output layout:
//!
//! ```text
//! [Version: 1 byte] [Nonce: 12 bytes] [Ciphertext + Tag: N bytes]
//! ```

use super::Encrypter;
use crate::config::SecretString;
use crate::domain::CryptoError;
use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

const FORMAT_VERSION: u8 = 0x01;
const NONCE_SIZE: usize = 12;
const HEADER_SIZE: usize = 1 + NONCE_SIZE;
const KEY_SIZE: usize = 32;

/// AES-256-GCM implementation of [`Encrypter`]
///
/// # Examples
///
/// ```
/// use gitport::adapters::crypto::{generate_key_base64, AesGcmEncrypter, Encrypter};
/// use gitport::config::secret_string;
///
/// let key = secret_string(generate_key_base64());
/// let encrypter = AesGcmEncrypter::from_base64(&key).unwrap();
///
/// let sealed = encrypter.encrypt("hello").unwrap();
/// assert_eq!(encrypter.decrypt(&sealed).unwrap(), "hello");
/// ```
pub struct AesGcmEncrypter {
    cipher: Aes256Gcm,
}

impl AesGcmEncrypter {
    /// Builds an encrypter from raw key bytes
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyUnavailable` if the key is not 32 bytes long
    pub fn from_key(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::KeyUnavailable(format!(
                "key must be {KEY_SIZE} bytes, got {}",
                key.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::KeyUnavailable(format!("failed to initialize cipher: {e}")))?;

        Ok(Self { cipher })
    }

    /// Builds an encrypter from a base64-encoded key
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyUnavailable` if the key is not valid base64 or
    /// does not decode to 32 bytes
    pub fn from_base64(key: &SecretString) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(key.expose_secret().as_str().trim())
                .map_err(|e| CryptoError::KeyUnavailable(format!("invalid base64 key: {e}")))?,
        );

        Self::from_key(&bytes)
    }
}

impl std::fmt::Debug for AesGcmEncrypter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmEncrypter")
            .field("algorithm", &"AES-256-GCM")
            .finish()
    }
}

impl Encrypter for AesGcmEncrypter {
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::EncryptFailed(e.to_string()))?;

        let mut output = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        output.push(FORMAT_VERSION);
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);

        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, CryptoError> {
        if ciphertext.len() < HEADER_SIZE {
            return Err(CryptoError::DecryptFailed(
                "data too short to be encrypted".to_string(),
            ));
        }

        if ciphertext[0] != FORMAT_VERSION {
            return Err(CryptoError::DecryptFailed(format!(
                "unsupported encryption format version: {}",
                ciphertext[0]
            )));
        }

        let nonce = Nonce::from_slice(&ciphertext[1..HEADER_SIZE]);
        let plaintext = self
            .cipher
            .decrypt(nonce, &ciphertext[HEADER_SIZE..])
            .map_err(|e| {
                CryptoError::DecryptFailed(format!("wrong key or corrupted data: {e}"))
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::DecryptFailed(format!("plaintext is not UTF-8: {e}")))
    }
}

/// Generates a fresh random key, base64 encoded
pub fn generate_key_base64() -> String {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut key[..]);
    STANDARD.encode(&key[..])
}
