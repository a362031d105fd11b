//! Payload encryption
//!
//! The [`Encrypter`] trait is the seam between the payload codec and the
//! cipher. [`AesGcmEncrypter`] is the implementation used by the CLI.

pub mod aes;

pub use aes::{generate_key_base64, AesGcmEncrypter};

use crate::domain::CryptoError;

/// Symmetric encryption of job payloads
///
/// Implementations must be usable from many jobs at once and hold only
/// immutable key material.
pub trait Encrypter: Send + Sync {
    /// Encrypts `plaintext`
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts data produced by [`Encrypter::encrypt`]
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, CryptoError>;
}
