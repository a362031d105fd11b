//! Job payload encoding
//!
//! An export request is stored on its job as
//! `base64(encrypt(json({"version":1,"request":{..}})))`. The access token
//! inside the request therefore never reaches job storage in clear text.

use crate::adapters::crypto::Encrypter;
use crate::domain::{DecodingError, EncodingError, ExportRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payload format version written by [`PayloadCodec::encode`]
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Serialize)]
struct PayloadRef<'a> {
    version: u32,
    request: &'a ExportRequest,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

#[derive(Deserialize)]
struct Payload {
    request: ExportRequest,
}

/// Converts export requests to opaque job data and back
#[derive(Clone)]
pub struct PayloadCodec {
    encrypter: Arc<dyn Encrypter>,
}

impl PayloadCodec {
    /// Create a codec using `encrypter`
    pub fn new(encrypter: Arc<dyn Encrypter>) -> Self {
        Self { encrypter }
    }

    /// Encodes a request into job data
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::Serialization` or `EncodingError::Encryption`
    pub fn encode(&self, request: &ExportRequest) -> Result<String, EncodingError> {
        let json = serde_json::to_string(&PayloadRef {
            version: PAYLOAD_VERSION,
            request,
        })
        .map_err(|e| EncodingError::Serialization(e.to_string()))?;

        let sealed = self
            .encrypter
            .encrypt(json.trim())
            .map_err(|e| EncodingError::Encryption(e.to_string()))?;

        Ok(STANDARD.encode(sealed))
    }

    /// Decodes job data produced by [`PayloadCodec::encode`]
    ///
    /// # Errors
    ///
    /// Returns the [`DecodingError`] variant matching the stage that failed
    pub fn decode(&self, data: &str) -> Result<ExportRequest, DecodingError> {
        let sealed = STANDARD
            .decode(data.trim())
            .map_err(|e| DecodingError::MalformedBase64(e.to_string()))?;

        let json = self
            .encrypter
            .decrypt(&sealed)
            .map_err(|e| DecodingError::Decryption(e.to_string()))?;

        let probe: VersionProbe = serde_json::from_str(&json)
            .map_err(|e| DecodingError::MalformedPayload(e.to_string()))?;
        if probe.version != PAYLOAD_VERSION {
            return Err(DecodingError::UnsupportedVersion(probe.version));
        }

        let payload: Payload = serde_json::from_str(&json)
            .map_err(|e| DecodingError::MalformedPayload(e.to_string()))?;

        Ok(payload.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::crypto::{generate_key_base64, AesGcmEncrypter};
    use crate::config::secret_string;
    use crate::domain::{CryptoError, RepositoryId, TargetAccount};

    /// Reversible stand-in that lets tests read the plaintext
    struct PlainEncrypter;

    impl Encrypter for PlainEncrypter {
        fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
            Ok(plaintext.as_bytes().to_vec())
        }

        fn decrypt(&self, ciphertext: &[u8]) -> Result<String, CryptoError> {
            String::from_utf8(ciphertext.to_vec())
                .map_err(|e| CryptoError::DecryptFailed(e.to_string()))
        }
    }

    struct BrokenEncrypter;

    impl Encrypter for BrokenEncrypter {
        fn encrypt(&self, _plaintext: &str) -> Result<Vec<u8>, CryptoError> {
            Err(CryptoError::KeyUnavailable("no key".to_string()))
        }

        fn decrypt(&self, _ciphertext: &[u8]) -> Result<String, CryptoError> {
            Err(CryptoError::KeyUnavailable("no key".to_string()))
        }
    }

    fn request() -> ExportRequest {
        ExportRequest {
            uid: "svc-a".to_string(),
            id: RepositoryId::new(42),
            description: "service A".to_string(),
            is_public: false,
            target_account: TargetAccount::new(
                "acc-1",
                "org-1",
                "proj-1",
                secret_string("pat-123".to_string()),
            ),
        }
    }

    fn aes_codec() -> PayloadCodec {
        let key = secret_string(generate_key_base64());
        PayloadCodec::new(Arc::new(AesGcmEncrypter::from_base64(&key).unwrap()))
    }

    #[test]
    fn test_roundtrip_with_aes() {
        let codec = aes_codec();
        let data = codec.encode(&request()).unwrap();
        assert_eq!(codec.decode(&data).unwrap(), request());
    }

    #[test]
    fn test_encoded_data_hides_token() {
        let data = aes_codec().encode(&request()).unwrap();
        let raw = STANDARD.decode(&data).unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("pat-123"));
    }

    #[test]
    fn test_plaintext_is_versioned() {
        let codec = PayloadCodec::new(Arc::new(PlainEncrypter));
        let data = codec.encode(&request()).unwrap();
        let json = String::from_utf8(STANDARD.decode(data).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["request"]["uid"], "svc-a");
        assert_eq!(value["request"]["target_account"]["token"], "pat-123");
    }

    #[test]
    fn test_unsupported_version() {
        let codec = PayloadCodec::new(Arc::new(PlainEncrypter));
        let data = STANDARD.encode(r#"{"version":2,"request":{}}"#);
        let result = codec.decode(&data);
        assert!(matches!(result, Err(DecodingError::UnsupportedVersion(2))));
    }

    #[test]
    fn test_malformed_base64() {
        let result = aes_codec().decode("%%% not base64 %%%");
        assert!(matches!(result, Err(DecodingError::MalformedBase64(_))));
    }

    #[test]
    fn test_wrong_key_is_decryption_error() {
        let data = aes_codec().encode(&request()).unwrap();
        let result = aes_codec().decode(&data);
        assert!(matches!(result, Err(DecodingError::Decryption(_))));
    }

    #[test]
    fn test_malformed_payload() {
        let codec = PayloadCodec::new(Arc::new(PlainEncrypter));
        let data = STANDARD.encode(r#"{"version":1,"request":{"uid":"x"}}"#);
        assert!(matches!(
            codec.decode(&data),
            Err(DecodingError::MalformedPayload(_))
        ));

        let data = STANDARD.encode("not json");
        assert!(matches!(
            codec.decode(&data),
            Err(DecodingError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_encryption_failure() {
        let codec = PayloadCodec::new(Arc::new(BrokenEncrypter));
        assert!(matches!(
            codec.encode(&request()),
            Err(EncodingError::Encryption(_))
        ));
    }
}
