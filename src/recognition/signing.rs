//! Request signing for the identification endpoint.
//!
//! Every request carries an HMAC-SHA1 signature over a newline-joined
//! string of the method, path, access key, data type, signature version
//! and Unix timestamp. The digest is base64 encoded (standard alphabet,
//! padded). A fresh timestamp is used per request, so signatures are
//! never reused.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::domain::{ProviderCredentials, RecognitionError};

type HmacSha1 = Hmac<Sha1>;

/// HTTP method used for identification
pub const HTTP_METHOD: &str = "POST";
/// Provider path for identification
pub const IDENTIFY_PATH: &str = "/v1/identify";
/// We always send raw audio, never pre-computed fingerprints
pub const DATA_TYPE: &str = "audio";
pub const SIGNATURE_VERSION: &str = "1";

/// The signed fields sent alongside a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub access_key: String,
    pub data_type: &'static str,
    pub signature_version: &'static str,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    pub signature: String,
}

impl SignedRequest {
    /// Sign a request for the given credentials at `timestamp`.
    pub fn sign(
        credentials: &ProviderCredentials,
        timestamp: i64,
    ) -> Result<Self, RecognitionError> {
        let payload = string_to_sign(&credentials.access_key, timestamp);
        let signature = build_signature(&payload, &credentials.access_secret)?;

        Ok(Self {
            method: HTTP_METHOD,
            path: IDENTIFY_PATH,
            access_key: credentials.access_key.clone(),
            data_type: DATA_TYPE,
            signature_version: SIGNATURE_VERSION,
            timestamp,
            signature,
        })
    }

    /// Sign a request stamped with the current time.
    pub fn sign_now(credentials: &ProviderCredentials) -> Result<Self, RecognitionError> {
        Self::sign(credentials, chrono::Utc::now().timestamp())
    }
}

/// Build the string the provider expects us to sign.
pub fn string_to_sign(access_key: &str, timestamp: i64) -> String {
    [
        HTTP_METHOD,
        IDENTIFY_PATH,
        access_key,
        DATA_TYPE,
        SIGNATURE_VERSION,
        &timestamp.to_string(),
    ]
    .join("\n")
}

/// HMAC-SHA1 `string_to_sign` with `secret`, base64 encoded.
pub fn build_signature(string_to_sign: &str, secret: &str) -> Result<String, RecognitionError> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| RecognitionError::Signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            host: "identify.example.com".to_string(),
            access_key: "abc123".to_string(),
            access_secret: "s3cr3t".to_string(),
        }
    }

    #[test]
    fn test_string_to_sign_layout() {
        let payload = string_to_sign("abc123", 1_700_000_000);
        assert_eq!(payload, "POST\n/v1/identify\nabc123\naudio\n1\n1700000000");
    }

    #[test]
    fn test_known_signature() {
        // RFC 2202 test case 2
        let sig = build_signature("what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(sig, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }

    #[test]
    fn test_sign_fills_fixed_fields() {
        let req = SignedRequest::sign(&credentials(), 42).unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/v1/identify");
        assert_eq!(req.access_key, "abc123");
        assert_eq!(req.data_type, "audio");
        assert_eq!(req.signature_version, "1");
        assert_eq!(req.timestamp, 42);
        assert_eq!(
            req.signature,
            build_signature(&string_to_sign("abc123", 42), "s3cr3t").unwrap()
        );
    }

    #[test]
    fn test_empty_secret_still_signs() {
        // HMAC accepts any key length, including zero
        assert!(build_signature("payload", "").is_ok());
    }

    proptest! {
        /// Same inputs always give the same signature
        #[test]
        fn signature_is_deterministic(payload in ".*", secret in ".*") {
            let a = build_signature(&payload, &secret).unwrap();
            let b = build_signature(&payload, &secret).unwrap();
            prop_assert_eq!(a, b);
        }

        /// The signature always decodes to a SHA-1 sized digest
        #[test]
        fn signature_decodes_to_digest_size(payload in ".*", secret in ".*") {
            let sig = build_signature(&payload, &secret).unwrap();
            let decoded = STANDARD.decode(sig).unwrap();
            prop_assert_eq!(decoded.len(), 20);
        }

        /// Changing only the timestamp changes the signature
        #[test]
        fn signature_depends_on_timestamp(t1 in 0i64..4_000_000_000, t2 in 0i64..4_000_000_000) {
            prop_assume!(t1 != t2);
            let creds = credentials();
            let a = SignedRequest::sign(&creds, t1).unwrap();
            let b = SignedRequest::sign(&creds, t2).unwrap();
            prop_assert_ne!(a.signature, b.signature);
        }
    }
}
