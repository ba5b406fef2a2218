// Strongbox — Encrypted record envelope
//
// Persisted form of one sealed secret. The envelope is a small JSON object
// carrying a format marker and version so a reader can always tell our
// records apart from foreign or legacy bytes:
//
//   {"format":"strongbox/aes-256-gcm","version":1,
//    "nonce":"<b64>","ciphertext":"<b64>","tag":"<b64>"}

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::CryptoError;

/// Marker written into every envelope.
pub const FORMAT_MARKER: &str = "strongbox/aes-256-gcm";

/// Current (and only supported) envelope version.
pub const FORMAT_VERSION: u32 = 1;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// One sealed secret: ciphertext plus the nonce and detached tag it was sealed with.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    nonce: String,
    ciphertext: String,
    tag: String,
}

/// Only the marker; used to sniff blobs without requiring the full shape.
#[derive(Deserialize)]
struct MarkerProbe {
    format: String,
}

impl EncryptedRecord {
    /// Serialize into the versioned envelope.
    pub fn encode(&self) -> Result<Vec<u8>, CryptoError> {
        let envelope = Envelope {
            format: FORMAT_MARKER.to_string(),
            version: FORMAT_VERSION,
            nonce: BASE64.encode(self.nonce),
            ciphertext: BASE64.encode(&self.ciphertext),
            tag: BASE64.encode(self.tag),
        };
        serde_json::to_vec(&envelope)
            .map_err(|e| CryptoError::EncryptionFailed(format!("envelope encoding failed: {}", e)))
    }

    /// Parse an envelope. Any structural problem is `MalformedRecord`.
    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| CryptoError::MalformedRecord(format!("not an envelope: {}", e)))?;

        if envelope.format != FORMAT_MARKER {
            return Err(CryptoError::MalformedRecord(format!(
                "unknown format marker '{}'",
                envelope.format
            )));
        }
        if envelope.version != FORMAT_VERSION {
            return Err(CryptoError::MalformedRecord(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }

        let nonce = decode_fixed::<NONCE_LEN>("nonce", &envelope.nonce)?;
        let tag = decode_fixed::<TAG_LEN>("tag", &envelope.tag)?;
        let ciphertext = BASE64
            .decode(envelope.ciphertext.as_bytes())
            .map_err(|e| CryptoError::MalformedRecord(format!("ciphertext is not base64: {}", e)))?;

        Ok(Self {
            ciphertext,
            nonce,
            tag,
        })
    }

    /// True when `bytes` is a JSON object carrying our format marker, whether
    /// or not the rest of the envelope is intact.
    pub fn carries_marker(bytes: &[u8]) -> bool {
        serde_json::from_slice::<MarkerProbe>(bytes)
            .map(|probe| probe.format == FORMAT_MARKER)
            .unwrap_or(false)
    }
}

fn decode_fixed<const N: usize>(field: &str, encoded: &str) -> Result<[u8; N], CryptoError> {
    let raw = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| CryptoError::MalformedRecord(format!("{} is not base64: {}", field, e)))?;
    raw.as_slice().try_into().map_err(|_| {
        CryptoError::MalformedRecord(format!("{} must be {} bytes, got {}", field, N, raw.len()))
    })
}

impl std::fmt::Debug for EncryptedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedRecord")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("nonce", &self.nonce)
            .field("tag", &self.tag)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncryptedRecord {
        EncryptedRecord {
            ciphertext: b"opaque-bytes".to_vec(),
            nonce: [1u8; NONCE_LEN],
            tag: [2u8; TAG_LEN],
        }
    }

    fn envelope_with(nonce: &str, tag: &str, version: u32, format: &str) -> Vec<u8> {
        serde_json::json!({
            "format": format,
            "version": version,
            "nonce": nonce,
            "ciphertext": BASE64.encode(b"abc"),
            "tag": tag,
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_encode_writes_marker_and_version() {
        let bytes = sample().encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["format"], FORMAT_MARKER);
        assert_eq!(value["version"], FORMAT_VERSION);
        assert!(EncryptedRecord::carries_marker(&bytes));
    }

    #[test]
    fn test_decode_restores_fields() {
        let record = sample();
        let decoded = EncryptedRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_plaintext() {
        let err = EncryptedRecord::decode(b"a@b.com").unwrap_err();
        assert!(matches!(err, CryptoError::MalformedRecord(_)));
        assert!(!EncryptedRecord::carries_marker(b"a@b.com"));
    }

    #[test]
    fn test_decode_rejects_foreign_marker() {
        let nonce = BASE64.encode([0u8; NONCE_LEN]);
        let tag = BASE64.encode([0u8; TAG_LEN]);
        let bytes = envelope_with(&nonce, &tag, FORMAT_VERSION, "someone-else/v1");
        assert!(matches!(
            EncryptedRecord::decode(&bytes),
            Err(CryptoError::MalformedRecord(_))
        ));
        assert!(!EncryptedRecord::carries_marker(&bytes));
    }

    #[test]
    fn test_decode_rejects_unsupported_version() {
        let nonce = BASE64.encode([0u8; NONCE_LEN]);
        let tag = BASE64.encode([0u8; TAG_LEN]);
        let bytes = envelope_with(&nonce, &tag, 2, FORMAT_MARKER);
        let err = EncryptedRecord::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("version 2"), "got: {}", err);
        assert!(EncryptedRecord::carries_marker(&bytes), "Marker is present even if version is not");
    }

    #[test]
    fn test_decode_rejects_wrong_nonce_length() {
        let nonce = BASE64.encode([0u8; 8]);
        let tag = BASE64.encode([0u8; TAG_LEN]);
        let err = EncryptedRecord::decode(&envelope_with(&nonce, &tag, 1, FORMAT_MARKER)).unwrap_err();
        assert!(err.to_string().contains("nonce must be 12 bytes"), "got: {}", err);
    }

    #[test]
    fn test_decode_rejects_wrong_tag_length() {
        let nonce = BASE64.encode([0u8; NONCE_LEN]);
        let tag = BASE64.encode([0u8; 15]);
        let err = EncryptedRecord::decode(&envelope_with(&nonce, &tag, 1, FORMAT_MARKER)).unwrap_err();
        assert!(err.to_string().contains("tag must be 16 bytes"), "got: {}", err);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let tag = BASE64.encode([0u8; TAG_LEN]);
        let err =
            EncryptedRecord::decode(&envelope_with("!!not-base64!!", &tag, 1, FORMAT_MARKER)).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedRecord(_)));
    }
}
