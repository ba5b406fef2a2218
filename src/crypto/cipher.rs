// Strongbox — AES-256-GCM cipher
//
// Seals and opens single secrets. The nonce is always drawn from the CSPRNG
// inside `encrypt`; callers cannot supply one. No associated data is bound.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use rand::RngCore;
use zeroize::Zeroizing;

use super::{CryptoError, EncryptedRecord, SymmetricKey, NONCE_LEN, TAG_LEN};

/// Seal `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<EncryptedRecord, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(format!("invalid key: {}", e)))?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CryptoError::EncryptionFailed("AES-GCM seal failed".to_string()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(EncryptedRecord {
        ciphertext: buffer,
        nonce,
        tag: tag_bytes,
    })
}

/// Open `record` under `key`. Any tag mismatch is `AuthenticationFailure` and
/// no plaintext is returned.
pub fn decrypt(key: &SymmetricKey, record: &EncryptedRecord) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(format!("invalid key: {}", e)))?;

    let mut buffer = Zeroizing::new(record.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&record.nonce),
            b"",
            &mut *buffer,
            Tag::from_slice(&record.tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailure)?;

    Ok(buffer)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
