//! encryption module
//!
//! AES-256-GCM sealing for the credential fallback file. The key is not user supplied: it is
//! derived from stable properties of the current user and machine, so a file copied to another
//! machine (or account) does not decrypt.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

const PBKDF2_ITERATIONS: u32 = 100_000;
const KEY_SALT: &[u8] = b"saastf-mcp/credential-file/v1";
const NONCE_LENGTH: usize = 12;
const KEY_LENGTH: usize = 32; // AES-256

/// Symmetric key for the fallback file.
pub type MachineKey = [u8; KEY_LENGTH];

/// On-disk record: hex nonce plus hex ciphertext (GCM tag appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSecret {
    pub iv: String,
    pub encrypted: String,
}

/// Stable identifier for the current user on this machine.
pub fn machine_identity(service_name: &str) -> String {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{home}|{}|{}|{service_name}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Derive the file key. Slow by construction; call once and keep the result.
pub fn derive_machine_key(machine_id: &str) -> MachineKey {
    pbkdf2_hmac_array::<Sha256, KEY_LENGTH>(machine_id.as_bytes(), KEY_SALT, PBKDF2_ITERATIONS)
}

/// Encrypt with a fresh random nonce.
pub fn seal(plaintext: &[u8], key: &MachineKey) -> CoreResult<SealedSecret> {
    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rand::rng().fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::SerializationError(format!("Failed to create cipher: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CoreError::SerializationError(format!("Encryption failed: {e}")))?;

    Ok(SealedSecret {
        iv: hex::encode(nonce_bytes),
        encrypted: hex::encode(ciphertext),
    })
}

/// Decrypt and authenticate a sealed record.
pub fn open(sealed: &SealedSecret, key: &MachineKey) -> CoreResult<Vec<u8>> {
    let nonce_bytes = hex::decode(&sealed.iv)
        .map_err(|e| CoreError::DecryptionFailed(format!("Invalid iv: {e}")))?;
    if nonce_bytes.len() != NONCE_LENGTH {
        return Err(CoreError::DecryptionFailed(format!(
            "Invalid iv length: expected {NONCE_LENGTH} bytes, got {}",
            nonce_bytes.len()
        )));
    }
    let ciphertext = hex::decode(&sealed.encrypted)
        .map_err(|e| CoreError::DecryptionFailed(format!("Invalid ciphertext: {e}")))?;

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::SerializationError(format!("Failed to create cipher: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| {
            CoreError::DecryptionFailed("wrong machine key or corrupted data".to_string())
        })
}
