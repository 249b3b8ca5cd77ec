//! Encrypted-file secret backend

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OnceCell};

use crate::crypto::{self, MachineKey, SealedSecret};
use crate::error::{CoreError, CoreResult};
use crate::traits::SecretBackend;

/// Stores the secret AES-256-GCM sealed in a single owner-only JSON file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// failed write leaves the previous record intact. All file access from this
/// instance is serialized by one lock.
pub struct EncryptedFileBackend {
    path: PathBuf,
    machine_id: String,
    key: OnceCell<MachineKey>,
    io_lock: Mutex<()>,
}

impl EncryptedFileBackend {
    /// Backend keyed by the current user and machine.
    pub fn new(path: impl Into<PathBuf>, service_name: &str) -> Self {
        Self::with_machine_id(path, crypto::machine_identity(service_name))
    }

    /// Backend keyed by an explicit machine identifier.
    pub fn with_machine_id(path: impl Into<PathBuf>, machine_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            machine_id: machine_id.into(),
            key: OnceCell::new(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn key(&self) -> CoreResult<&MachineKey> {
        self.key
            .get_or_try_init(|| async {
                let machine_id = self.machine_id.clone();
                tokio::task::spawn_blocking(move || crypto::derive_machine_key(&machine_id))
                    .await
                    .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))
            })
            .await
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir(&self) -> CoreResult<()> {
        let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        if tokio::fs::try_exists(dir).await.unwrap_or(false) {
            return Ok(());
        }

        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to create {}: {e}", dir.display()))
        })?;
        set_mode(dir, 0o700).await
    }

    async fn write_private(&self, bytes: &[u8]) -> CoreResult<()> {
        let tmp = self.temp_path();
        let io_err = |e: std::io::Error| {
            CoreError::StorageError(format!("Failed to write {}: {e}", tmp.display()))
        };

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp).await.map_err(io_err)?;
        file.write_all(bytes).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);
        set_mode(&tmp, 0o600).await?;

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to replace {}: {e}", self.path.display()))
        })
    }
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> CoreResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| {
            CoreError::StorageError(format!("Failed to restrict {}: {e}", path.display()))
        })
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> CoreResult<()> {
    Ok(())
}

#[async_trait]
impl SecretBackend for EncryptedFileBackend {
    fn name(&self) -> &'static str {
        "encrypted-file"
    }

    async fn load(&self) -> CoreResult<Option<String>> {
        let raw = {
            let _guard = self.io_lock.lock().await;
            match tokio::fs::read_to_string(&self.path).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    return Err(CoreError::StorageError(format!(
                        "Failed to read {}: {e}",
                        self.path.display()
                    )));
                }
            }
        };

        let sealed: SealedSecret = serde_json::from_str(&raw)
            .map_err(|e| CoreError::DecryptionFailed(format!("Malformed credential file: {e}")))?;
        let plaintext = crypto::open(&sealed, self.key().await?)?;

        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|_| CoreError::DecryptionFailed("Credential is not valid UTF-8".to_string()))
    }

    async fn store(&self, secret: &str) -> CoreResult<()> {
        let sealed = crypto::seal(secret.as_bytes(), self.key().await?)?;
        let json =
            serde_json::to_vec(&sealed).map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let _guard = self.io_lock.lock().await;
        self.ensure_parent_dir().await?;
        self.write_private(&json).await?;
        log::debug!("Credential written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.io_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                log::debug!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageError(format!(
                "Failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backend_in(dir: &TempDir) -> EncryptedFileBackend {
        EncryptedFileBackend::with_machine_id(
            dir.path().join("nested").join("credentials.enc"),
            "test-machine",
        )
    }

    #[tokio::test]
    async fn store_then_load_returns_secret() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);

        backend.store("token-1").await.unwrap();
        assert_eq!(backend.load().await.unwrap().as_deref(), Some("token-1"));

        backend.store("token-2").await.unwrap();
        assert_eq!(backend.load().await.unwrap().as_deref(), Some("token-2"));
        assert!(!backend.temp_path().exists());
    }

    #[tokio::test]
    async fn missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(backend_in(&dir).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_is_iv_and_ciphertext_hex() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        backend.store("plain-secret").await.unwrap();

        let raw = std::fs::read_to_string(backend.path()).unwrap();
        assert!(!raw.contains("plain-secret"));
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(hex::decode(record["iv"].as_str().unwrap()).is_ok());
        assert!(hex::decode(record["encrypted"].as_str().unwrap()).is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_and_directory_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        backend.store("secret").await.unwrap();

        let file_mode = std::fs::metadata(backend.path()).unwrap().permissions().mode();
        let dir_mode = std::fs::metadata(backend.path().parent().unwrap())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(file_mode & 0o777, 0o600);
        assert_eq!(dir_mode & 0o777, 0o700);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);

        backend.clear().await.unwrap();
        backend.store("secret").await.unwrap();
        backend.clear().await.unwrap();
        backend.clear().await.unwrap();

        assert_eq!(backend.load().await.unwrap(), None);
        assert!(!backend.path().exists());
    }

    #[tokio::test]
    async fn garbage_file_fails_decryption_and_is_kept() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        backend.store("secret").await.unwrap();
        std::fs::write(
            backend.path(),
            r#"{"iv":"000102030405060708090a0b","encrypted":"deadbeefdeadbeefdeadbeefdeadbeef"}"#,
        )
        .unwrap();

        let result = backend.load().await;
        assert!(matches!(result, Err(CoreError::DecryptionFailed(_))));
        assert!(backend.path().exists());
    }

    #[tokio::test]
    async fn non_json_file_fails_decryption() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        std::fs::create_dir_all(backend.path().parent().unwrap()).unwrap();
        std::fs::write(backend.path(), b"\x00\x01 not a record").unwrap();

        assert!(matches!(backend.load().await, Err(CoreError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn file_from_another_machine_fails_decryption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.enc");
        EncryptedFileBackend::with_machine_id(&path, "machine-a")
            .store("secret")
            .await
            .unwrap();

        let other = EncryptedFileBackend::with_machine_id(&path, "machine-b");
        assert!(matches!(other.load().await, Err(CoreError::DecryptionFailed(_))));
    }
}
