//! Credential lifecycle: storage backends, fallback selection, caching and expiry checks

mod claims;
mod file_backend;
mod store;
mod token_manager;

pub use claims::TokenClaims;
pub use file_backend::EncryptedFileBackend;
pub use store::SecureCredentialStore;
pub use token_manager::TokenManager;
