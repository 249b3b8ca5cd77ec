//! Platform adapters for the saas.tf credential core.

mod keyring_backend;

pub use keyring_backend::KeyringBackend;
