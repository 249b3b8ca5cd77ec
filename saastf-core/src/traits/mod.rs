//! Storage and time abstraction trait definition

mod clock;
mod secret_backend;

pub use clock::{Clock, SystemClock};
pub use secret_backend::SecretBackend;
