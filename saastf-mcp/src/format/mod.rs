//! Human-readable rendering of API errors and name suggestions.

mod errors;
mod suggestions;

pub use errors::format_error;
pub use suggestions::{format_suggestions, generate_suggestions};
