//! Client-side input checks run before any request is sent.

use std::sync::LazyLock;

use regex::Regex;
use saastf_api::SubscriptionPlan;
use thiserror::Error;

/// Input rejected before reaching the API. The message is shown to the agent as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ValidationResult<T = ()> = Result<T, ValidationError>;

static SUBDOMAIN_CHARSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").ok());

static IPV4: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .ok()
});

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

fn is_match(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// 3-63 chars of `[a-z0-9-]`, alphanumeric at both ends, no `--`.
pub fn subdomain_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err(ValidationError::new("Subdomain name is required"));
    }
    if !(3..=63).contains(&name.len()) {
        return Err(ValidationError::new(
            "Subdomain name must be between 3 and 63 characters",
        ));
    }
    if !is_match(&SUBDOMAIN_CHARSET, name) {
        return Err(ValidationError::new(
            "Subdomain name can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(ValidationError::new(
            "Subdomain name must start and end with a letter or number",
        ));
    }
    if name.contains("--") {
        return Err(ValidationError::new(
            "Subdomain name cannot contain consecutive hyphens",
        ));
    }
    Ok(())
}

pub fn ip_address(ip: &str) -> ValidationResult {
    if ip.is_empty() {
        return Err(ValidationError::new("IP address is required"));
    }
    if !is_match(&IPV4, ip) {
        return Err(ValidationError::new(
            "Invalid IPv4 address format. Expected format: xxx.xxx.xxx.xxx",
        ));
    }
    Ok(())
}

pub fn email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return Err(ValidationError::new("Email is required"));
    }
    if !is_match(&EMAIL, email) {
        return Err(ValidationError::new("Invalid email format"));
    }
    Ok(())
}

/// Registration password: at least 8 chars with a letter and a digit.
pub fn password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::new("Password is required"));
    }
    if password.chars().count() < 8 {
        return Err(ValidationError::new(
            "Password must be at least 8 characters long",
        ));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(ValidationError::new(
            "Password must contain at least one letter and one number",
        ));
    }
    Ok(())
}

pub fn required(value: &str, what: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{what} is required")));
    }
    Ok(())
}

pub fn subscription_plan(plan: &str) -> ValidationResult<SubscriptionPlan> {
    plan.parse().map_err(|_| {
        let valid: Vec<&str> = SubscriptionPlan::ALL.iter().map(|p| p.as_str()).collect();
        ValidationError::new(format!("Invalid plan. Must be one of: {}", valid.join(", ")))
    })
}
