//! # saastf-api
//!
//! Client for the [saas.tf](https://saas.tf) subdomain service REST API.
//!
//! The client owns no credential state. It is built around a
//! [`CredentialSource`], which it asks for a usable bearer credential before
//! every call and tells to forget that credential when the server answers
//! HTTP 401.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use saastf_api::{ClientConfig, CredentialSource, SaasTfClient};
//!
//! # async fn run(credentials: Arc<dyn CredentialSource>) -> saastf_api::ApiResult<()> {
//! let client = SaasTfClient::new(ClientConfig::default(), credentials)?;
//! client.login("me@example.com", "hunter22").await?;
//!
//! let list = client.list_subdomains().await?;
//! for subdomain in &list.subdomains {
//!     println!("{} -> {}", subdomain.full_domain, subdomain.ip_address);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`ApiError`] carrying a closed [`ApiErrorCode`].
//! Transport failures map to `TIMEOUT` / `NETWORK_ERROR`, unparseable
//! responses to `UNKNOWN_ERROR`, and codes this client does not know yet are
//! kept in [`ApiErrorCode::Unrecognized`].

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::{ClientConfig, DEFAULT_BASE_URL, SaasTfClient};
pub use error::{ApiError, ApiErrorCode, ApiResult, SuggestedPlan, UpgradeInfo};
pub use http_client::HttpUtils;
pub use traits::CredentialSource;
pub use types::{
    AuthResponse, AvailabilityResponse, CheckoutSession, Plan, QuotaInfo, Subdomain,
    SubdomainList, Subscription, SubscriptionPlan, User,
};
pub use utils::log_sanitizer::truncate_for_log;
