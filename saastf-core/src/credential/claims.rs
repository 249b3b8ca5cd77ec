use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Claims embedded in a saas.tf credential (a JWT).
///
/// Decoded for local expiry checks and introspection only. The signature is
/// never verified here; the server remains the authority on validity.
///
/// Each claim is read on its own: a claim of an unexpected JSON type is
/// treated as absent instead of failing the whole decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued-at, NumericDate (seconds since the epoch, may be fractional).
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
    /// Expiry, NumericDate.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
}

/// Strings as is, numbers in their decimal form, anything else absent.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn numeric_date(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

impl TokenClaims {
    /// Decode the payload segment. `None` if the token is not a decodable JWT.
    pub fn decode(token: &str) -> Option<Self> {
        let mut segments = token.split('.');
        let (_header, payload) = (segments.next()?, segments.next()?);
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        numeric_date(self.exp?)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        numeric_date(self.iat?)
    }

    /// Subject identity, preferring the service's `userId` claim.
    pub fn subject(&self) -> Option<&str> {
        self.user_id.as_deref().or(self.sub.as_deref())
    }

    /// Usable at `now` if expiry is more than `grace` away. Missing expiry is never usable.
    pub fn is_valid_at(&self, now: DateTime<Utc>, grace: TimeDelta) -> bool {
        self.expires_at()
            .and_then(|exp| exp.checked_sub_signed(grace))
            .is_some_and(|deadline| now < deadline)
    }
}
