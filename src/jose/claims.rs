//! # Registered Claims
//!
//! Typed wrappers for the registered claim names of [RFC7519] section 4.1,
//! with the checks each claim calls for. Payload types compose these and call
//! the checks from their [`Claims::verify`](crate::jose::jwt::Claims::verify)
//! implementation.
//!
//! ```rust,ignore
//! #[derive(Deserialize, Serialize)]
//! struct AccessClaims {
//!     sub: SubjectClaim,
//!     exp: ExpirationClaim,
//! }
//!
//! impl Claims for AccessClaims {
//!     fn verify(&self) -> anyhow::Result<()> {
//!         self.exp.verify_not_expired(Utc::now())
//!     }
//! }
//! ```
//!
//! [RFC7519]: https://www.rfc-editor.org/rfc/rfc7519

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `exp` claim: the time after which the token must not be accepted.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ExpirationClaim(#[serde(with = "numeric_date")] pub DateTime<Utc>);

impl ExpirationClaim {
    /// Fails if `now` is at or past the expiration time.
    ///
    /// # Errors
    ///
    /// Returns an error if the token has expired.
    pub fn verify_not_expired(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        if now >= self.0 {
            bail!("token expired at {}", self.0);
        }
        Ok(())
    }
}

/// The `nbf` claim: the time before which the token must not be accepted.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct NotBeforeClaim(#[serde(with = "numeric_date")] pub DateTime<Utc>);

impl NotBeforeClaim {
    /// Fails if `now` is earlier than the not-before time.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not yet valid.
    pub fn verify_not_before(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        if now < self.0 {
            bail!("token not valid before {}", self.0);
        }
        Ok(())
    }
}

/// The `iat` claim.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IssuedAtClaim(#[serde(with = "numeric_date")] pub DateTime<Utc>);

/// The `aud` claim. Serialized as a single string or an array of strings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AudienceClaim {
    /// A single audience.
    Single(String),

    /// Several audiences.
    Many(Vec<String>),
}

impl AudienceClaim {
    /// Fails unless `audience` is one of the claim's values.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not intended for `audience`.
    pub fn verify_intended_audience(&self, audience: &str) -> anyhow::Result<()> {
        let found = match self {
            Self::Single(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|aud| aud == audience),
        };
        if !found {
            bail!("token not intended for audience {audience}");
        }
        Ok(())
    }
}

/// The `iss` claim.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IssuerClaim(pub String);

/// The `sub` claim.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SubjectClaim(pub String);

/// `NumericDate` (RFC 7519 section 2): seconds since the epoch. Written as a
/// whole number of seconds; fractional seconds are accepted when reading.
mod numeric_date {
    use chrono::serde::ts_seconds;
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &DateTime<Utc>, serializer: S,
    ) -> Result<S::Ok, S::Error> {
        ts_seconds::serialize(date, serializer)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("NumericDate must be finite"));
        }
        let secs = value.floor();
        let nanos = (((value - secs) * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(secs as i64, nanos)
            .ok_or_else(|| D::Error::custom(format!("NumericDate {value} out of range")))
    }
}
