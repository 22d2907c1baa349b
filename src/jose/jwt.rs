//! # JSON Web Token (JWT)
//!
//! JSON Web Token (JWT) is a compact, URL-safe means of representing
//! claims to be transferred between two parties. The claims in a JWT
//! are encoded as a JSON object that is used as the payload of a JSON
//! Web Signature (JWS) structure, enabling the claims to be digitally
//! signed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The default `typ` header value.
pub const JWT_TYPE: &str = "JWT";

/// Represents a decoded JWT.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Jwt<T> {
    /// The JWT header.
    pub header: Header,

    /// The JWT claims.
    pub claims: T,
}

/// Represents the JWT header.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Header {
    /// Digital signature algorithm identifier as per IANA "JSON Web Signature
    /// and Encryption Algorithms" registry. Kept as a string: an unrecognised
    /// value is not an error until an algorithm is actually required.
    #[serde(default)]
    pub alg: String,

    /// Used to declare the media type [IANA.MediaTypes](http://www.iana.org/assignments/media-types)
    /// of the JWS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Content type of the secured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,

    /// Key ID of the key used to sign the JWT. Used to select the signer to
    /// verify with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// Payload types that can be carried in a JWT.
///
/// `verify` runs after the signature has been checked and is the place to
/// enforce registered claims such as `exp` or `aud` (see
/// [`crate::jose::claims`]).
pub trait Claims: Serialize + DeserializeOwned {
    /// Check the claims. The default accepts any payload.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first claim that failed.
    fn verify(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Claims for Value {}
