//! # JSON Web Key (JWK)
//!
//! A JWK ([RFC7517]) is a JSON representation of a cryptographic key.
//! Additionally, a JWK Set (JWKS) is used to represent a set of JWKs.
//!
//! Members are kept as the base64url strings found in the JSON. They are only
//! decoded when the key is resolved to a signer, so a JWK with malformed
//! material can still be registered and will fail at resolution.
//!
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517

use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::jose::jwa::Algorithm;

/// Simplified JSON Web Key (JWK) key structure covering RSA, EC, and OKP
/// signing keys.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Jwk {
    /// Key type.
    pub kty: KeyType,

    /// Key identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Algorithm intended for use with the key. Kept as a string so unknown
    /// values do not prevent the key from loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Use of the key.
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_: Option<KeyUse>,

    /// RSA modulus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA public exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Private exponent (RSA) or private key (EC, OKP). Presence makes the
    /// key signing capable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// RSA first prime factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,

    /// RSA second prime factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Cryptographic curve name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// X coordinate (EC) or public key (OKP).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Y coordinate. Not used by OKP keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl Jwk {
    /// The algorithm named by the key's own `alg` member, if recognised.
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.alg.as_deref().and_then(Algorithm::parse)
    }

    /// The curve named by the key's `crv` member, if recognised.
    #[must_use]
    pub fn curve(&self) -> Option<Curve> {
        self.crv.as_deref().and_then(Curve::parse)
    }
}

impl FromStr for Jwk {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).map_err(|e| anyhow!("issue deserializing JWK: {e}"))
    }
}

/// Cryptographic key type.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq, Hash)]
pub enum KeyType {
    /// RSA key pair
    #[default]
    #[serde(rename = "RSA")]
    Rsa,

    /// Elliptic curve key pair
    #[serde(rename = "EC")]
    Ec,

    /// Octet key pair (Edwards curve)
    #[serde(rename = "OKP")]
    Okp,
}

/// Cryptographic curve type.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
pub enum Curve {
    /// NIST P-256 curve
    #[serde(rename = "P-256")]
    P256,

    /// NIST P-384 curve
    #[serde(rename = "P-384")]
    P384,

    /// NIST P-521 curve
    #[serde(rename = "P-521")]
    P521,

    /// Ed25519 curve
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl Curve {
    /// Map a `crv` member to a curve. Unrecognised values yield `None`.
    #[must_use]
    pub fn parse(crv: &str) -> Option<Self> {
        match crv {
            "P-256" => Some(Self::P256),
            "P-384" => Some(Self::P384),
            "P-521" => Some(Self::P521),
            "Ed25519" => Some(Self::Ed25519),
            _ => None,
        }
    }

    /// The curve conventionally paired with an ECDSA algorithm.
    #[must_use]
    pub const fn for_algorithm(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::ES256 => Some(Self::P256),
            Algorithm::ES384 => Some(Self::P384),
            Algorithm::ES512 => Some(Self::P521),
            _ => None,
        }
    }
}

/// The intended usage of the public `KeyType`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum KeyUse {
    /// Public key is to be used for signature verification
    #[default]
    #[serde(rename = "sig")]
    Signature,

    /// Public key is to be used for encryption
    #[serde(rename = "enc")]
    Encryption,
}

/// A set of JWKs.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Jwks {
    /// The keys in the set, in document order.
    pub keys: Vec<Jwk>,
}

impl FromStr for Jwks {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).map_err(|e| anyhow!("issue deserializing JWK set: {e}"))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserialize_set() {
        let jwks: Jwks = serde_json::from_value(json!({
            "keys": [
                {"kty": "RSA", "kid": "rsa-1", "alg": "RS256", "n": "AQAB", "e": "AQAB"},
                {"kty": "EC", "kid": "ec-1", "crv": "P-256", "x": "AA", "y": "AA", "use": "sig"},
                {"kty": "OKP", "crv": "Ed25519", "x": "AA", "extra": true}
            ]
        }))
        .expect("should deserialize");

        assert_eq!(jwks.keys.len(), 3);
        assert_eq!(jwks.keys[0].kty, KeyType::Rsa);
        assert_eq!(jwks.keys[0].algorithm(), Some(Algorithm::RS256));
        assert_eq!(jwks.keys[1].curve(), Some(Curve::P256));
        assert_eq!(jwks.keys[1].use_, Some(KeyUse::Signature));
        assert_eq!(jwks.keys[2].kid, None);
    }

    #[test]
    fn unknown_key_type() {
        let result = Jwk::from_str(r#"{"kty": "oct", "k": "AA"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_alg_is_kept() {
        let jwk = Jwk::from_str(r#"{"kty": "RSA", "alg": "PS256"}"#).expect("should parse");
        assert_eq!(jwk.alg.as_deref(), Some("PS256"));
        assert_eq!(jwk.algorithm(), None);
    }

    #[test]
    fn curve_for_algorithm() {
        assert_eq!(Curve::for_algorithm(Algorithm::ES256), Some(Curve::P256));
        assert_eq!(Curve::for_algorithm(Algorithm::ES384), Some(Curve::P384));
        assert_eq!(Curve::for_algorithm(Algorithm::ES512), Some(Curve::P521));
        assert_eq!(Curve::for_algorithm(Algorithm::RS256), None);
        assert_eq!(Curve::parse("secp256k1"), None);
    }
}
