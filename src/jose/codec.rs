//! # JSON Codec
//!
//! Token headers and claims are encoded and decoded through a [`JsonCodec`].
//! The registry holds one codec that is handed to every signer that has not
//! been configured with its own.

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Encodes and decodes the JSON segments of a token.
pub trait JsonCodec: Debug + Send + Sync {
    /// Encode a JSON value to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn encode(&self, value: &Value) -> anyhow::Result<Vec<u8>>;

    /// Decode bytes to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid JSON.
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Value>;
}

/// The default codec, backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJson;

impl JsonCodec for SerdeJson {
    fn encode(&self, value: &Value) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Shared handle to a codec.
pub type SharedCodec = Arc<dyn JsonCodec>;

/// The codec used when neither signer nor registry supplies one.
#[must_use]
pub fn default_codec() -> SharedCodec {
    Arc::new(SerdeJson)
}

/// Serialize `value` and encode it with `codec`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or encoded.
pub fn to_vec<T: Serialize>(codec: &dyn JsonCodec, value: &T) -> anyhow::Result<Vec<u8>> {
    let value = serde_json::to_value(value).map_err(|e| anyhow!("issue serializing: {e}"))?;
    codec.encode(&value)
}

/// Decode `bytes` with `codec` and deserialize the result.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or do not match `T`.
pub fn from_slice<T: DeserializeOwned>(codec: &dyn JsonCodec, bytes: &[u8]) -> anyhow::Result<T> {
    let value = codec.decode(bytes)?;
    serde_json::from_value(value).map_err(|e| anyhow!("issue deserializing: {e}"))
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Claims {
        sub: String,
    }

    #[test]
    fn typed_helpers() {
        let claims = Claims { sub: "123".into() };
        let bytes = to_vec(&SerdeJson, &claims).expect("should encode");
        assert_eq!(bytes, br#"{"sub":"123"}"#);

        let decoded: Claims = from_slice(&SerdeJson, &bytes).expect("should decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn shape_mismatch() {
        let result = from_slice::<Claims>(&SerdeJson, br#"{"iss":"me"}"#);
        assert!(result.is_err());
    }
}
