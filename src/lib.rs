//! # JWT Signers
//!
//! A registry that resolves the signer to use for a JSON Web Token, either
//! when verifying an incoming token or when signing an outgoing payload.
//!
//! Signers are registered under an opaque key identifier (`kid`). An entry is
//! either a signer supplied directly by the caller or a JSON Web Key
//! ([RFC7517]) descriptor that is turned into a signer on demand. Turning a
//! JWK into a signer follows a fixed set of rules matching the key type (RSA,
//! EC, OKP) against the effective algorithm (the algorithm hint from the token
//! header, or the JWK's own `alg`).
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//! registry.add_jwks_json(JWKS)?;
//!
//! let token = registry.sign(&claims, "JWT", Some("key-1"))?;
//! let claims: Value = registry.verify(&token)?;
//! ```
//!
//! The registry performs no synchronisation of its own. Register signers
//! during set-up, then share the registry read-only (or swap whole registries)
//! once verification traffic starts.
//!
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517

pub mod error;
pub mod jose;
pub mod keys;
pub mod registry;
pub mod resolver;
pub mod signature;
mod token;

pub use crate::error::{Error, Result};
pub use crate::jose::jwa::Algorithm;
pub use crate::jose::jwk::{Curve, Jwk, Jwks, KeyType};
pub use crate::jose::jwt::Claims;
pub use crate::registry::{Registry, SignerEntry};
pub use crate::resolver::resolve;
pub use crate::signature::{JwtSigner, Signer};
