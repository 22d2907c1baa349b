//! # Signature
//!
//! The `signature` module provides the [`Signer`] trait implemented by the
//! signature primitives in [`crate::keys`], and [`JwtSigner`], which uses a
//! `Signer` to produce and check compact JWTs.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::jose::codec::{self, JsonCodec, SharedCodec};
use crate::jose::jwa::Algorithm;
use crate::jose::jws;
use crate::jose::jwt::{Claims, Header};

/// Signer is implemented by the signature primitives: one key, used with one
/// algorithm.
pub trait Signer: Send + Sync {
    /// Algorithm returns the algorithm used by the signer. This is the value
    /// written to, and expected in, the token's `alg` header.
    fn algorithm(&self) -> Algorithm;

    /// Whether the signer holds private key material.
    fn can_sign(&self) -> bool;

    /// Sign the message.
    ///
    /// # Errors
    ///
    /// Returns an error for verify-only keys, or if signing fails.
    fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Verify `signature` over the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is malformed or does not match.
    fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()>;
}

/// Signs payloads into compact JWTs and verifies compact JWTs, using a
/// single [`Signer`].
///
/// Cloning is cheap: the signer and codec are shared.
#[derive(Clone)]
pub struct JwtSigner {
    signer: Arc<dyn Signer>,
    codec: Option<SharedCodec>,
}

impl JwtSigner {
    /// Create a JWT signer from a signature primitive.
    pub fn new(signer: impl Signer + 'static) -> Self {
        Self {
            signer: Arc::new(signer),
            codec: None,
        }
    }

    /// Use `codec` to encode and decode this signer's tokens, in place of
    /// the registry's codec.
    #[must_use]
    pub fn with_codec(mut self, codec: impl JsonCodec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Give the signer `codec` unless it already has one.
    pub(crate) fn or_codec(mut self, codec: &SharedCodec) -> Self {
        if self.codec.is_none() {
            self.codec = Some(Arc::clone(codec));
        }
        self
    }

    /// The algorithm of the underlying signer.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.signer.algorithm()
    }

    /// Whether tokens can be signed (private key material is present).
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.signer.can_sign()
    }

    /// Sign `claims`, returning a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded or the signer is
    /// verify-only.
    pub fn sign<T: Claims>(
        &self, claims: &T, typ: &str, kid: Option<&str>,
    ) -> anyhow::Result<String> {
        let header = Header {
            alg: self.algorithm().to_string(),
            typ: Some(typ.to_string()),
            kid: kid.map(ToString::to_string),
            ..Header::default()
        };
        jws::encode(&header, claims, self.signer.as_ref(), &*self.codec())
    }

    /// Verify the token's signature, decode its claims as `T`, then check
    /// them with [`Claims::verify`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, the signature does not
    /// verify, or the claims cannot be decoded or fail their checks.
    pub fn verify<T: Claims>(&self, token: &str) -> anyhow::Result<T> {
        let jwt = jws::decode::<T>(token, self.signer.as_ref(), &*self.codec())?;
        jwt.claims.verify()?;
        Ok(jwt.claims)
    }

    fn codec(&self) -> SharedCodec {
        self.codec.clone().unwrap_or_else(codec::default_codec)
    }
}

impl Debug for JwtSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSigner")
            .field("algorithm", &self.algorithm())
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use anyhow::bail;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    use super::*;
    use crate::jose::codec::SerdeJson;

    struct Echo {
        private: bool,
    }

    impl Signer for Echo {
        fn algorithm(&self) -> Algorithm {
            Algorithm::ES256
        }

        fn can_sign(&self) -> bool {
            self.private
        }

        fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            if !self.private {
                bail!("verify-only key");
            }
            Ok(msg.to_vec())
        }

        fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
            if msg != signature {
                bail!("signature mismatch");
            }
            Ok(())
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Admin {
        admin: bool,
    }

    impl Claims for Admin {
        fn verify(&self) -> anyhow::Result<()> {
            if !self.admin {
                bail!("not an admin");
            }
            Ok(())
        }
    }

    #[test]
    fn sign_writes_header() {
        let signer = JwtSigner::new(Echo { private: true });
        let token = signer.sign(&json!({"sub": "123"}), "JWT", Some("k1")).expect("should sign");

        let header = jws::header(&token, &SerdeJson).expect("should decode header");
        assert_eq!(header.alg, "ES256");
        assert_eq!(header.typ.as_deref(), Some("JWT"));
        assert_eq!(header.kid.as_deref(), Some("k1"));

        let claims: Value = signer.verify(&token).expect("should verify");
        assert_eq!(claims, json!({"sub": "123"}));
    }

    #[test]
    fn verify_only() {
        let signer = JwtSigner::new(Echo { private: false });
        assert!(!signer.can_sign());
        assert!(signer.sign(&json!({}), "JWT", None).is_err());
    }

    #[test]
    fn claims_checked_after_signature() {
        let signer = JwtSigner::new(Echo { private: true });

        let token = signer.sign(&json!({"admin": false}), "JWT", None).expect("should sign");
        let err = signer.verify::<Admin>(&token).expect_err("should fail");
        assert_eq!(err.to_string(), "not an admin");

        let token = signer.sign(&json!({"admin": true}), "JWT", None).expect("should sign");
        assert!(signer.verify::<Admin>(&token).is_ok());
    }
}
