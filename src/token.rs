//! # Token Signing and Verification
//!
//! Selects a signer from the registry for a token (using the header's `kid`
//! and `alg`) or for an outgoing payload (using the caller's `kid`), then
//! hands the work to that signer.

use crate::error::Result;
use crate::jose::jwa::Algorithm;
use crate::jose::jws;
use crate::jose::jwt::{Claims, JWT_TYPE};
use crate::registry::Registry;

impl Registry {
    /// Sign `claims` with the signer registered under `kid`, or with the
    /// default signer. `typ` defaults to `"JWT"`.
    ///
    /// No algorithm hint is available when signing, so a JWK entry must
    /// carry its own `alg`.
    ///
    /// # Errors
    ///
    /// Returns a registry error if no signer can be found, or
    /// [`Error::Other`](crate::Error::Other) if signing fails.
    pub fn sign<T: Claims>(
        &self, claims: &T, typ: Option<&str>, kid: Option<&str>,
    ) -> Result<String> {
        let signer = self.require_signer(kid, None)?;
        Ok(signer.sign(claims, typ.unwrap_or(JWT_TYPE), kid)?)
    }

    /// Verify `token` with the signer named by its header and return its
    /// claims.
    ///
    /// # Errors
    ///
    /// Returns a registry error if no signer can be found, or
    /// [`Error::Other`](crate::Error::Other) if the token is malformed, the
    /// signature does not verify, or the claims are rejected.
    pub fn verify<T: Claims>(&self, token: &str) -> Result<T> {
        let header = jws::header(token, self.codec())?;
        let alg = Algorithm::parse(&header.alg);
        tracing::debug!(kid = ?header.kid, ?alg, "verifying token");

        let signer = self.require_signer(header.kid.as_deref(), alg)?;
        Ok(signer.verify(token)?)
    }

    /// Decode the claims of `token` without checking its signature.
    ///
    /// The claims are untrusted. Use [`Registry::verify`] for anything other
    /// than inspection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Other`](crate::Error::Other) if the token is
    /// malformed or the claims cannot be decoded.
    pub fn unverified<T: Claims>(&self, token: &str) -> Result<T> {
        Ok(jws::unverified(token, self.codec())?)
    }
}
