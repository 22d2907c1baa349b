//! # Signer Registry
//!
//! Maps key identifiers (`kid`) to signer entries and holds the default
//! entry used when a token or a sign request names no `kid`.
//!
//! An entry is either a [`JwtSigner`] supplied by the caller or a [`Jwk`]
//! that is resolved to a signer each time it is looked up. Registering under
//! an existing `kid` replaces the previous entry.
//!
//! The first entry registered becomes the default. After that, the default
//! only changes when an entry is registered with `is_default` set.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;

use crate::error::{Error, Result};
use crate::jose::codec::{self, JsonCodec, SharedCodec};
use crate::jose::jwa::Algorithm;
use crate::jose::jwk::{Jwk, Jwks};
use crate::resolver;
use crate::signature::JwtSigner;

/// A registered signer.
#[derive(Clone, Debug)]
pub enum SignerEntry {
    /// A signer supplied directly. Algorithm hints are ignored.
    Direct(JwtSigner),

    /// A JWK, resolved to a signer on every lookup.
    Jwk(Jwk),
}

impl SignerEntry {
    fn try_signer(&self, alg: Option<Algorithm>) -> anyhow::Result<JwtSigner> {
        match self {
            Self::Direct(signer) => Ok(signer.clone()),
            Self::Jwk(jwk) => resolver::try_resolve(jwk, alg),
        }
    }
}

/// Stores signers by key identifier.
///
/// The registry performs no internal synchronisation. Mutating methods take
/// `&mut self`, so sharing a registry between threads while registering keys
/// requires the caller to wrap it (for example in an `RwLock`).
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<String, SignerEntry>,
    default: Option<SignerEntry>,
    codec: SharedCodec,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry that encodes and decodes tokens with
    /// `serde_json`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default: None,
            codec: codec::default_codec(),
        }
    }

    /// Create an empty registry using `codec` for every signer that has not
    /// been given its own.
    #[must_use]
    pub fn with_codec(codec: impl JsonCodec + 'static) -> Self {
        Self {
            codec: Arc::new(codec),
            ..Self::new()
        }
    }

    /// Register a signer under `kid`.
    ///
    /// A signer registered without a `kid` is only reachable if it becomes
    /// the default.
    pub fn add_signer(&mut self, signer: JwtSigner, kid: Option<&str>, is_default: bool) {
        tracing::trace!(?kid, is_default, "registering signer");
        self.insert(kid, SignerEntry::Direct(signer), is_default);
    }

    /// Register a JWK under its `kid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if the JWK has no `kid`.
    pub fn add_jwk(&mut self, jwk: Jwk, is_default: bool) -> Result<()> {
        let Some(kid) = jwk.kid.clone() else {
            return Err(Error::InvalidKey);
        };
        tracing::trace!(kid, is_default, "registering JWK");
        self.insert(Some(&kid), SignerEntry::Jwk(jwk), is_default);
        Ok(())
    }

    /// Register each key of a JWK Set, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] on the first key without a `kid`. Keys
    /// before it remain registered.
    pub fn add_jwks(&mut self, jwks: Jwks) -> Result<()> {
        for jwk in jwks.keys {
            self.add_jwk(jwk, false)?;
        }
        Ok(())
    }

    /// Decode a JWK Set with the registry's codec and register its keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be decoded as a JWK Set, or as
    /// for [`Registry::add_jwks`].
    pub fn add_jwks_json(&mut self, json: &str) -> Result<()> {
        let jwks: Jwks = codec::from_slice(&*self.codec, json.as_bytes())
            .map_err(|e| anyhow!("issue decoding JWK Set: {e}"))?;
        self.add_jwks(jwks)
    }

    /// Find the signer for `kid`, or the default signer when `kid` is
    /// `None`. JWK entries are resolved using `alg` in preference to the
    /// JWK's own algorithm.
    ///
    /// Returns `Ok(None)` when no `kid` is given and there is no default, or
    /// when a JWK entry cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKeyIdentifier`] if `kid` is not registered.
    pub fn lookup(
        &self, kid: Option<&str>, alg: Option<Algorithm>,
    ) -> Result<Option<JwtSigner>> {
        let Some(entry) = self.entry(kid)? else {
            return Ok(None);
        };
        match entry.try_signer(alg) {
            Ok(signer) => Ok(Some(signer.or_codec(&self.codec))),
            Err(e) => {
                tracing::debug!(?kid, "no signer for entry: {e}");
                Ok(None)
            }
        }
    }

    /// As [`Registry::lookup`], but every way of not finding a signer is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKeyIdentifier`] if `kid` is not registered,
    /// [`Error::MissingKeyIdentifierHeader`] if no `kid` is given and there
    /// is no default, and [`Error::KeyResolutionFailed`] if the entry is a
    /// JWK that cannot be resolved.
    pub fn require_signer(&self, kid: Option<&str>, alg: Option<Algorithm>) -> Result<JwtSigner> {
        let Some(entry) = self.entry(kid)? else {
            return Err(Error::MissingKeyIdentifierHeader);
        };
        let signer = entry.try_signer(alg).map_err(|e| {
            Error::KeyResolutionFailed(format!("{}: {e}", kid.unwrap_or("default")))
        })?;
        Ok(signer.or_codec(&self.codec))
    }

    /// The number of entries registered under a `kid`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is registered under a `kid`. A registry may still
    /// hold a default signer registered without one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry is registered under `kid`.
    #[must_use]
    pub fn contains(&self, kid: &str) -> bool {
        self.entries.contains_key(kid)
    }

    pub(crate) fn codec(&self) -> &dyn JsonCodec {
        &*self.codec
    }

    fn insert(&mut self, kid: Option<&str>, entry: SignerEntry, is_default: bool) {
        if let Some(kid) = kid {
            self.entries.insert(kid.to_string(), entry.clone());
        }
        self.default = Some(elect_default(self.default.take(), entry, is_default));
    }

    fn entry(&self, kid: Option<&str>) -> Result<Option<&SignerEntry>> {
        match kid {
            Some(kid) => self
                .entries
                .get(kid)
                .map(Some)
                .ok_or_else(|| Error::UnknownKeyIdentifier(kid.to_string())),
            None => Ok(self.default.as_ref()),
        }
    }
}

/// Decide the default entry after registering `candidate`: the candidate
/// wins when it is flagged as the default or there is no current default.
fn elect_default<T>(current: Option<T>, candidate: T, is_default: bool) -> T {
    match current {
        Some(current) if !is_default => current,
        _ => candidate,
    }
}

#[cfg(test)]
mod test {
    use assert_let_bind::assert_let;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::signature::Signer;

    struct Fixed(Algorithm);

    impl Signer for Fixed {
        fn algorithm(&self) -> Algorithm {
            self.0
        }

        fn can_sign(&self) -> bool {
            true
        }

        fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            Ok(msg.to_vec())
        }

        fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
            if msg != signature {
                anyhow::bail!("signature mismatch");
            }
            Ok(())
        }
    }

    #[rstest]
    #[case::first_entry(None, false, "candidate")]
    #[case::first_flagged(None, true, "candidate")]
    #[case::keeps_current(Some("current"), false, "current")]
    #[case::replaces_current(Some("current"), true, "candidate")]
    fn default_election(
        #[case] current: Option<&str>, #[case] is_default: bool, #[case] expected: &str,
    ) {
        assert_eq!(elect_default(current, "candidate", is_default), expected);
    }

    fn jwk(kid: Option<&str>) -> Jwk {
        serde_json::from_value(json!({
            "kty": "OKP",
            "kid": kid,
            "alg": "EdDSA",
            "crv": "Ed25519",
            "x": "AA",
        }))
        .expect("should deserialize")
    }

    #[test]
    fn jwk_requires_kid() {
        let mut registry = Registry::new();
        let err = registry.add_jwk(jwk(None), true).expect_err("should fail");
        assert_let!(Error::InvalidKey, err);
        assert!(registry.is_empty());

        // a rejected key does not become the default
        assert_let!(Ok(None), registry.lookup(None, None));
    }

    #[test]
    fn unknown_kid() {
        let registry = Registry::new();
        let err = registry.lookup(Some("missing"), None).expect_err("should fail");
        assert_let!(Error::UnknownKeyIdentifier(kid), err);
        assert_eq!(kid, "missing");
    }

    #[test]
    fn no_kid_no_default() {
        let registry = Registry::new();
        assert_let!(Ok(None), registry.lookup(None, None));

        let err = registry.require_signer(None, None).expect_err("should fail");
        assert_let!(Error::MissingKeyIdentifierHeader, err);
    }

    #[test]
    fn unresolvable_jwk() {
        let mut registry = Registry::new();
        registry.add_jwk(jwk(Some("k1")), false).expect("should add");
        assert!(registry.contains("k1"));

        assert_let!(Ok(None), registry.lookup(Some("k1"), None));
        assert_let!(Ok(None), registry.lookup(None, None));

        let err = registry.require_signer(Some("k1"), None).expect_err("should fail");
        assert_let!(Error::KeyResolutionFailed(reason), err);
        assert_eq!(reason, "k1: invalid public key length");
    }

    #[test]
    fn jwks_stops_at_first_invalid_key() {
        let mut registry = Registry::new();
        let jwks = Jwks {
            keys: vec![jwk(Some("k1")), jwk(None), jwk(Some("k3"))],
        };
        let err = registry.add_jwks(jwks).expect_err("should fail");
        assert_let!(Error::InvalidKey, err);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("k1"));
        assert!(!registry.contains("k3"));
    }

    #[test]
    fn jwks_json_malformed() {
        let mut registry = Registry::new();
        let json = r#"{"keys": [{"kty": "DSA", "kid": "k1"}]}"#;
        let err = registry.add_jwks_json(json).expect_err("should fail");
        assert_let!(Error::Other(_), err);
        assert!(registry.is_empty());
    }

    #[test]
    fn direct_signer_ignores_hint() {
        let mut registry = Registry::new();
        registry.add_signer(JwtSigner::new(Fixed(Algorithm::EdDSA)), Some("d"), false);

        let signer = registry
            .lookup(Some("d"), Some(Algorithm::RS256))
            .expect("should find entry")
            .expect("should have signer");
        assert_eq!(signer.algorithm(), Algorithm::EdDSA);

        let signer =
            registry.require_signer(Some("d"), Some(Algorithm::ES384)).expect("should find signer");
        assert_eq!(signer.algorithm(), Algorithm::EdDSA);
    }

    #[test]
    fn signer_without_kid_is_inert() {
        let mut registry = Registry::new();
        registry.add_signer(JwtSigner::new(Fixed(Algorithm::ES256)), Some("first"), false);
        registry.add_signer(JwtSigner::new(Fixed(Algorithm::EdDSA)), None, false);
        assert_eq!(registry.len(), 1);

        let signer = registry.require_signer(None, None).expect("should have default");
        assert_eq!(signer.algorithm(), Algorithm::ES256);

        let token = registry.sign(&json!({"sub": "123"}), None, None).expect("should sign");
        let claims: serde_json::Value = registry.verify(&token).expect("should verify");
        assert_eq!(claims, json!({"sub": "123"}));
    }
}
