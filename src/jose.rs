//! # JSON Object Signing and Encryption (JOSE)
//!
//! Data types and helpers for the parts of [JOSE] needed to sign and verify
//! compact JSON Web Tokens: algorithms (JWA), keys (JWK), the compact JWS
//! serialisation, and registered JWT claims.
//!
//! [JOSE]: https://datatracker.ietf.org/wg/jose/about

pub mod claims;
pub mod codec;
pub mod jwa;
pub mod jwk;
pub mod jws;
pub mod jwt;
