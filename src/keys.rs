//! # Keys
//!
//! Signature primitives implementing [`Signer`](crate::signature::Signer) for
//! the supported key types. Each key is bound to a single algorithm when it
//! is built, and is verify-only unless private key material was supplied.

mod ecdsa;
mod eddsa;
mod rsa;

use anyhow::anyhow;
use base64ct::{Base64UrlUnpadded, Encoding};

pub use self::ecdsa::EcdsaKey;
pub use self::eddsa::Ed25519Key;
pub use self::rsa::RsaKey;

/// Decode a base64url (unpadded) key member.
pub(crate) fn decode_member(name: &str, value: &str) -> anyhow::Result<Vec<u8>> {
    Base64UrlUnpadded::decode_vec(value).map_err(|e| anyhow!("issue decoding '{name}': {e}"))
}
