//! # Registry Errors
//!
//! Errors returned while registering or resolving signers. Failures raised by
//! collaborators (token parsing, JSON decoding, signature checks) are carried
//! unchanged in [`Error::Other`].

/// Result type for registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Signer registry error codes.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A JWK was registered without a key identifier (`kid`).
    #[error("invalidKey")]
    InvalidKey,

    /// A lookup named a key identifier that has no registered entry.
    #[error("unknownKeyIdentifier: {0}")]
    UnknownKeyIdentifier(String),

    /// A lookup named no key identifier and no default signer is registered.
    #[error("missingKeyIdentifierHeader")]
    MissingKeyIdentifierHeader,

    /// A JWK entry exists but no signer could be built from it.
    #[error("keyResolutionFailed: {0}")]
    KeyResolutionFailed(String),

    /// Errors from token parsing, decoding, or signature checks.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey => "invalidKey",
            Self::UnknownKeyIdentifier(_) => "unknownKeyIdentifier",
            Self::MissingKeyIdentifierHeader => "missingKeyIdentifierHeader",
            Self::KeyResolutionFailed(_) => "keyResolutionFailed",
            Self::Other(_) => "other",
        }
    }
}
