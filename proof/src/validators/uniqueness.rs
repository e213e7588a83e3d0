//! Uniqueness validator: content fingerprint plus a duplicate decision.
//!
//! The digest is SHA-256 over the UTF-8 bytes of the document. Whether a
//! digest counts as a duplicate is delegated to a [`DedupStore`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::dedup::DedupStore;
use crate::error::ProofError;

/// SHA-256 fingerprint of document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Length of the hexadecimal rendering.
    pub const HEX_LEN: usize = 64;

    /// Digests the UTF-8 encoding of `text`.
    pub fn of_text(text: &str) -> Self {
        Self(Sha256::digest(text.as_bytes()).into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal rendering (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error parsing a [`ContentDigest`] from its hex rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 64 lowercase hex characters, got {0:?}")]
pub struct ParseDigestError(String);

impl FromStr for ContentDigest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN || s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(ParseDigestError(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseDigestError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Outcome of the uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniquenessVerdict {
    /// Content fingerprint.
    pub digest: ContentDigest,
    /// True iff the store has not seen the digest.
    pub passed: bool,
}

/// Fingerprints `text` and asks `store` whether it was seen before.
///
/// The store is only queried; recording a digest is left to the caller.
///
/// # Errors
///
/// Returns [`ProofError::Dedup`] if the store cannot be queried.
pub fn validate(text: &str, store: &dyn DedupStore) -> Result<UniquenessVerdict, ProofError> {
    let digest = ContentDigest::of_text(text);
    let seen = store.exists(&digest)?;
    if seen {
        tracing::info!(%digest, "duplicate submission");
    }
    Ok(UniquenessVerdict {
        digest,
        passed: !seen,
    })
}
