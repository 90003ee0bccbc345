//! Fixed-length hex digests used as storage key fragments

use crate::{Error, Result};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// A 256-bit digest rendered as a 64-character lowercase hex string.
///
/// Two kinds of digest exist in the system: the *function digest* (identity
/// of a function's source text) and the *call digest* (identity of one
/// invocation's bound arguments). Both are lossy condensations: distinct
/// inputs may theoretically collide, which the design accepts in exchange
/// for fixed-size keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Compute the digest of a byte slice
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Compute the digest of a function's raw source text.
    ///
    /// The hash covers the UTF-8 bytes of the text as-is, including
    /// whitespace and comments. Any textual edit, cosmetic or not, yields a
    /// new digest and thereby invalidates existing cache entries for the
    /// function. This brittleness is a documented part of the contract, not
    /// an accident; replacing it with a structural hash would change cache
    /// invalidation behavior.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Create from a hex string, validating length and charset
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not exactly 64 lowercase hex digits.
    pub fn from_hex(hex: impl Into<String>) -> Result<Self> {
        let s = hex.into();
        if s.len() != 64 {
            return Err(Error::InvalidDigest { length: s.len() });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(Error::InvalidDigestChar);
        }
        Ok(Self(s))
    }

    /// Get the hex representation
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Wrap finalized hash output. Callers guarantee 32 bytes of input.
    pub(crate) fn from_hash_output(output: impl AsRef<[u8]>) -> Self {
        Self(hex::encode(output))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A function's identity for storage partitioning: its qualified name plus
/// the digest of its source text.
///
/// Created once per wrapped function and immutable for the process lifetime;
/// recomputing it requires re-wrapping. The name partitions storage for human
/// inspection, the digest guards against code changes.
#[derive(Debug, Clone)]
pub struct FunctionIdentity {
    qualname: String,
    digest: Digest,
}

impl FunctionIdentity {
    /// Build an identity from a qualified name and the function's source text
    #[must_use]
    pub fn new(qualname: impl Into<String>, source: &str) -> Self {
        Self {
            qualname: qualname.into(),
            digest: Digest::from_source(source),
        }
    }

    /// The qualified name used as the first path segment
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// The source-text digest used as the second path segment
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_from_bytes_known_vector() {
        let digest = Digest::from_bytes(b"hello world");
        // SHA-256 of "hello world"
        assert_eq!(
            digest.as_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn digest_validation() {
        assert!(
            Digest::from_hex("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef")
                .is_ok()
        );

        // Too short
        assert!(Digest::from_hex("abc").is_err());

        // Invalid characters
        assert!(
            Digest::from_hex("xyz3456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef")
                .is_err()
        );

        // Uppercase is rejected; digests are always rendered lowercase
        assert!(
            Digest::from_hex("0123456789ABCDEF0123456789abcdef0123456789abcdef0123456789abcdef")
                .is_err()
        );
    }

    #[test]
    fn source_digest_is_textual() {
        let a = Digest::from_source("fn f() -> i64 { 4 }");
        let b = Digest::from_source("fn f() -> i64 { 4 }");
        let c = Digest::from_source("fn f() -> i64 {  4 }");
        assert_eq!(a, b);
        // A whitespace-only edit changes the digest
        assert_ne!(a, c);
    }

    #[test]
    fn function_identity_partitions() {
        let f = FunctionIdentity::new("pkg.module.f", "fn f() {}");
        let g = FunctionIdentity::new("pkg.module.g", "fn f() {}");
        assert_eq!(f.qualname(), "pkg.module.f");
        // Same source, different names: same digest, different partitions
        assert_eq!(f.digest(), g.digest());
        assert_ne!(f.qualname(), g.qualname());
    }
}
