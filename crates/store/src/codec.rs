//! Serialization seam between the store and result values
//!
//! The store treats result payloads as opaque bytes; a `Codec` turns values
//! into those bytes and back. Any codec must round-trip every result type a
//! wrapped function may return.

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Byte serializer for cached result values
pub trait Codec {
    /// File extension for payloads written by this codec, without the dot
    fn extension(&self) -> &str;

    /// Encode a result value to bytes
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the value cannot be encoded.
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a cached payload back into a value
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the payload cannot be decoded,
    /// e.g. format drift since the entry was written.
    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON codec, the provided default
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        "json"
    }

    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| Error::serialization(format!("failed to encode result: {e}")))
    }

    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::serialization(format!("failed to decode cached result: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let codec = JsonCodec;
        let value = vec![("a".to_string(), 1i64), ("b".to_string(), 2i64)];
        let bytes = codec.to_bytes(&value).unwrap();
        let back: Vec<(String, i64)> = codec.from_bytes(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn decode_failure_is_a_serialization_error() {
        let codec = JsonCodec;
        let result: Result<i64> = codec.from_bytes(b"not json");
        assert!(matches!(result, Err(Error::Serialization { .. })));
    }
}
