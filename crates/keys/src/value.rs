//! Argument values and their lossy condensation to bytes
//!
//! Condensation reduces an arbitrary argument value to a byte sequence that
//! feeds the call digest. The set of strategies is a closed tagged variant
//! rather than runtime type inspection: adding a new value kind means adding
//! a variant here, not scattering type checks across call sites.
//!
//! The scheme is deliberately lossy. Tables condense to their per-row content
//! hashes, so two frames with equal cells but different column names collide
//! intentionally. Everything else condenses to a single 64-bit content hash
//! serialized in its minimal signed little-endian form, so equal values
//! condense identically regardless of which instance holds them.
//!
//! Equality contracts per kind:
//! - scalars and sequences hash structurally; floats by IEEE bit pattern with
//!   -0.0 normalized to +0.0 and all NaNs canonicalized to one value
//! - tables hash by cell content in column order; column names and row
//!   positions beyond ordering are excluded
//! - `Opaque` carries a caller-computed 64-bit hash, so the caller's own
//!   equality notion governs

use crate::{Error, Result};
use sha2::{Digest as _, Sha256};

// Type tags keep the encodings of different kinds disjoint, so e.g. the
// string "1" and the integer 1 never condense to the same bytes.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STR: u8 = 4;
const TAG_BYTES: u8 = 5;
const TAG_SEQ: u8 = 6;
const TAG_TABLE: u8 = 7;
const TAG_OPAQUE: u8 = 8;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// IEEE double
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

/// An argument value, tagged by its condensation strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single scalar
    Scalar(Scalar),
    /// An ordered sequence of values
    Seq(Vec<Value>),
    /// Columnar data, condensed row-wise
    Table(Table),
    /// Fallback for kinds the variant set does not model: the caller supplies
    /// its own 64-bit content hash, which is passed through unchanged
    Opaque(i64),
}

/// Columnar data: named columns of equal length.
///
/// A labeled one-dimensional sequence ("series") is a single-column table.
/// Condensation hashes rows by cell content only, so the same data reaches
/// the same digest no matter which instance, copy, or construction path
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<(String, Vec<Scalar>)>,
    rows: usize,
}

impl Table {
    /// Build a table from named columns
    ///
    /// # Errors
    ///
    /// Returns an error if the columns do not all have the same length.
    pub fn new(columns: Vec<(String, Vec<Scalar>)>) -> Result<Self> {
        let rows = columns.first().map_or(0, |(_, v)| v.len());
        for (name, values) in &columns {
            if values.len() != rows {
                return Err(Error::RaggedTable {
                    column: name.clone(),
                    got: values.len(),
                    expected: rows,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build a single-column table from a plain sequence of cells
    #[must_use]
    pub fn series(values: Vec<Scalar>) -> Self {
        let rows = values.len();
        Self {
            columns: vec![(String::new(), values)],
            rows,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Per-row 64-bit content hashes, in row order.
    ///
    /// Each row hash covers the row's cells across all columns, left to
    /// right. Column names are not fed to the hash.
    #[must_use]
    pub fn row_hashes(&self) -> Vec<u64> {
        (0..self.rows)
            .map(|row| {
                let mut hasher = Sha256::new();
                for (_, values) in &self.columns {
                    feed_scalar(&mut hasher, &values[row]);
                }
                truncate_u64(&hasher.finalize())
            })
            .collect()
    }
}

fn feed_scalar(hasher: &mut Sha256, scalar: &Scalar) {
    match scalar {
        Scalar::Null => hasher.update([TAG_NULL]),
        Scalar::Bool(b) => {
            hasher.update([TAG_BOOL, u8::from(*b)]);
        }
        Scalar::Int(i) => {
            hasher.update([TAG_INT]);
            hasher.update(i.to_le_bytes());
        }
        Scalar::Float(f) => {
            hasher.update([TAG_FLOAT]);
            hasher.update(normalize_float(*f).to_le_bytes());
        }
        Scalar::Str(s) => {
            hasher.update([TAG_STR]);
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
        Scalar::Bytes(b) => {
            hasher.update([TAG_BYTES]);
            hasher.update((b.len() as u64).to_le_bytes());
            hasher.update(b);
        }
    }
}

fn feed_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Scalar(s) => feed_scalar(hasher, s),
        Value::Seq(items) => {
            hasher.update([TAG_SEQ]);
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                feed_value(hasher, item);
            }
        }
        Value::Table(table) => {
            hasher.update([TAG_TABLE]);
            hasher.update((table.num_rows() as u64).to_le_bytes());
            for row_hash in table.row_hashes() {
                hasher.update(row_hash.to_le_bytes());
            }
        }
        Value::Opaque(h) => {
            hasher.update([TAG_OPAQUE]);
            hasher.update(h.to_le_bytes());
        }
    }
}

/// -0.0 folds into +0.0 and every NaN folds into one canonical NaN, so
/// values that compare equal (or are equally "not a number") hash equal.
fn normalize_float(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

fn truncate_u64(digest: &[u8]) -> u64 {
    let mut first = [0u8; 8];
    first.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(first)
}

/// Generic 64-bit content hash of a value.
///
/// SHA-256 over the value's type-tagged encoding, truncated to 64 bits.
/// `Opaque` values pass their caller-supplied hash through unchanged.
#[must_use]
pub fn hash64(value: &Value) -> i64 {
    if let Value::Opaque(h) = value {
        return *h;
    }
    let mut hasher = Sha256::new();
    feed_value(&mut hasher, value);
    #[allow(clippy::cast_possible_wrap)]
    let h = truncate_u64(&hasher.finalize()) as i64;
    h
}

/// Lossily condense a value to the byte sequence fed into the call digest.
///
/// Tables condense to their row hashes' raw little-endian bytes concatenated
/// in row order; every other kind condenses to its generic 64-bit hash in
/// minimal signed little-endian form.
#[must_use]
pub fn condense(value: &Value) -> Vec<u8> {
    match value {
        Value::Table(table) => table
            .row_hashes()
            .into_iter()
            .flat_map(u64::to_le_bytes)
            .collect(),
        other => minimal_signed_le(hash64(other)),
    }
}

/// Minimal two's-complement little-endian encoding of a signed integer.
///
/// Trailing bytes that are pure sign extension are dropped; zero encodes as
/// a single zero byte.
#[must_use]
pub fn minimal_signed_le(v: i64) -> Vec<u8> {
    let bytes = v.to_le_bytes();
    let mut len = bytes.len();
    while len > 1 {
        let top = bytes[len - 1];
        let next_sign = bytes[len - 2] & 0x80;
        let redundant = (top == 0x00 && next_sign == 0) || (top == 0xff && next_sign != 0);
        if !redundant {
            break;
        }
        len -= 1;
    }
    bytes[..len].to_vec()
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Scalar(Scalar::Int(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Scalar(Scalar::Bool(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Float(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Scalar(Scalar::Str(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Scalar(Scalar::Str(v))
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Self::Table(t)
    }
}
