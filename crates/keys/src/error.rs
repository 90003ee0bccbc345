//! Error types for key derivation

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Error type for digest and binding operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A digest string failed validation
    #[error("digest must be 64 hex characters, got {length}")]
    #[diagnostic(code(memostash::keys::invalid_digest))]
    InvalidDigest {
        /// Length of the rejected string
        length: usize,
    },

    /// A digest string contained non-hex characters
    #[error("digest must contain only lowercase hex digits")]
    #[diagnostic(code(memostash::keys::invalid_digest))]
    InvalidDigestChar,

    /// More positional arguments than declared parameters
    #[error("too many positional arguments: expected at most {expected}, got {given}")]
    #[diagnostic(code(memostash::keys::too_many_positional))]
    TooManyPositional {
        /// Number of declared parameters
        expected: usize,
        /// Number of positional arguments supplied
        given: usize,
    },

    /// A keyword argument named a parameter the signature does not declare
    #[error("unknown parameter: {name}")]
    #[diagnostic(code(memostash::keys::unknown_parameter))]
    UnknownParameter {
        /// The offending keyword name
        name: String,
    },

    /// A parameter was supplied both positionally and by keyword
    #[error("parameter bound twice: {name}")]
    #[diagnostic(code(memostash::keys::duplicate_argument))]
    DuplicateArgument {
        /// The parameter bound more than once
        name: String,
    },

    /// A required parameter was left unbound
    #[error("missing required parameter: {name}")]
    #[diagnostic(
        code(memostash::keys::missing_argument),
        help("supply the argument positionally or by keyword")
    )]
    MissingArgument {
        /// The unbound required parameter
        name: String,
    },

    /// Table columns had unequal lengths
    #[error("table columns must have equal lengths: column {column} has {got} rows, expected {expected}")]
    #[diagnostic(code(memostash::keys::ragged_table))]
    RaggedTable {
        /// Name of the offending column
        column: String,
        /// Row count of the offending column
        got: usize,
        /// Row count of the first column
        expected: usize,
    },
}

/// Result type for key derivation operations
pub type Result<T> = std::result::Result<T, Error>;
