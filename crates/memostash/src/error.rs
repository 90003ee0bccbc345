//! Unified error type for the facade

use miette::Diagnostic;
use thiserror::Error;

/// Error type for cached-call operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Argument binding or digest derivation failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Key(#[from] memostash_keys::Error),

    /// The result store failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] memostash_store::Error),
}

/// Result type for cached-call operations
pub type Result<T> = std::result::Result<T, Error>;
