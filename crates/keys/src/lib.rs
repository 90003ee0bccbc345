//! Cache-key derivation for memostash
//!
//! This crate condenses a function's identity and one invocation's arguments
//! into two fixed-length hex digests:
//! - the *function digest*: SHA-256 over the function's raw source text
//! - the *call digest*: SHA-256 over the name-sorted bound arguments, each
//!   value reduced by a lossy, type-directed condensation
//!
//! Both digests are pure functions of their inputs; storage addressing is
//! left to `memostash-store`.

mod binding;
mod digest;
mod error;
pub mod value;

pub use binding::{Binding, Param, Signature, digest_call};
pub use digest::{Digest, FunctionIdentity};
pub use error::{Error, Result};
pub use value::{Scalar, Table, Value, condense};
