//! Directory-addressed result store for memostash
//!
//! Maps `(function digest, call digest)` to a serialized result blob on
//! disk, with read-through-miss-then-write semantics and lazy directory
//! creation. There is no central index and no entry metadata: the file at a
//! deterministic path is the entire state of an entry.

mod codec;
mod config;
mod disk;
mod error;

pub use codec::{Codec, JsonCodec};
pub use config::StoreConfig;
pub use disk::DiskStore;
pub use error::{Error, Result};
