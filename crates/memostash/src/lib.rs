//! Transparent on-disk memoization of deterministic function calls
//!
//! Wrap a function with a [`Stash`] and every call either returns a
//! previously persisted result or computes, persists, and returns it.
//! Results are addressed by two SHA-256 digests, one over the function's
//! source text and one over its name-sorted bound arguments, laid out as
//! `base_dir / name / function_digest / call_digest.ext` with no central
//! index. Entries never expire; deleting files externally is the only
//! invalidation, and the stash treats it as a fresh miss.
//!
//! ```no_run
//! use memostash::{CallArgs, FnSpec, Scalar, Signature, Stash, Value};
//!
//! # fn main() -> memostash::Result<()> {
//! let stash = Stash::new()?;
//! let sq = stash.cached(
//!     FnSpec::new("sq", "a * a", Signature::of_required(["a"])),
//!     |binding| match binding.get("a") {
//!         Some(Value::Scalar(Scalar::Int(a))) => a * a,
//!         _ => 0,
//!     },
//! );
//! let nine = sq.call(CallArgs::new().pos(3))?; // computed and persisted
//! let again = sq.call(CallArgs::new().kw("a", 3))?; // served from disk
//! assert_eq!(nine, again);
//! # Ok(())
//! # }
//! ```

mod cached;
mod error;

pub use cached::{CachedFn, CallArgs, FnSpec};
pub use error::{Error, Result};
pub use memostash_keys::{Binding, Digest, FunctionIdentity, Param, Scalar, Signature, Table, Value};
pub use memostash_store::{DiskStore, StoreConfig};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// A caller-owned handle to one on-disk result store.
///
/// There is no process-global stash; construct one at startup and hand it to
/// whoever wraps functions. [`Stash::new`] keeps the no-configuration
/// convenience by resolving a per-user cache directory.
#[derive(Debug, Clone)]
pub struct Stash {
    store: DiskStore,
}

impl Stash {
    /// Create a stash rooted at the default per-user cache directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no writable directory can be found.
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: DiskStore::new(StoreConfig::default())?,
        })
    }

    /// Create a stash rooted at an explicit directory
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept fallible for parity with
    /// [`Stash::new`] so callers handle both construction paths uniformly.
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: DiskStore::new(StoreConfig::at(base_dir))?,
        })
    }

    /// The directory this stash caches under
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.store.base_dir()
    }

    /// Wrap a function with read-through caching.
    ///
    /// The returned wrapper owns a handle to this stash's store and has the
    /// function digest precomputed; it can outlive the `Stash` value.
    pub fn cached<R, F>(&self, spec: FnSpec, f: F) -> CachedFn<R, F>
    where
        R: Serialize + DeserializeOwned,
        F: Fn(&Binding) -> R,
    {
        CachedFn::new(self.store.clone(), spec, f)
    }
}
