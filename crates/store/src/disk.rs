//! Directory-addressed read-through result store
//!
//! Entries live at `base_dir / qualname / function_digest / call_digest.ext`
//! with no central index: existence of the leaf file is the only state. An
//! entry is created on first miss, never mutated in place, and destroyed
//! only by external removal, which the store treats as a fresh miss.
//!
//! No cross-process coordination is attempted. Two concurrent callers
//! missing on the same key will both compute and both write; results are
//! assumed deterministic, so last-writer-wins loses no correctness, only
//! duplicate work. Writes go through a temp file and an atomic rename, so a
//! racing reader only ever observes whole files.

use crate::codec::Codec;
use crate::config::{StoreConfig, default_base_dir};
use crate::{Error, Result};
use memostash_keys::{Digest, FunctionIdentity};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Read-through cache of serialized results, keyed by function and call
/// digests
#[derive(Debug, Clone)]
pub struct DiskStore {
    base_dir: PathBuf,
}

impl DiskStore {
    /// Create a store from a configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no base directory was given and no
    /// writable default candidate exists.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let base_dir = match config.base_dir {
            Some(dir) => dir,
            None => default_base_dir()?,
        };
        tracing::info!(base_dir = %base_dir.display(), "results will be cached here");
        Ok(Self { base_dir })
    }

    /// The root directory of this store
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Compose the storage path for one cache entry. Pure, no I/O.
    #[must_use]
    pub fn entry_path(
        &self,
        function: &FunctionIdentity,
        call_digest: &Digest,
        extension: &str,
    ) -> PathBuf {
        self.base_dir
            .join(function.qualname())
            .join(function.digest().as_hex())
            .join(format!("{}.{extension}", call_digest.as_hex()))
    }

    /// Read an entry's full contents if it exists.
    ///
    /// Absence is the expected miss path and returns `Ok(None)`; only real
    /// I/O failures (permissions, hardware) are errors.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for any failure other than absence.
    pub fn try_get(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        use std::io::ErrorKind;
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            // NotADirectory covers a path whose parent chain does not exist
            // as directories yet, which is still just a miss
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(e) => Err(Error::io(e, path, "read")),
        }
    }

    /// Write an entry, creating the parent directory chain as needed.
    ///
    /// The payload goes to a temp file in the target directory first and is
    /// renamed into place, so concurrent readers never see a partial write.
    /// The temp name is unique per writer, so concurrent writers of the same
    /// key cannot interleave into one temp file; each renames a whole
    /// payload and the last rename wins. Pre-existing directories and
    /// entries are overwritten without error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or any write step fails.
    pub fn put(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, parent, "create_dir_all"))?;
        }

        static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);
        let tmp_path = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let mut file =
            fs::File::create(&tmp_path).map_err(|e| Error::io(e, &tmp_path, "create"))?;
        file.write_all(bytes)
            .map_err(|e| Error::io(e, &tmp_path, "write"))?;
        file.sync_all()
            .map_err(|e| Error::io(e, &tmp_path, "sync"))?;
        drop(file);

        fs::rename(&tmp_path, path).map_err(|e| Error::io(e, path, "rename"))?;
        Ok(())
    }

    /// The composed read-through operation and the store's only consumer
    /// entry point.
    ///
    /// On hit, decode the stored payload. On miss, run `compute`, persist
    /// the encoded result, and return the original value. Persistence is
    /// best-effort: a failed write is logged and the freshly computed value
    /// is still returned, since the answer's correctness never depends on
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be read or decoded, or
    /// if the computed result cannot be encoded. A decode failure is fatal
    /// for the call; corrupt entries are invalidated by external deletion,
    /// not silently recomputed.
    pub fn resolve<T, C, F>(
        &self,
        function: &FunctionIdentity,
        call_digest: &Digest,
        codec: &C,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        C: Codec,
        F: FnOnce() -> T,
    {
        let path = self.entry_path(function, call_digest, codec.extension());
        tracing::debug!(
            function = function.qualname(),
            path = %path.display(),
            "cache path for call"
        );

        if let Some(bytes) = self.try_get(&path)? {
            return codec.from_bytes(&bytes);
        }

        let result = compute();
        let bytes = codec.to_bytes(&result)?;
        if let Err(e) = self.put(&path, &bytes) {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to persist result; returning uncached value"
            );
        }
        Ok(result)
    }
}
