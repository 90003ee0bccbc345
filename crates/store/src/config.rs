//! Store configuration and default base-directory resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Configuration for a [`crate::DiskStore`].
///
/// Construction is explicit and caller-owned; there is no process-global
/// default store. The no-arguments convenience survives as
/// `StoreConfig::default()`, which resolves a platform-appropriate per-user
/// cache directory.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Root directory for cached data. `None` selects the first writable
    /// candidate from the default resolution chain.
    pub base_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Configuration pinned to an explicit root directory
    #[must_use]
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

/// Inputs for determining the default base directory
#[derive(Debug, Clone)]
pub(crate) struct BaseDirInputs {
    pub memostash_cache_dir: Option<PathBuf>,
    pub xdg_cache_home: Option<PathBuf>,
    pub os_cache_dir: Option<PathBuf>,
    pub temp_dir: PathBuf,
}

pub(crate) fn base_dir_from_inputs(inputs: BaseDirInputs) -> Result<PathBuf> {
    // Resolution order (first writable wins):
    // 1) MEMOSTASH_CACHE_DIR (explicit override)
    // 2) XDG_CACHE_HOME/memostash
    // 3) OS cache dir/memostash
    // 4) TMPDIR/memostash (fallback)
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(dir) = inputs
        .memostash_cache_dir
        .filter(|p| !p.as_os_str().is_empty())
    {
        candidates.push(dir);
    }
    if let Some(xdg) = inputs.xdg_cache_home {
        candidates.push(xdg.join("memostash"));
    }
    if let Some(os_cache) = inputs.os_cache_dir {
        candidates.push(os_cache.join("memostash"));
    }
    candidates.push(inputs.temp_dir.join("memostash"));

    for path in candidates {
        // An existing candidate may be read-only; probe before committing.
        if path.exists() {
            let probe = path.join(".write_probe");
            match std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&probe)
            {
                Ok(_) => {
                    let _ = std::fs::remove_file(&probe);
                    return Ok(path);
                }
                Err(_) => {
                    // Not writable, try next candidate
                    continue;
                }
            }
        }
        if std::fs::create_dir_all(&path).is_ok() {
            return Ok(path);
        }
    }
    Err(Error::configuration(
        "failed to determine a writable cache directory",
    ))
}

/// Resolve the default base directory from the environment
pub(crate) fn default_base_dir() -> Result<PathBuf> {
    let inputs = BaseDirInputs {
        memostash_cache_dir: std::env::var("MEMOSTASH_CACHE_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        xdg_cache_home: std::env::var("XDG_CACHE_HOME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        os_cache_dir: dirs::cache_dir(),
        temp_dir: std::env::temp_dir(),
    };
    base_dir_from_inputs(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let tmp = std::env::temp_dir().join("memostash-test-override");
        let _ = std::fs::remove_dir_all(&tmp);
        let inputs = BaseDirInputs {
            memostash_cache_dir: Some(tmp.clone()),
            xdg_cache_home: Some(PathBuf::from("/nonexistent/xdg")),
            os_cache_dir: None,
            temp_dir: std::env::temp_dir(),
        };
        let dir = base_dir_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(&tmp));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unwritable_candidates_fall_through_to_temp() {
        let tmp = std::env::temp_dir();
        let inputs = BaseDirInputs {
            memostash_cache_dir: None,
            xdg_cache_home: Some(PathBuf::from("/proc/no-such-cache")),
            os_cache_dir: None,
            temp_dir: tmp.clone(),
        };
        let dir = base_dir_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(&tmp));
    }

    #[test]
    fn empty_override_is_ignored() {
        let tmp = std::env::temp_dir();
        let inputs = BaseDirInputs {
            memostash_cache_dir: Some(PathBuf::new()),
            xdg_cache_home: None,
            os_cache_dir: None,
            temp_dir: tmp.clone(),
        };
        let dir = base_dir_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(&tmp));
    }
}
