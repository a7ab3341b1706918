//! Local cache of the last IP address pushed to DNS.

use crate::error::{DdnsError, Result};
use std::path::{Path, PathBuf};

const DEFAULT_FILE_NAME: &str = ".current-ip-address";

/// Plain-text file holding the last IP address a successful run recorded.
///
/// The file is read once at the start of a run and overwritten once after
/// a successful remote update. Writes are not atomic; a torn write is
/// self-healing because the next run's comparison will see a mismatch and
/// update again.
pub struct IpCache {
    path: PathBuf,
}

impl IpCache {
    /// Create a cache backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the default cache file path (`~/.current-ip-address`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DdnsError::Config("Could not find home directory".to_string()))?;
        Ok(home.join(DEFAULT_FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached IP address, trimmed.
    ///
    /// A missing file means no prior value and maps to `Ok(None)`. Any
    /// other read error propagates.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No cached IP address file");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(content.trim().to_string()))
    }

    /// Overwrite the cache with a new address plus a trailing newline.
    pub fn store(&self, ip_address: &str) -> Result<()> {
        std::fs::write(&self.path, format!("{}\n", ip_address))?;
        tracing::debug!(path = %self.path.display(), ip = ip_address, "Cached IP address");
        Ok(())
    }
}
