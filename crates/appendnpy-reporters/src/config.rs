//! Reporter configuration

use crate::{ReportError, Result};
use appendnpy_store::StoreConfig;
use std::path::{Path, PathBuf};

/// Where and how often a reporter writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    path: PathBuf,
    interval: u64,
    store: StoreConfig,
}

impl ReporterConfig {
    /// Report to `path` every `interval` steps
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidInterval`] if `interval` is zero.
    pub fn new(path: impl AsRef<Path>, interval: u64) -> Result<Self> {
        if interval == 0 {
            return Err(ReportError::InvalidInterval);
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            interval,
            store: StoreConfig::default(),
        })
    }

    /// Use `store` for every session this reporter opens
    #[must_use]
    pub const fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Steps between reports
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Store configuration for report sessions
    pub const fn store(&self) -> StoreConfig {
        self.store
    }

    /// Steps from `current_step` until the next report
    ///
    /// Always in `1..=interval`: a reporter sitting on a multiple of the
    /// interval waits a full interval.
    pub const fn steps_until_next(&self, current_step: u64) -> u64 {
        self.interval - current_step % self.interval
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert!(matches!(
            ReporterConfig::new("f.npy", 0),
            Err(ReportError::InvalidInterval)
        ));
    }

    #[test]
    fn test_steps_until_next() {
        let config = ReporterConfig::new("f.npy", 100).unwrap();
        assert_eq!(config.steps_until_next(0), 100);
        assert_eq!(config.steps_until_next(1), 99);
        assert_eq!(config.steps_until_next(99), 1);
        assert_eq!(config.steps_until_next(100), 100);
        assert_eq!(config.steps_until_next(250), 50);
    }

    #[test]
    fn test_default_store_syncs() {
        let config = ReporterConfig::new("f.npy", 1).unwrap();
        assert!(config.store().sync_on_append);
        let config = config.with_store_config(StoreConfig::new().with_sync_on_append(false));
        assert!(!config.store().sync_on_append);
    }
}
