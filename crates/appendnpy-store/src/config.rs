//! Configuration for array stores

use serde::{Deserialize, Serialize};

/// Configuration for an [`crate::AppendableArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Call `sync_data` after every append so the rows survive a crash
    pub sync_on_append: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sync_on_append: true,
        }
    }
}

impl StoreConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable syncing file data after each append
    #[must_use]
    pub const fn with_sync_on_append(mut self, enable: bool) -> Self {
        self.sync_on_append = enable;
        self
    }
}
