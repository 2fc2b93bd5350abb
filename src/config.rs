//! Configuration for stridelog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a [`crate::RecordStore`] instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Mount point under which all stream files live.
    /// Internal structure:
    ///   {mount_dir}/
    ///     ├── <basename>.raw   (raw sample-batch records, 252-byte stride)
    ///     └── <basename>.act   (summary records, 20-byte stride)
    pub mount_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Session Pool Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of concurrently open write sessions (pool capacity K).
    /// Slots are preallocated; `open_session` fails with `Capacity` once all
    /// are in use. The observed deployment runs with K = 1.
    pub max_open_sessions: usize,

    // -------------------------------------------------------------------------
    // Consumption Protocol Configuration
    // -------------------------------------------------------------------------
    /// When true (the default), reading the terminal record of a stream
    /// deletes the backing file as a side effect. Consumers that want pure
    /// reads set this to false and call `delete` explicitly once drained.
    pub auto_harvest: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mount_dir: PathBuf::from("./stridelog_data"),
            max_open_sessions: 1,
            auto_harvest: true,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the mount directory (root for all stream files)
    pub fn mount_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mount_dir = path.into();
        self
    }

    /// Set the session pool capacity K
    pub fn max_open_sessions(mut self, count: usize) -> Self {
        self.config.max_open_sessions = count;
        self
    }

    /// Enable or disable harvest-on-last-read
    pub fn auto_harvest(mut self, enabled: bool) -> Self {
        self.config.auto_harvest = enabled;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
