//! Configuration for SkipKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SkipKvError};

/// Default bound on skip list height
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Default snapshot location, relative to the working directory
pub const DEFAULT_SNAPSHOT_PATH: &str = "store/dumpfile";

/// Main configuration for a SkipKV index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Structure Configuration
    // -------------------------------------------------------------------------
    /// Number of link levels the head spans. Node levels and the list's
    /// current level are always strictly below this.
    pub max_level: usize,

    /// Seed for the level generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// File used by `persist`/`restore` and by `open`
    pub snapshot_path: PathBuf,

    /// What to do with snapshot lines that fail to parse
    pub load_policy: LoadPolicy,
}

/// Snapshot load policy for malformed lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad line; the index is left unchanged
    #[default]
    Strict,

    /// Skip bad lines with a warning and load the rest
    Lenient,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            seed: None,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            load_policy: LoadPolicy::Strict,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration describes a usable index
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 {
            return Err(SkipKvError::Config("max_level must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum number of levels
    pub fn max_level(mut self, levels: usize) -> Self {
        self.config.max_level = levels;
        self
    }

    /// Seed the level generator for reproducible layouts
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the snapshot file path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Set the snapshot load policy
    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.config.load_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
