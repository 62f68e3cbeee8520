//! Configuration management for the S3 volume
//!
//! Loaded once at construction from a TOML file with environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::path::DEFAULT_ROOT_NAME;

/// Environment variable prefix, e.g. `RAX_S3_BUCKET`
pub const ENV_PREFIX: &str = "RAX_S3";

/// Largest `max_object_size_mb` whose byte count fits in a `u64`
pub const MAX_OBJECT_SIZE_MB: u64 = u64::MAX >> 20;

/// Complete volume configuration
#[derive(Debug, Deserialize, Clone)]
pub struct VolumeConfig {
    // ═══ CREDENTIALS & BUCKET (required) ═══
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,

    // ═══ CLIENT (optional) ═══
    /// Custom endpoint for S3-compatible services
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Path-style addressing, needed by most self-hosted stores
    #[serde(default)]
    pub force_path_style: bool,

    // ═══ VOLUME LAYOUT ═══
    /// Root path inside the bucket
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Name shown as the first segment of logical paths
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Directory for named scratch files; anonymous temp files when unset
    #[serde(default)]
    pub tmp_path: Option<String>,

    /// Maximum size of content accepted by `save`
    #[serde(default = "default_max_object_size_mb")]
    pub max_object_size_mb: u64,
}

fn default_root_path() -> String {
    "/".to_string()
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

fn default_max_object_size_mb() -> u64 {
    100
}

impl VolumeConfig {
    /// Minimal configuration for the given credentials and bucket
    pub fn new(access_key: &str, secret_key: &str, bucket: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            bucket: bucket.to_string(),
            endpoint: None,
            region: None,
            force_path_style: false,
            root_path: default_root_path(),
            root_name: default_root_name(),
            tmp_path: None,
            max_object_size_mb: default_max_object_size_mb(),
        }
    }

    /// Load configuration from `path` (or `config.toml`) with environment overrides
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or("config")).required(path.is_some()))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: VolumeConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.access_key.trim().is_empty() || self.secret_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "access_key and secret_key are required".into(),
            ));
        }

        if self.bucket.trim().is_empty() {
            return Err(config::ConfigError::Message("bucket is required".into()));
        }

        if self.max_object_size_mb == 0 {
            return Err(config::ConfigError::Message(
                "max_object_size_mb must be greater than 0".into(),
            ));
        }

        if self.max_object_size_mb > MAX_OBJECT_SIZE_MB {
            return Err(config::ConfigError::Message(format!(
                "max_object_size_mb must not exceed {}",
                MAX_OBJECT_SIZE_MB
            )));
        }

        Ok(())
    }

    /// Get maximum object size in bytes
    pub fn max_object_size_bytes(&self) -> u64 {
        self.max_object_size_mb.saturating_mul(1024 * 1024)
    }

    /// Get scratch directory as PathBuf
    pub fn tmp_path_buf(&self) -> Option<PathBuf> {
        self.tmp_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
