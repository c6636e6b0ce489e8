use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::checksum::DEFAULT_PART_SIZE;
use crate::upload::BACKUP_MARKER;

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_part_size() -> u64 {
    DEFAULT_PART_SIZE
}

fn default_backup_marker() -> String {
    BACKUP_MARKER.to_string()
}

/// Global configuration loaded from `~/.config/bvs/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BvsConfig {
    /// Storage identifier as hex (distinguishes this remote from others in the backup DB).
    #[serde(default)]
    pub storage_id: String,
    /// Bucket holding the blobs.
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO etc.); None = AWS.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Key prefix under which blobs and backups live; empty = bucket root.
    #[serde(default)]
    pub root_path: String,
    /// Upload part size and ETag chunk size in bytes. Keep at 16 MiB unless the
    /// bucket never transitions objects to another storage class.
    #[serde(default = "default_part_size")]
    pub part_size: u64,
    /// Keys containing this are database backups, not blobs.
    #[serde(default = "default_backup_marker")]
    pub backup_marker: String,
}

impl Default for BvsConfig {
    fn default() -> Self {
        Self {
            storage_id: String::new(),
            bucket: "my-backup-bucket".to_string(),
            region: default_region(),
            endpoint: None,
            root_path: String::new(),
            part_size: DEFAULT_PART_SIZE,
            backup_marker: default_backup_marker(),
        }
    }
}

/// Connection and layout settings passed explicitly to each component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub storage_id: Vec<u8>,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub root_path: String,
    pub part_size: u64,
    pub backup_marker: String,
}

impl RemoteConfig {
    /// Settings for `bucket` with defaults for everything else.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            storage_id: Vec::new(),
            bucket: bucket.into(),
            region: default_region(),
            endpoint: None,
            root_path: String::new(),
            part_size: DEFAULT_PART_SIZE,
            backup_marker: default_backup_marker(),
        }
    }

    pub fn with_root_path(mut self, root: impl Into<String>) -> Self {
        self.root_path = root.into();
        self
    }

    pub fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size;
        self
    }
}

impl BvsConfig {
    /// Validate and convert into the value handed to `Remote`.
    pub fn remote(&self) -> Result<RemoteConfig> {
        if self.part_size == 0 {
            anyhow::bail!("part_size must be greater than zero");
        }
        if self.bucket.trim().is_empty() {
            anyhow::bail!("bucket must not be empty");
        }
        let storage_id = hex::decode(self.storage_id.trim()).context("storage_id is not valid hex")?;
        Ok(RemoteConfig {
            storage_id,
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            root_path: self.root_path.clone(),
            part_size: self.part_size,
            backup_marker: self.backup_marker.clone(),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bvs")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BvsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BvsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BvsConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
