//! The remote storage backend as the backup tool sees it.

use crate::config::RemoteConfig;
use crate::download::download_section;
use crate::error::Result;
use crate::listing::BlobListing;
use crate::metadata::fetch_metadata;
use crate::path_scheme::nice_root_path;
use crate::transport::ObjectStore;
use crate::types::{ObjectMetadata, UploadedBlob};
use crate::upload::{self, backup_name, BlobUpload};
use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// One configured bucket/prefix on an object store.
#[derive(Clone)]
pub struct Remote {
    config: RemoteConfig,
    store: Arc<dyn ObjectStore>,
}

impl Remote {
    pub fn new(config: RemoteConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Storage identifier recorded alongside uploaded blobs.
    pub fn id(&self) -> &[u8] {
        &self.config.storage_id
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Key prefix of everything this remote stores, with trailing `/` unless empty.
    pub fn root_prefix(&self) -> String {
        nice_root_path(&self.config.root_path)
    }

    /// Start a verified upload of the blob `blob_id` (must be 32 bytes).
    pub fn begin_blob_upload(&self, blob_id: &[u8]) -> Result<BlobUpload> {
        upload::begin(Arc::clone(&self.store), &self.config, blob_id)
    }

    /// Upload `data` under `name` (not content-addressed) and verify it.
    pub fn upload_database_backup(&self, data: &[u8], name: &str) -> Result<UploadedBlob> {
        upload::upload_backup(self.store.as_ref(), &self.config, data, name)
    }

    /// Backup object name for `unix_secs` using this remote's marker.
    pub fn backup_name(&self, unix_secs: u64) -> String {
        backup_name(&self.config.backup_marker, unix_secs)
    }

    pub fn metadata(&self, path: &str) -> Result<ObjectMetadata> {
        fetch_metadata(self.store.as_ref(), path)
    }

    pub fn download_section(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Box<dyn Read + Send>> {
        download_section(self.store.as_ref(), path, offset, length)
    }

    /// All blobs under the root prefix, fetched page by page as the iterator is consumed.
    pub fn list_blobs(&self) -> BlobListing<'_> {
        BlobListing::new(
            self.store.as_ref(),
            self.root_prefix(),
            self.config.backup_marker.clone(),
        )
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S3 bucket {} at path {}",
            self.config.bucket, self.config.root_path
        )
    }
}
