//! One-shot verified upload of a database backup under a caller-chosen name.

use crate::checksum::etag_of;
use crate::config::RemoteConfig;
use crate::error::Result;
use crate::metadata::fetch_metadata;
use crate::path_scheme::named_path;
use crate::transport::ObjectStore;
use crate::types::UploadedBlob;

use super::check_part_size;
use super::verify::verify_upload;

/// Default marker in backup object names; the lister skips keys containing it.
pub const BACKUP_MARKER: &str = "db-backup-";

/// Object name for a backup taken at `unix_secs`.
pub fn backup_name(marker: &str, unix_secs: u64) -> String {
    format!("{}{}", marker, unix_secs)
}

pub(crate) fn upload_backup(
    store: &dyn ObjectStore,
    config: &RemoteConfig,
    data: &[u8],
    name: &str,
) -> Result<UploadedBlob> {
    check_part_size(config.part_size)?;
    let path = named_path(&config.root_path, name);
    let mut body = data;
    let output = store.put_object(&path, &mut body, config.part_size)?;

    let etag = etag_of(config.part_size, data);
    let remote = fetch_metadata(store, &path)?;
    verify_upload(&path, &etag, data.len() as u64, &remote)?;
    tracing::info!(path = %path, location = %output.location, "database backed up");

    Ok(UploadedBlob {
        path,
        checksum: etag.into_string(),
        size: remote.size,
    })
}
