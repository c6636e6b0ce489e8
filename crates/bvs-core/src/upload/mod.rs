//! Verified uploads.
//!
//! Bytes go to the store and to a local ETag calculator at the same time;
//! once the store has the object, its reported size and ETag must match what
//! was computed locally or the upload fails.

mod backup;
mod session;
mod verify;

pub use backup::{backup_name, BACKUP_MARKER};
pub use session::BlobUpload;
pub use verify::verify_upload;

pub(crate) use backup::upload_backup;
pub(crate) use session::begin;

use crate::error::{Error, Result};

/// Rejects a zero part size before anything is spawned or sent.
pub(crate) fn check_part_size(part_size: u64) -> Result<()> {
    if part_size == 0 {
        return Err(Error::InvalidPartSize);
    }
    Ok(())
}
