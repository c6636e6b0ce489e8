//! Point lookups of an object's authoritative size and ETag.

use crate::error::{Error, Result};
use crate::transport::ObjectStore;
use crate::types::ObjectMetadata;

/// S3 wraps ETags in double quotes; strip one surrounding pair if present.
pub fn strip_etag_quotes(etag: &str) -> &str {
    etag.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(etag)
}

/// HEAD `path` and return its size and unquoted ETag.
///
/// Only call this for objects that should exist: a missing object is an error.
pub fn fetch_metadata(store: &dyn ObjectStore, path: &str) -> Result<ObjectMetadata> {
    let head = store.head_object(path)?;
    let etag = head
        .e_tag
        .as_deref()
        .ok_or_else(|| Error::MissingChecksum(path.to_string()))?;
    Ok(ObjectMetadata {
        checksum: strip_etag_quotes(etag).to_string(),
        size: head.content_length,
    })
}
