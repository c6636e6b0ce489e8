//! Remote key layout: blobs are sharded two levels deep by hex prefix so no
//! single "directory" in the bucket ends up with millions of siblings.

use crate::blob_id::BlobId;

/// `ab/cd/abcd…` for a blob whose hex id starts with `abcd`.
pub fn format_blob_path(id: &BlobId) -> String {
    let h = id.to_hex();
    format!("{}/{}/{}", &h[..2], &h[2..4], h)
}

/// Root path with a trailing `/`, or empty if no root is configured.
pub fn nice_root_path(root: &str) -> String {
    let mut path = root.to_string();
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Full key for a blob under `root`.
pub fn blob_path(root: &str, id: &BlobId) -> String {
    nice_root_path(root) + &format_blob_path(id)
}

/// Full key for a non-blob object (e.g. a database backup) under `root`.
pub fn named_path(root: &str, name: &str) -> String {
    nice_root_path(root) + name
}
