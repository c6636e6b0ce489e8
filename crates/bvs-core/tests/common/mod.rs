//! Shared fixtures for integration tests: an in-memory remote and test bodies.

use bvs_core::config::RemoteConfig;
use bvs_core::transport::MemoryStore;
use bvs_core::{BlobId, Remote};
use std::io::Write;
use std::sync::Arc;

pub const MIB: usize = 1024 * 1024;

/// Remote over a fresh `MemoryStore` with the given part size.
pub fn memory_remote(root: &str, part_size: u64) -> (Remote, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cfg = RemoteConfig::new("test-bucket")
        .with_root_path(root)
        .with_part_size(part_size);
    (Remote::new(cfg, store.clone()), store)
}

/// Deterministic, non-repeating-per-part body of `len` bytes.
pub fn body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 ^ (i / 251) as u8).collect()
}

pub fn id(byte: u8) -> BlobId {
    BlobId::from_bytes([byte; 32])
}

/// Stream `data` into `remote` in `write_size` pieces and finish the upload.
pub fn upload(
    remote: &Remote,
    blob: &BlobId,
    data: &[u8],
    write_size: usize,
) -> bvs_core::Result<bvs_core::UploadedBlob> {
    let mut up = remote.begin_blob_upload(blob.as_bytes())?;
    for piece in data.chunks(write_size.max(1)) {
        up.write_all(piece)?;
    }
    up.end()
}
