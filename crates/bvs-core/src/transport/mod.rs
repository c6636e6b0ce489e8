//! Object store transport: the seam between the verified upload pipeline and
//! the network.
//!
//! Implementations are blocking; the upload session drives `put_object` from
//! a dedicated worker thread. Retries and multipart negotiation are the
//! implementation's business, but the part size it is given must be used as-is
//! or the store's ETag will not match the locally computed one.

mod memory;
mod s3;

pub use memory::{CallCounts, Faults, MemoryStore};
pub use s3::S3Store;

use crate::error::TransportError;
use crate::range::ByteRange;
use std::io::Read;

pub type TransportResult<T> = Result<T, TransportError>;

/// Result of a completed upload.
#[derive(Debug, Clone, Default)]
pub struct PutOutput {
    /// Where the store says the object lives (URL or key).
    pub location: String,
    /// ETag as returned by the store, possibly quoted.
    pub e_tag: Option<String>,
}

/// Result of a HEAD request.
#[derive(Debug, Clone)]
pub struct HeadOutput {
    pub content_length: u64,
    /// ETag as returned by the store, possibly quoted.
    pub e_tag: Option<String>,
}

/// One object in a listing page.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: String,
    pub e_tag: String,
    pub size: u64,
}

/// One page of a listing; `next_continuation` is `None` on the last page.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectEntry>,
    pub next_continuation: Option<String>,
}

pub trait ObjectStore: Send + Sync {
    /// Upload everything `body` yields to `key`, using parts of exactly `part_size`
    /// bytes. A body no larger than one part is stored with a single PUT.
    fn put_object(&self, key: &str, body: &mut dyn Read, part_size: u64)
        -> TransportResult<PutOutput>;

    fn head_object(&self, key: &str) -> TransportResult<HeadOutput>;

    /// One page of keys under `prefix`, starting after `continuation`.
    fn list_objects_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> TransportResult<ListPage>;

    /// Ranged GET. Stores reject zero-length ranges; callers must not send one.
    fn get_object_range(
        &self,
        key: &str,
        range: ByteRange,
    ) -> TransportResult<Box<dyn Read + Send>>;
}
