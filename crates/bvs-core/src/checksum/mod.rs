//! Checksums: SHA-256 content hashes (blob ids) and S3-compatible ETags.
//!
//! The ETag calculator runs inline with the upload stream so the checksum the
//! store reports can be cross-checked against the bytes actually sent.

mod etag;
mod sha256;

pub use etag::{etag_of, CompositeChecksum, ETagCalculator, DEFAULT_PART_SIZE};
pub use sha256::sha256_reader;
