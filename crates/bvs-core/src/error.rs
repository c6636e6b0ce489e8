//! Error types for the upload, lookup and listing paths.
//!
//! Nothing here is retried: transport failures stop the current operation,
//! and integrity failures are always fatal.

use std::io;
use thiserror::Error;

/// Failure reported by an [`ObjectStore`](crate::transport::ObjectStore) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HEAD or GET on a key that does not exist.
    #[error("object not found: {0}")]
    NotFound(String),
    /// The store rejected the request (SDK or service error).
    #[error("{0}")]
    Service(String),
    /// Reading the request body failed (e.g. the producer abandoned the upload).
    #[error("body: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    /// Blob ids are exactly 32 bytes; anything else is a caller bug.
    #[error("invalid blob id: expected 32 bytes, got {0}")]
    InvalidBlobId(usize),
    #[error("invalid blob id hex: {0}")]
    InvalidHex(String),
    /// Uploads and ETags are split into parts of at least one byte.
    #[error("part size must be non-zero")]
    InvalidPartSize,
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// HEAD succeeded but the store did not report an ETag.
    #[error("store reported no checksum for {0}")]
    MissingChecksum(String),
    #[error("upload size mismatch for {path}: wrote {local} bytes, store reports {remote}")]
    SizeMismatch { path: String, local: u64, remote: u64 },
    #[error("upload checksum mismatch for {path}: computed {local}, store reports {remote}")]
    ChecksumMismatch {
        path: String,
        local: String,
        remote: String,
    },
    #[error("upload worker panicked")]
    WorkerPanicked,
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for checksum/size mismatches: the store holds something other than what was sent.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Error::SizeMismatch { .. } | Error::ChecksumMismatch { .. } | Error::MissingChecksum(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
