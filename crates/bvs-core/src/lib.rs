pub mod config;
pub mod logging;

pub mod blob_id;
pub mod checksum;
pub mod download;
pub mod error;
pub mod listing;
pub mod metadata;
pub mod path_scheme;
pub mod pipe;
pub mod range;
pub mod remote;
pub mod tee;
pub mod transport;
pub mod types;
pub mod upload;

pub use blob_id::BlobId;
pub use error::{Error, Result, TransportError};
pub use remote::Remote;
pub use types::{ObjectMetadata, UploadedBlob};
