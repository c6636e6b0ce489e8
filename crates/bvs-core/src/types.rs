//! Records handed back to the backup tool.

/// A blob known to be stored remotely.
///
/// From the upload path this only exists after size and checksum were
/// verified against the store; from the lister it reflects what the store reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    pub path: String,
    /// Store-native ETag without quotes.
    pub checksum: String,
    pub size: u64,
}

/// Authoritative size and checksum of one object, as reported by HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// ETag without quotes.
    pub checksum: String,
    pub size: u64,
}
