//! Byte ranges for sectioned downloads.

/// `length` bytes starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Exclusive end offset.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// HTTP Range header value (inclusive end): `bytes=offset-(offset+length-1)`.
    ///
    /// Returns `None` for an empty range: there is no valid header for zero
    /// bytes, and S3 answers one with 400 rather than an empty body.
    pub fn header_value(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!("bytes={}-{}", self.offset, self.end() - 1))
        }
    }
}
