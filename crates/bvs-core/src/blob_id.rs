//! Content hash identifying a blob.

use crate::checksum::sha256_reader;
use crate::error::{Error, Result};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// 32-byte SHA-256 of a blob's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId([u8; 32]);

impl BlobId {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Fails with [`Error::InvalidBlobId`] unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidBlobId(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| Error::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Hash everything `reader` yields.
    pub fn of_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self(sha256_reader(reader)?))
    }

    pub fn of_path(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        Self::of_reader(std::io::BufReader::new(f))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<&[u8]> for BlobId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}
