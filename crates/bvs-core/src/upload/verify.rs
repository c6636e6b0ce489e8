//! Compares what was sent with what the store reports.

use crate::checksum::CompositeChecksum;
use crate::error::{Error, Result};
use crate::types::ObjectMetadata;

/// Ok only if the store holds exactly `local_size` bytes with ETag `local`.
///
/// Size is checked first: a size mismatch explains a checksum mismatch, not
/// the other way around.
pub fn verify_upload(
    path: &str,
    local: &CompositeChecksum,
    local_size: u64,
    remote: &ObjectMetadata,
) -> Result<()> {
    if remote.size != local_size {
        return Err(Error::SizeMismatch {
            path: path.to_string(),
            local: local_size,
            remote: remote.size,
        });
    }
    if local.as_str() != remote.checksum {
        return Err(Error::ChecksumMismatch {
            path: path.to_string(),
            local: local.to_string(),
            remote: remote.checksum.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::etag_of;

    fn remote(checksum: &str, size: u64) -> ObjectMetadata {
        ObjectMetadata {
            checksum: checksum.to_string(),
            size,
        }
    }

    #[test]
    fn matching_ok() {
        let local = etag_of(8, b"abc");
        assert!(verify_upload("p", &local, 3, &remote(local.as_str(), 3)).is_ok());
    }

    #[test]
    fn size_mismatch_reported_first() {
        let local = etag_of(8, b"abc");
        let err = verify_upload("p", &local, 3, &remote("other", 4)).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                local: 3,
                remote: 4,
                ..
            }
        ));
    }

    #[test]
    fn checksum_mismatch_with_equal_size() {
        let local = etag_of(8, b"abc");
        let err = verify_upload("p", &local, 3, &remote("0cc175b9c0f1b6a831c399e269772661", 3))
            .unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
        assert!(err.is_integrity_failure());
    }
}
