//! Paginated enumeration of the blobs under the root prefix.

use crate::error::Result;
use crate::metadata::strip_etag_quotes;
use crate::transport::{ListPage, ObjectStore};
use crate::types::UploadedBlob;
use std::collections::VecDeque;

/// Lazy, finite listing of stored blobs.
///
/// Pages are fetched on demand as the iterator is drained. Objects whose key
/// contains the backup marker are skipped. After the last page or the first
/// error the iterator is exhausted; start a new listing to retry.
pub struct BlobListing<'a> {
    store: &'a dyn ObjectStore,
    prefix: String,
    backup_marker: String,
    pending: VecDeque<UploadedBlob>,
    continuation: Option<String>,
    finished: bool,
    found: usize,
}

impl<'a> BlobListing<'a> {
    pub fn new(store: &'a dyn ObjectStore, prefix: String, backup_marker: String) -> Self {
        tracing::info!(prefix = %prefix, "listing blobs");
        Self {
            store,
            prefix,
            backup_marker,
            pending: VecDeque::new(),
            continuation: None,
            finished: false,
            found: 0,
        }
    }

    /// Drain the whole listing, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<UploadedBlob>> {
        self.collect()
    }

    fn accept(&mut self, page: ListPage) {
        for obj in page.objects {
            if !self.backup_marker.is_empty() && obj.key.contains(&self.backup_marker) {
                continue;
            }
            self.pending.push_back(UploadedBlob {
                checksum: strip_etag_quotes(&obj.e_tag).to_string(),
                path: obj.key,
                size: obj.size,
            });
            self.found += 1;
        }
    }
}

impl Iterator for BlobListing<'_> {
    type Item = Result<UploadedBlob>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(blob) = self.pending.pop_front() {
                return Some(Ok(blob));
            }
            if self.finished {
                return None;
            }
            let page = match self
                .store
                .list_objects_page(&self.prefix, self.continuation.as_deref())
            {
                Ok(page) => page,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            };
            self.continuation = page.next_continuation.clone();
            self.accept(page);
            if self.continuation.is_none() {
                self.finished = true;
                tracing::info!("listed {} blobs", self.found);
            } else {
                tracing::info!("fetched page, {} blobs so far", self.found);
            }
        }
    }
}
