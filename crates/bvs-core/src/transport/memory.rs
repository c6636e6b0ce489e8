//! In-process object store behaving like S3 for ETags, pagination and ranges.
//!
//! Used by tests and dry runs. ETags are computed from the whole stored body,
//! independently of the streaming calculator, and faults can be injected to
//! exercise the verification failure paths.

use super::{HeadOutput, ListPage, ObjectEntry, ObjectStore, PutOutput, TransportResult};
use crate::error::TransportError;
use crate::range::ByteRange;
use md5::{Digest, Md5};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

const READ_BUF: usize = 64 * 1024;

/// Faults applied to subsequent calls.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Fail `put_object` once at least this many body bytes have been read.
    pub fail_upload_after: Option<u64>,
    /// Added to the size reported by HEAD.
    pub size_offset: i64,
    /// HEAD reports this ETag instead of the stored one.
    pub etag_override: Option<String>,
}

/// Number of calls per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub put: usize,
    pub head: usize,
    pub list: usize,
    pub get: usize,
}

struct Stored {
    data: Vec<u8>,
    /// Quoted, as S3 returns it.
    e_tag: String,
}

pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Stored>>,
    faults: Mutex<Faults>,
    page_size: usize,
    put: AtomicUsize,
    head: AtomicUsize,
    list: AtomicUsize,
    get: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Listing pages hold 1000 keys, like S3.
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(Faults::default()),
            page_size: page_size.max(1),
            put: AtomicUsize::new(0),
            head: AtomicUsize::new(0),
            list: AtomicUsize::new(0),
            get: AtomicUsize::new(0),
        }
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = faults;
    }

    fn faults(&self) -> Faults {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store `data` directly, as if uploaded with `part_size` parts.
    pub fn insert(&self, key: &str, data: Vec<u8>, part_size: u64) {
        let e_tag = s3_etag(&data, part_size);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Stored { data, e_tag });
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|o| o.data.clone())
    }

    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            put: self.put.load(Ordering::Relaxed),
            head: self.head.load(Ordering::Relaxed),
            list: self.list.load(Ordering::Relaxed),
            get: self.get.load(Ordering::Relaxed),
        }
    }
}

/// Quoted S3 ETag of `data` stored with `part_size` parts.
fn s3_etag(data: &[u8], part_size: u64) -> String {
    if data.len() as u64 <= part_size {
        return format!("\"{:x}\"", Md5::digest(data));
    }
    let mut material = Vec::new();
    let mut parts = 0;
    for part in data.chunks(part_size as usize) {
        material.extend_from_slice(&Md5::digest(part));
        parts += 1;
    }
    format!("\"{:x}-{}\"", Md5::digest(&material), parts)
}

impl ObjectStore for MemoryStore {
    fn put_object(
        &self,
        key: &str,
        body: &mut dyn Read,
        part_size: u64,
    ) -> TransportResult<PutOutput> {
        self.put.fetch_add(1, Ordering::Relaxed);
        let fail_after = self.faults().fail_upload_after;
        let mut data = Vec::new();
        let mut buf = vec![0u8; READ_BUF];
        loop {
            if let Some(limit) = fail_after {
                if data.len() as u64 >= limit {
                    return Err(TransportError::Service(format!(
                        "injected failure after {} bytes",
                        data.len()
                    )));
                }
            }
            let n = body.read(&mut buf)?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }
        let e_tag = s3_etag(&data, part_size);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.to_string(),
                Stored {
                    data,
                    e_tag: e_tag.clone(),
                },
            );
        Ok(PutOutput {
            location: format!("memory://{}", key),
            e_tag: Some(e_tag),
        })
    }

    fn head_object(&self, key: &str) -> TransportResult<HeadOutput> {
        self.head.fetch_add(1, Ordering::Relaxed);
        let faults = self.faults();
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        let obj = objects
            .get(key)
            .ok_or_else(|| TransportError::NotFound(key.to_string()))?;
        let size = (obj.data.len() as i64 + faults.size_offset).max(0) as u64;
        let e_tag = match faults.etag_override {
            Some(e) => format!("\"{}\"", e),
            None => obj.e_tag.clone(),
        };
        Ok(HeadOutput {
            content_length: size,
            e_tag: Some(e_tag),
        })
    }

    fn list_objects_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> TransportResult<ListPage> {
        self.list.fetch_add(1, Ordering::Relaxed);
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        let start = match continuation {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };
        let mut matching = objects
            .range((start, Bound::Unbounded))
            .filter(|(k, _)| k.starts_with(prefix));
        let page: Vec<ObjectEntry> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(k, o)| ObjectEntry {
                key: k.clone(),
                e_tag: o.e_tag.clone(),
                size: o.data.len() as u64,
            })
            .collect();
        let more = matching.next().is_some();
        let next_continuation = if more {
            page.last().map(|o| o.key.clone())
        } else {
            None
        };
        Ok(ListPage {
            objects: page,
            next_continuation,
        })
    }

    fn get_object_range(
        &self,
        key: &str,
        range: ByteRange,
    ) -> TransportResult<Box<dyn Read + Send>> {
        self.get.fetch_add(1, Ordering::Relaxed);
        let header = range.header_value().ok_or_else(|| {
            TransportError::Service("InvalidRange: zero-length range requested".to_string())
        })?;
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        let obj = objects
            .get(key)
            .ok_or_else(|| TransportError::NotFound(key.to_string()))?;
        let total = obj.data.len() as u64;
        if range.offset >= total {
            return Err(TransportError::Service(format!(
                "InvalidRange: {} of {} bytes",
                header, total
            )));
        }
        let end = range.end().min(total);
        let slice = obj.data[range.offset as usize..end as usize].to_vec();
        Ok(Box::new(Cursor::new(slice)))
    }
}
