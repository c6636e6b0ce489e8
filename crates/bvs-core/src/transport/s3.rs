//! S3 transport on the AWS SDK.
//!
//! The SDK is async; calls are driven to completion on a runtime handle
//! captured at construction so the `ObjectStore` trait stays blocking. Do not
//! call these methods from inside an async task; use `spawn_blocking` or a
//! plain thread.

use super::{HeadOutput, ListPage, ObjectEntry, ObjectStore, PutOutput, TransportResult};
use crate::config::RemoteConfig;
use crate::error::TransportError;
use crate::range::ByteRange;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use std::fmt::Debug;
use std::future::Future;
use std::io::{self, Cursor, Read};
use tokio::runtime::Handle;

#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
    bucket: String,
    handle: Handle,
}

fn sdk_error<E, R>(op: &str, err: SdkError<E, R>) -> TransportError
where
    E: std::error::Error + Send + Sync + 'static,
    R: Debug,
{
    TransportError::Service(format!("{} failed: {}", op, DisplayErrorContext(&err)))
}

/// Read up to `part_size` bytes; shorter only at end of stream.
fn read_part(body: &mut dyn Read, part_size: u64) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut *body).take(part_size).read_to_end(&mut buf)?;
    Ok(buf)
}

impl S3Store {
    /// Build a client for `config`. Must be called from within a Tokio runtime,
    /// whose handle is kept for later blocking calls.
    pub async fn connect(config: &RemoteConfig) -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&base);
        if let Some(endpoint) = &config.endpoint {
            // MinIO and most other S3-compatible services need path-style addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            handle: Handle::current(),
        }
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.handle.block_on(fut)
    }

    fn put_single(&self, key: &str, data: Vec<u8>) -> TransportResult<PutOutput> {
        let out = self
            .block_on(
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .body(ByteStream::from(data))
                    .send(),
            )
            .map_err(|e| sdk_error("PutObject", e))?;
        Ok(PutOutput {
            location: format!("s3://{}/{}", self.bucket, key),
            e_tag: out.e_tag().map(str::to_string),
        })
    }

    /// Uploads `current`, `next` and the rest of `body` as parts of `upload_id`.
    fn put_parts(
        &self,
        key: &str,
        upload_id: &str,
        mut current: Vec<u8>,
        mut next: Vec<u8>,
        body: &mut dyn Read,
        part_size: u64,
    ) -> TransportResult<PutOutput> {
        let mut completed = Vec::new();
        let mut part_number: i32 = 1;
        loop {
            let out = self
                .block_on(
                    self.client
                        .upload_part()
                        .bucket(&self.bucket)
                        .key(key)
                        .upload_id(upload_id)
                        .part_number(part_number)
                        .body(ByteStream::from(current))
                        .send(),
                )
                .map_err(|e| sdk_error("UploadPart", e))?;
            completed.push(
                CompletedPart::builder()
                    .set_e_tag(out.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );
            tracing::debug!(key, part_number, "uploaded part");
            if next.is_empty() {
                break;
            }
            current = next;
            next = if current.len() as u64 == part_size {
                read_part(body, part_size)?
            } else {
                Vec::new()
            };
            part_number += 1;
        }

        let out = self
            .block_on(
                self.client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(upload_id)
                    .multipart_upload(
                        CompletedMultipartUpload::builder()
                            .set_parts(Some(completed))
                            .build(),
                    )
                    .send(),
            )
            .map_err(|e| sdk_error("CompleteMultipartUpload", e))?;
        Ok(PutOutput {
            location: out
                .location()
                .map(str::to_string)
                .unwrap_or_else(|| format!("s3://{}/{}", self.bucket, key)),
            e_tag: out.e_tag().map(str::to_string),
        })
    }
}

impl ObjectStore for S3Store {
    fn put_object(
        &self,
        key: &str,
        body: &mut dyn Read,
        part_size: u64,
    ) -> TransportResult<PutOutput> {
        let first = read_part(body, part_size)?;
        let next = if first.len() as u64 == part_size {
            read_part(body, part_size)?
        } else {
            Vec::new()
        };
        if next.is_empty() {
            return self.put_single(key, first);
        }

        let created = self
            .block_on(
                self.client
                    .create_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .send(),
            )
            .map_err(|e| sdk_error("CreateMultipartUpload", e))?;
        let upload_id = created
            .upload_id()
            .ok_or_else(|| TransportError::Service("CreateMultipartUpload returned no upload id".into()))?
            .to_string();

        match self.put_parts(key, &upload_id, first, next, body, part_size) {
            Ok(out) => Ok(out),
            Err(e) => {
                let abort = self.block_on(
                    self.client
                        .abort_multipart_upload()
                        .bucket(&self.bucket)
                        .key(key)
                        .upload_id(&upload_id)
                        .send(),
                );
                if let Err(abort_err) = abort {
                    tracing::warn!(
                        key,
                        upload_id = %upload_id,
                        "failed to abort multipart upload: {}",
                        DisplayErrorContext(&abort_err)
                    );
                }
                Err(e)
            }
        }
    }

    fn head_object(&self, key: &str) -> TransportResult<HeadOutput> {
        let out = self
            .block_on(
                self.client
                    .head_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .send(),
            )
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) {
                    TransportError::NotFound(key.to_string())
                } else {
                    sdk_error("HeadObject", e)
                }
            })?;
        Ok(HeadOutput {
            content_length: out.content_length().unwrap_or(0).max(0) as u64,
            e_tag: out.e_tag().map(str::to_string),
        })
    }

    fn list_objects_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> TransportResult<ListPage> {
        let out = self
            .block_on(
                self.client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix)
                    .set_continuation_token(continuation.map(str::to_string))
                    .send(),
            )
            .map_err(|e| sdk_error("ListObjectsV2", e))?;
        let objects = out
            .contents()
            .iter()
            .filter_map(|obj| {
                Some(ObjectEntry {
                    key: obj.key()?.to_string(),
                    e_tag: obj.e_tag().unwrap_or_default().to_string(),
                    size: obj.size().unwrap_or(0).max(0) as u64,
                })
            })
            .collect();
        let next_continuation = if out.is_truncated().unwrap_or(false) {
            out.next_continuation_token().map(str::to_string)
        } else {
            None
        };
        Ok(ListPage {
            objects,
            next_continuation,
        })
    }

    fn get_object_range(
        &self,
        key: &str,
        range: ByteRange,
    ) -> TransportResult<Box<dyn Read + Send>> {
        let header = range.header_value().ok_or_else(|| {
            TransportError::Service("zero-length range is not a valid S3 request".into())
        })?;
        tracing::debug!(key, range = %header, "ranged GET");
        let out = self
            .block_on(
                self.client
                    .get_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .range(header)
                    .send(),
            )
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    TransportError::NotFound(key.to_string())
                } else {
                    sdk_error("GetObject", e)
                }
            })?;
        let data = self
            .block_on(out.body.collect())
            .map_err(|e| TransportError::Service(format!("GetObject body: {}", e)))?;
        Ok(Box::new(Cursor::new(data.into_bytes())))
    }
}
