//! One streaming blob upload.
//!
//! `begin` spawns a worker thread that runs the store's upload, reading from
//! one end of a zero-capacity pipe. The caller writes into a [`BlobUpload`],
//! which feeds the pipe and the ETag calculator in lockstep. `end` closes the
//! pipe, waits for the worker, and verifies the result against a HEAD.

use crate::blob_id::BlobId;
use crate::checksum::ETagCalculator;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::metadata::fetch_metadata;
use crate::path_scheme::blob_path;
use crate::pipe::{pipe, PipeWriter};
use crate::tee::TeeWriter;
use crate::transport::{ObjectStore, PutOutput, TransportResult};
use crate::types::UploadedBlob;
use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::check_part_size;
use super::verify::verify_upload;

/// Pipe end that abandons the upload if dropped before a clean close.
struct UploadPipe {
    writer: PipeWriter,
    path: String,
    closed: bool,
}

impl UploadPipe {
    fn close(&mut self) {
        self.closed = true;
        self.writer.close();
    }
}

impl Write for UploadPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for UploadPipe {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(path = %self.path, "blob upload dropped before end; abandoning");
            // The worker sees a failed body, not a short one, and exits on its own.
            self.writer.close_with_error(&io::Error::new(
                io::ErrorKind::Other,
                "upload abandoned",
            ));
        }
    }
}

/// Write sink for one blob. Call [`end`](Self::end) to finish and verify;
/// dropping it instead abandons the upload.
pub struct BlobUpload {
    sink: TeeWriter<UploadPipe, ETagCalculator>,
    result: Receiver<TransportResult<PutOutput>>,
    worker: JoinHandle<()>,
    path: String,
    store: Arc<dyn ObjectStore>,
}

/// Start uploading the blob `blob_id` under `config.root_path`.
pub(crate) fn begin(
    store: Arc<dyn ObjectStore>,
    config: &RemoteConfig,
    blob_id: &[u8],
) -> Result<BlobUpload> {
    let id = BlobId::from_slice(blob_id)?;
    check_part_size(config.part_size)?;
    let part_size = config.part_size;
    let path = blob_path(&config.root_path, &id);
    tracing::info!(path = %path, "beginning blob upload");

    let calc = ETagCalculator::new(part_size);
    let (mut reader, writer) = pipe();
    // Single slot so the worker can always deliver its result and exit.
    let (tx, rx) = mpsc::sync_channel(1);
    let worker_store = Arc::clone(&store);
    let worker_path = path.clone();
    let worker = thread::Builder::new()
        .name(format!("bvs-upload-{}", &path[path.len() - 8..]))
        .spawn(move || {
            let result = worker_store.put_object(&worker_path, &mut reader, part_size);
            if let Err(e) = &result {
                tracing::warn!(path = %worker_path, "store upload failed: {}", e);
                reader.close_with_error(&io::Error::new(io::ErrorKind::Other, e.to_string()));
            }
            drop(reader);
            let _ = tx.send(result);
        })?;

    let pipe = UploadPipe {
        writer,
        path: path.clone(),
        closed: false,
    };
    Ok(BlobUpload {
        sink: TeeWriter::new(pipe, calc),
        result: rx,
        worker,
        path,
        store,
    })
}

impl BlobUpload {
    /// Remote key this blob is being written to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Close the stream, wait for the store, and verify size and ETag.
    pub fn end(self) -> Result<UploadedBlob> {
        let BlobUpload {
            sink,
            result,
            worker,
            path,
            store,
        } = self;
        let (mut pipe, calc) = sink.into_inner();
        pipe.close();

        let put = result.recv();
        if worker.join().is_err() {
            return Err(Error::WorkerPanicked);
        }
        let output = put.map_err(|_| Error::WorkerPanicked)??;
        tracing::info!(path = %path, location = %output.location, "upload output");

        let local_size = calc.bytes_written();
        let etag = calc.finish();
        tracing::info!(path = %path, "expecting etag {}", etag);

        let remote = fetch_metadata(store.as_ref(), &path)?;
        tracing::info!(path = %path, "real etag was {}", remote.checksum);
        verify_upload(&path, &etag, local_size, &remote)?;

        Ok(UploadedBlob {
            path,
            checksum: etag.into_string(),
            size: remote.size,
        })
    }
}

impl Write for BlobUpload {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
