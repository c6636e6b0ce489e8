//! Synchronous in-memory pipe between the producer and the transport worker.
//!
//! Built on a zero-capacity `sync_channel`: a write returns only once the
//! reader has taken the chunk, so at most one chunk of `MAX_CHUNK` bytes is
//! in flight regardless of how large the caller's buffers are. Either side can close with an error; the other side sees that
//! error instead of EOF or a bare broken pipe.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};

const MAX_CHUNK: usize = 64 * 1024;

/// Error recorded by one side when it closes, replayed to the other side.
#[derive(Clone, Default)]
struct CloseError(Arc<Mutex<Option<(io::ErrorKind, String)>>>);

impl CloseError {
    fn set(&self, err: &io::Error) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some((err.kind(), err.to_string()));
        }
    }

    fn get(&self) -> Option<io::Error> {
        let slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .map(|(kind, msg)| io::Error::new(*kind, msg.clone()))
    }
}

/// Creates a connected reader/writer pair.
pub fn pipe() -> (PipeReader, PipeWriter) {
    let (tx, rx) = mpsc::sync_channel(0);
    let reader_err = CloseError::default();
    let writer_err = CloseError::default();
    (
        PipeReader {
            rx: Some(rx),
            buf: Vec::new(),
            pos: 0,
            reader_err: reader_err.clone(),
            writer_err: writer_err.clone(),
        },
        PipeWriter {
            tx: Some(tx),
            reader_err,
            writer_err,
        },
    )
}

pub struct PipeReader {
    rx: Option<Receiver<Vec<u8>>>,
    buf: Vec<u8>,
    pos: usize,
    reader_err: CloseError,
    writer_err: CloseError,
}

impl PipeReader {
    /// Close the read side. Pending and future writes fail with `err`.
    pub fn close_with_error(&mut self, err: &io::Error) {
        self.reader_err.set(err);
        self.rx.take();
    }
}

impl Read for PipeReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.pos < self.buf.len() {
                let n = out.len().min(self.buf.len() - self.pos);
                out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            let rx = match &self.rx {
                Some(rx) => rx,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "read on closed pipe",
                    ))
                }
            };
            match rx.recv() {
                Ok(chunk) => {
                    self.buf = chunk;
                    self.pos = 0;
                }
                // Writer gone: EOF, unless it closed with an error.
                Err(_) => {
                    return match self.writer_err.get() {
                        Some(e) => Err(e),
                        None => Ok(0),
                    };
                }
            }
        }
    }
}

pub struct PipeWriter {
    tx: Option<SyncSender<Vec<u8>>>,
    reader_err: CloseError,
    writer_err: CloseError,
}

impl PipeWriter {
    /// Signal EOF to the reader.
    pub fn close(&mut self) {
        self.tx.take();
    }

    /// Close the write side; the reader gets `err` instead of EOF.
    pub fn close_with_error(&mut self, err: &io::Error) {
        self.writer_err.set(err);
        self.tx.take();
    }

    fn broken(&self) -> io::Error {
        self.reader_err.get().unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader closed")
        })
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let tx = match &self.tx {
            Some(tx) => tx,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "write on closed pipe",
                ))
            }
        };
        let n = buf.len().min(MAX_CHUNK);
        match tx.send(buf[..n].to_vec()) {
            Ok(()) => Ok(n),
            Err(_) => Err(self.broken()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
