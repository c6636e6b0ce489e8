//! Streaming replica of the S3 ETag algorithm.
//!
//! S3 reports `hex(md5(body))` for objects stored in one part, and
//! `hex(md5(md5(part1) || ... || md5(partN)))-N` for multipart objects.
//! The calculator splits the stream at `part_size` boundaries and produces the
//! same string the store will report, provided the store used the same part size.

use md5::{Digest, Md5};
use std::fmt;
use std::io;

/// Part size for uploads and local ETag calculation: 16 MiB.
///
/// S3 recomputes the ETag with 16 MiB parts when it repacks an object on a
/// transition to Glacier Deep Archive. Uploading with any other part size
/// (such as the SDK default of 5 MiB) makes the ETag change after the
/// transition and verification against the listing fails forever.
pub const DEFAULT_PART_SIZE: u64 = 1 << 24;

/// ETag string in the store's native format, without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeChecksum(String);

impl CompositeChecksum {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of parts encoded in the suffix, or 1 for a plain digest.
    pub fn part_count(&self) -> usize {
        match self.0.split_once('-') {
            Some((_, n)) => n.parse().unwrap_or(1),
            None => 1,
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompositeChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CompositeChecksum {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Accumulates per-part MD5 digests over a byte stream.
///
/// Feed bytes through [`io::Write`], then call [`finish`](Self::finish) once.
/// Only the running MD5 state of the current part is kept, not the part itself.
pub struct ETagCalculator {
    part_size: u64,
    current: Md5,
    current_len: u64,
    parts: Vec<[u8; 16]>,
    total: u64,
}

impl ETagCalculator {
    /// # Panics
    /// If `part_size` is zero.
    pub fn new(part_size: u64) -> Self {
        assert!(part_size > 0, "part size must be non-zero");
        Self {
            part_size,
            current: Md5::new(),
            current_len: 0,
            parts: Vec::new(),
            total: 0,
        }
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.total
    }

    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    fn update(&mut self, mut data: &[u8]) {
        self.total += data.len() as u64;
        while !data.is_empty() {
            let room = self.part_size - self.current_len;
            let take = (data.len() as u64).min(room) as usize;
            self.current.update(&data[..take]);
            self.current_len += take as u64;
            data = &data[take..];
            if self.current_len == self.part_size {
                self.parts.push(self.current.finalize_reset().into());
                self.current_len = 0;
            }
        }
    }

    /// Close the stream and produce the ETag.
    pub fn finish(mut self) -> CompositeChecksum {
        if self.parts.is_empty() {
            // Shorter than one part, including the empty stream.
            return CompositeChecksum(hex::encode(self.current.finalize()));
        }
        if self.parts.len() == 1 && self.current_len == 0 {
            return CompositeChecksum(hex::encode(self.parts[0]));
        }
        if self.current_len > 0 {
            self.parts.push(self.current.finalize_reset().into());
        }
        let mut outer = Md5::new();
        for digest in &self.parts {
            outer.update(digest);
        }
        CompositeChecksum(format!(
            "{}-{}",
            hex::encode(outer.finalize()),
            self.parts.len()
        ))
    }
}

impl io::Write for ETagCalculator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// ETag of an in-memory buffer.
pub fn etag_of(part_size: u64, data: &[u8]) -> CompositeChecksum {
    let mut calc = ETagCalculator::new(part_size);
    calc.update(data);
    calc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PART: u64 = 8;

    fn body(len: usize) -> Vec<u8> {
        (0u8..251).cycle().take(len).collect()
    }

    /// Multipart ETag computed the slow way, one part slice at a time.
    fn multipart_reference(data: &[u8]) -> String {
        let mut concat = Vec::new();
        let mut n = 0;
        for part in data.chunks(PART as usize) {
            concat.extend_from_slice(&Md5::digest(part));
            n += 1;
        }
        format!("{}-{}", hex::encode(Md5::digest(&concat)), n)
    }

    #[test]
    fn empty_stream_has_md5_of_nothing() {
        let etag = etag_of(PART, b"");
        assert_eq!(etag.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(etag.part_count(), 1);
    }

    #[test]
    fn one_byte() {
        assert_eq!(etag_of(PART, b"a").as_str(), "0cc175b9c0f1b6a831c399e269772661");
    }

    #[test]
    fn below_one_part_is_plain_md5() {
        let data = body(PART as usize - 1);
        assert_eq!(
            etag_of(PART, &data).as_str(),
            hex::encode(Md5::digest(&data))
        );
    }

    #[test]
    fn exactly_one_part_is_plain_md5() {
        let data = body(PART as usize);
        let etag = etag_of(PART, &data);
        assert_eq!(etag.as_str(), hex::encode(Md5::digest(&data)));
        assert!(!etag.as_str().contains('-'));
    }

    #[test]
    fn one_byte_over_a_part_is_two_parts() {
        let data = body(PART as usize + 1);
        let etag = etag_of(PART, &data);
        assert_eq!(etag.as_str(), multipart_reference(&data));
        assert!(etag.as_str().ends_with("-2"));
    }

    #[test]
    fn exact_multiple_of_part_size() {
        let data = body(PART as usize * 4);
        let etag = etag_of(PART, &data);
        assert_eq!(etag.as_str(), multipart_reference(&data));
        assert_eq!(etag.part_count(), 4);
    }

    #[test]
    fn write_boundaries_do_not_matter() {
        let data = body(61);
        let mut calc = ETagCalculator::new(PART);
        for piece in data.chunks(3) {
            calc.write_all(piece).unwrap();
        }
        assert_eq!(calc.bytes_written(), 61);
        assert_eq!(calc.finish(), etag_of(PART, &data));
    }

    #[test]
    fn multipart_format_is_hex_dash_count() {
        let etag = etag_of(PART, &body(20));
        let (digest, count) = etag.as_str().split_once('-').unwrap();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(count, "3");
    }
}
