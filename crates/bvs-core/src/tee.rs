//! Fan-out writer: one sink that duplicates every byte into two others.

use std::io::{self, Write};

/// Writes each buffer fully to `first`, then to `second`.
///
/// `second` only ever sees bytes that `first` accepted, in the same order.
pub struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "nope"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn duplicates_into_both() {
        let mut tee = TeeWriter::new(Vec::new(), Vec::new());
        tee.write_all(b"abc").unwrap();
        tee.write_all(b"def").unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a, b"abcdef");
        assert_eq!(b, b"abcdef");
    }

    #[test]
    fn second_skipped_when_first_fails() {
        let mut tee = TeeWriter::new(Failing, Vec::new());
        assert!(tee.write(b"abc").is_err());
        let (_, b) = tee.into_inner();
        assert!(b.is_empty());
    }
}
