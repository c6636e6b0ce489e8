//! SHA-256 over a byte stream, read in bounded chunks.

use sha2::{Digest, Sha256};
use std::io::{self, Read};

const BUF_SIZE: usize = 64 * 1024;

/// SHA-256 of everything `reader` yields.
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<[u8; 32]> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_content() {
        let digest = sha256_reader(&b"hello\n"[..]).unwrap();
        assert_eq!(
            hex::encode(digest),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn spans_several_buffers() {
        let data = vec![0x5au8; BUF_SIZE * 2 + 17];
        let digest = sha256_reader(&data[..]).unwrap();
        assert_eq!(digest, <[u8; 32]>::from(Sha256::digest(&data)));
    }
}
