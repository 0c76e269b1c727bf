//! Read adapter that checksums every byte it hands out.

use crc::{Crc, Digest, CRC_64_REDIS};
use std::io::{self, Read};

pub(crate) static RDB_CRC: Crc<u64> = Crc::<u64>::new(&CRC_64_REDIS);

/// Wraps the input stream and keeps a running CRC-64 over exactly the bytes
/// consumed, in read order, along with the number of bytes consumed.
pub(crate) struct ChecksumReader<R: Read> {
    inner: R,
    digest: Digest<'static, u64>,
    position: u64,
}

impl<R: Read> ChecksumReader<R> {
    pub fn new(inner: R) -> ChecksumReader<R> {
        ChecksumReader {
            inner,
            digest: RDB_CRC.digest(),
            position: 0,
        }
    }

    /// Digest of everything read so far.
    pub fn checksum(&self) -> u64 {
        self.digest.clone().finalize()
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the 8 byte little-endian trailer without feeding it to the digest.
    pub fn read_trailer(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        self.position += buf.len() as u64;
        Ok(u64::from_le_bytes(buf))
    }
}

impl<R: Read> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.digest.update(&buf[..n]);
        self.position += n as u64;
        Ok(n)
    }
}
