use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::types::{RdbError, RdbResult};

/// Forward-only view over a container buffer. Every read is checked against the
/// end of the buffer and fails with a container error naming `context`.
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    context: &'static str,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8], context: &'static str) -> ByteCursor<'a> {
        ByteCursor {
            buf,
            pos: 0,
            context,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn peek_u8(&self) -> RdbResult<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.overrun(1))
    }

    pub fn read_bytes(&mut self, len: usize) -> RdbResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.overrun(len));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> RdbResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> RdbResult<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_i8(&mut self) -> RdbResult<i8> {
        self.read_u8().map(|b| b as i8)
    }

    pub fn read_u16_le(&mut self) -> RdbResult<u16> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    pub fn read_i16_le(&mut self) -> RdbResult<i16> {
        self.read_bytes(2).map(LittleEndian::read_i16)
    }

    pub fn read_i24_le(&mut self) -> RdbResult<i32> {
        self.read_bytes(3).map(LittleEndian::read_i24)
    }

    pub fn read_u32_le(&mut self) -> RdbResult<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    pub fn read_u32_be(&mut self) -> RdbResult<u32> {
        self.read_bytes(4).map(BigEndian::read_u32)
    }

    pub fn read_i32_le(&mut self) -> RdbResult<i32> {
        self.read_bytes(4).map(LittleEndian::read_i32)
    }

    pub fn read_i64_le(&mut self) -> RdbResult<i64> {
        self.read_bytes(8).map(LittleEndian::read_i64)
    }

    /// Builds a container error at the current position.
    pub fn error(&self, message: impl Into<String>) -> RdbError {
        RdbError::container(
            self.context,
            format!("{} (offset {})", message.into(), self.pos),
        )
    }

    fn overrun(&self, wanted: usize) -> RdbError {
        self.error(format!(
            "needs {} bytes but only {} remain",
            wanted,
            self.remaining()
        ))
    }
}
