use byteorder::{ByteOrder, LittleEndian};

use super::cursor::ByteCursor;
use super::utils::int_to_vec;
use crate::types::RdbResult;

/// Decodes an intset buffer: `<width u32><count u32><count * width bytes>`.
/// Elements are signed little endian and come back as decimal text in stored
/// order.
pub fn read_intset(buf: &[u8]) -> RdbResult<Vec<Vec<u8>>> {
    let mut reader = ByteCursor::new(buf, "read_intset");
    let width = reader.read_u32_le()?;
    let count = reader.read_u32_le()?;

    if !matches!(width, 2 | 4 | 8) {
        return Err(reader.error(format!("unsupported element width {}", width)));
    }

    let body_len = (count as usize)
        .checked_mul(width as usize)
        .ok_or_else(|| reader.error(format!("{} elements overflow the buffer", count)))?;
    let body = reader.read_bytes(body_len)?;

    Ok(body
        .chunks_exact(width as usize)
        .map(|chunk| {
            let number = match width {
                2 => i64::from(LittleEndian::read_i16(chunk)),
                4 => i64::from(LittleEndian::read_i32(chunk)),
                _ => LittleEndian::read_i64(chunk),
            };
            int_to_vec(number)
        })
        .collect())
}
