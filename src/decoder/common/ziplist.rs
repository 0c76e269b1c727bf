//! Ziplist decoding.
//!
//! Layout: `<zlbytes u32><zltail u32><zllen u16><entry>...<0xFF>`, all little
//! endian. Every entry starts with the length of the previous entry (only
//! needed for backward traversal, skipped here) followed by an encoding byte
//! that selects a string length or one of the integer widths.

use super::cursor::ByteCursor;
use super::utils::int_to_vec;
use crate::constants::ziplist;
use crate::types::{RdbError, RdbResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ZiplistEntry<'a> {
    String(&'a [u8]),
    Number(i64),
}

impl ZiplistEntry<'_> {
    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            ZiplistEntry::String(val) => val.to_vec(),
            ZiplistEntry::Number(val) => int_to_vec(*val),
        }
    }
}

/// Checks the header against the buffer and returns the entry count it claims.
fn read_ziplist_metadata(reader: &mut ByteCursor<'_>, len: usize) -> RdbResult<u16> {
    let zlbytes = reader.read_u32_le()?;
    let zltail = reader.read_u32_le()?;
    let zllen = reader.read_u16_le()?;

    if zlbytes as usize != len {
        return Err(reader.error(format!(
            "header claims {} bytes, buffer holds {}",
            zlbytes, len
        )));
    }
    if zltail as usize >= len {
        return Err(reader.error(format!("tail offset {} outside the buffer", zltail)));
    }

    Ok(zllen)
}

fn read_ziplist_entry<'a>(reader: &mut ByteCursor<'a>) -> RdbResult<ZiplistEntry<'a>> {
    // 1. 1 or 5 bytes length of previous entry
    if reader.read_u8()? == ziplist::BIGLEN {
        reader.skip(4)?;
    }

    // 2. Read flag or number value
    let flag = reader.read_u8()?;

    let length = match flag >> 6 {
        0 => (flag & 0x3F) as usize,
        1 => (((flag & 0x3F) as usize) << 8) | reader.read_u8()? as usize,
        2 => reader.read_u32_be()? as usize,
        _ => {
            let number = match flag {
                ziplist::ENC_INT16 => reader.read_i16_le()? as i64,
                ziplist::ENC_INT32 => reader.read_i32_le()? as i64,
                ziplist::ENC_INT64 => reader.read_i64_le()?,
                ziplist::ENC_INT24 => reader.read_i24_le()? as i64,
                ziplist::ENC_INT8 => reader.read_i8()? as i64,
                ziplist::ENC_IMM_MIN..=ziplist::ENC_IMM_MAX => (flag & 0x0F) as i64 - 1,
                _ => {
                    return Err(reader.error(format!("unknown entry encoding {:#04x}", flag)));
                }
            };
            return Ok(ZiplistEntry::Number(number));
        }
    };

    // 3. Read value
    reader.read_bytes(length).map(ZiplistEntry::String)
}

/// Walks a ziplist buffer front to back and returns its entries.
pub fn read_ziplist_entries<'a>(
    buf: &'a [u8],
    context: &'static str,
) -> RdbResult<Vec<ZiplistEntry<'a>>> {
    let mut reader = ByteCursor::new(buf, context);
    let zllen = read_ziplist_metadata(&mut reader, buf.len())?;

    let mut entries = Vec::with_capacity(zllen as usize);
    while reader.peek_u8()? != ziplist::END {
        entries.push(read_ziplist_entry(&mut reader)?);
    }
    reader.read_u8()?;

    if reader.remaining() != 0 {
        return Err(reader.error("bytes after end marker"));
    }

    if zllen != ziplist::UNKNOWN_LEN && zllen as usize != entries.len() {
        return Err(reader.error(format!(
            "header counts {} entries, found {}",
            zllen,
            entries.len()
        )));
    }

    Ok(entries)
}

/// Flat mode: every entry is one element.
pub fn read_ziplist_flat(buf: &[u8], context: &'static str) -> RdbResult<Vec<Vec<u8>>> {
    Ok(read_ziplist_entries(buf, context)?
        .iter()
        .map(ZiplistEntry::to_vec)
        .collect())
}

/// Paired mode: two consecutive entries make one element.
pub fn read_ziplist_pairs<'a>(
    buf: &'a [u8],
    context: &'static str,
) -> RdbResult<Vec<(ZiplistEntry<'a>, ZiplistEntry<'a>)>> {
    let entries = read_ziplist_entries(buf, context)?;
    if entries.len() % 2 != 0 {
        return Err(RdbError::container(
            context,
            format!("odd number of entries ({}) for a paired ziplist", entries.len()),
        ));
    }

    let mut pairs = Vec::with_capacity(entries.len() / 2);
    let mut iter = entries.into_iter();
    while let (Some(first), Some(second)) = (iter.next(), iter.next()) {
        pairs.push((first, second));
    }
    Ok(pairs)
}
