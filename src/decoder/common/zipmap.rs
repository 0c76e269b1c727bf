//! Zipmap decoding, the pre-ziplist compact hash encoding.
//!
//! `<zmlen><len>key<len><free>value<slack>...<0xFF>`

use log::debug;

use super::cursor::ByteCursor;
use crate::constants::zipmap;
use crate::types::RdbResult;

fn read_zipmap_len(reader: &mut ByteCursor<'_>) -> RdbResult<usize> {
    match reader.read_u8()? {
        zipmap::BIGLEN => Ok(reader.read_u32_le()? as usize),
        zipmap::END => Err(reader.error("unexpected end marker")),
        len => Ok(len as usize),
    }
}

pub fn read_zipmap(buf: &[u8]) -> RdbResult<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut reader = ByteCursor::new(buf, "read_zipmap");
    let hint = reader.read_u8()?;

    let mut pairs = Vec::new();
    while reader.peek_u8()? != zipmap::END {
        let key_len = read_zipmap_len(&mut reader)?;
        let key = reader.read_bytes(key_len)?;

        let value_len = read_zipmap_len(&mut reader)?;
        let free = reader.read_u8()? as usize;
        let value = reader.read_bytes(value_len)?;
        reader.skip(free)?;

        pairs.push((key.to_vec(), value.to_vec()));
    }

    if (hint as usize) < zipmap::BIGLEN as usize && hint as usize != pairs.len() {
        debug!(
            "zipmap length hint {} disagrees with {} scanned pairs",
            hint,
            pairs.len()
        );
    }

    Ok(pairs)
}
