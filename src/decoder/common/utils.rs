use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{self, Read};

use crate::constants::{constant, encoding, version};

use crate::types::{RdbError, RdbOk, RdbResult};

/// Reads a length prefix. The flag is `true` when the value is an inline
/// encoding tag rather than a length.
pub fn read_length_with_encoding<R: Read>(input: &mut R) -> RdbResult<(u32, bool)> {
    let length;
    let mut is_encoded = false;

    let enc_type = input.read_u8()?;

    match (enc_type & 0xC0) >> 6 {
        constant::RDB_ENCVAL => {
            is_encoded = true;
            length = (enc_type & 0x3F) as u32;
        }
        constant::RDB_6BITLEN => {
            length = (enc_type & 0x3F) as u32;
        }
        constant::RDB_14BITLEN => {
            let next_byte = input.read_u8()?;
            length = (((enc_type & 0x3F) as u32) << 8) | next_byte as u32;
        }
        constant::RDB_32BITLEN => {
            length = input.read_u32::<BigEndian>()?;
        }
        _ => unreachable!(),
    }

    Ok((length, is_encoded))
}

/// Reads a plain length. An inline encoding tag in this position is an error.
pub fn read_length<R: Read>(input: &mut R) -> RdbResult<u32> {
    match read_length_with_encoding(input)? {
        (length, false) => Ok(length),
        (tag, true) => Err(RdbError::BadLengthEncoding {
            context: "read_length",
            value: tag,
        }),
    }
}

/// Reads the magic string and the version and returns the version.
pub fn verify_header<R: Read>(input: &mut R) -> RdbResult<u32> {
    verify_magic(input)?;
    verify_version(input)
}

pub fn verify_magic<R: Read>(input: &mut R) -> RdbOk {
    let mut magic = [0; 5];
    input.read_exact(&mut magic)?;

    if magic == constant::RDB_MAGIC.as_bytes() {
        Ok(())
    } else {
        Err(RdbError::MalformedHeader("invalid magic string"))
    }
}

pub fn verify_version<R: Read>(input: &mut R) -> RdbResult<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;

    if !buf.iter().all(u8::is_ascii_digit) {
        return Err(RdbError::MalformedHeader("invalid version number"));
    }

    let version = buf
        .iter()
        .fold(0u32, |acc, &digit| acc * 10 + (digit - b'0') as u32);

    if !(version::SUPPORTED_MINIMUM..=version::SUPPORTED_MAXIMUM).contains(&version) {
        return Err(RdbError::UnsupportedVersion(version));
    }

    Ok(version)
}

/// Reads a string object: raw bytes, an integer rendered as decimal text, or an
/// LZF compressed string.
pub fn read_blob<R: Read>(input: &mut R) -> RdbResult<Vec<u8>> {
    let (length, is_encoded) = read_length_with_encoding(input)?;

    if is_encoded {
        let result = match length {
            encoding::INT8 => int_to_vec(i64::from(input.read_i8()?)),
            encoding::INT16 => int_to_vec(i64::from(input.read_i16::<LittleEndian>()?)),
            encoding::INT32 => int_to_vec(i64::from(input.read_i32::<LittleEndian>()?)),
            encoding::LZF => read_lzf_blob(input)?,
            _ => {
                return Err(RdbError::BadLengthEncoding {
                    context: "read_blob",
                    value: length,
                })
            }
        };

        Ok(result)
    } else {
        read_exact(input, length as usize)
    }
}

fn read_lzf_blob<R: Read>(input: &mut R) -> RdbResult<Vec<u8>> {
    let compressed_length = read_length(input)?;
    let real_length = read_length(input)?;
    let data = read_exact(input, compressed_length as usize)?;
    decompress(&data, real_length as usize)
}

/// Inflates an LZF block that must expand to exactly `expected_len` bytes.
pub fn decompress(data: &[u8], expected_len: usize) -> RdbResult<Vec<u8>> {
    if expected_len == 0 {
        return if data.is_empty() {
            Ok(Vec::new())
        } else {
            Err(RdbError::BadCompressedPayload(format!(
                "{} compressed bytes for an empty string",
                data.len()
            )))
        };
    }

    let raw = lzf::decompress(data, expected_len)
        .map_err(|e| RdbError::BadCompressedPayload(format!("{:?}", e)))?;

    if raw.len() != expected_len {
        return Err(RdbError::BadCompressedPayload(format!(
            "expected {} bytes, got {}",
            expected_len,
            raw.len()
        )));
    }

    Ok(raw)
}

pub fn int_to_vec(number: i64) -> Vec<u8> {
    number.to_string().into_bytes()
}

pub fn read_exact<T: Read>(reader: &mut T, len: usize) -> RdbResult<Vec<u8>> {
    let mut buf = Vec::new();
    let read = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if read != len {
        return Err(RdbError::TruncatedStream);
    }

    Ok(buf)
}

pub fn read_sequence<R: Read, T, F>(input: &mut R, mut transform: F) -> RdbResult<Vec<T>>
where
    F: FnMut(&mut R) -> RdbResult<T>,
{
    let mut len = read_length(input)?;
    let mut values = Vec::with_capacity(len.min(1024) as usize);

    while len > 0 {
        values.push(transform(input)?);
        len -= 1;
    }

    Ok(values)
}

pub fn skip<R: Read>(input: &mut R, skip_bytes: u64) -> RdbOk {
    let skipped = io::copy(&mut input.by_ref().take(skip_bytes), &mut io::sink())?;
    if skipped != skip_bytes {
        return Err(RdbError::TruncatedStream);
    }
    Ok(())
}

/// Skips a string object without decoding or inflating it.
pub fn skip_blob<R: Read>(input: &mut R) -> RdbOk {
    let (len, is_encoded) = read_length_with_encoding(input)?;

    let skip_bytes = if is_encoded {
        match len {
            encoding::INT8 => 1,
            encoding::INT16 => 2,
            encoding::INT32 => 4,
            encoding::LZF => {
                let compressed_length = read_length(input)?;
                let _real_length = read_length(input)?;
                compressed_length
            }
            _ => {
                return Err(RdbError::BadLengthEncoding {
                    context: "skip_blob",
                    value: len,
                });
            }
        }
    } else {
        len
    };

    skip(input, skip_bytes as u64)
}
