//! Builders for synthetic dumps.
#![allow(dead_code)]

use crc::{Crc, CRC_64_REDIS};

const CRC: Crc<u64> = Crc::<u64>::new(&CRC_64_REDIS);

pub fn length(len: usize) -> Vec<u8> {
    if len < 1 << 6 {
        vec![len as u8]
    } else if len < 1 << 14 {
        vec![0x40 | (len >> 8) as u8, len as u8]
    } else {
        let mut buf = vec![0x80];
        buf.extend_from_slice(&(len as u32).to_be_bytes());
        buf
    }
}

pub fn blob(data: &[u8]) -> Vec<u8> {
    let mut buf = length(data.len());
    buf.extend_from_slice(data);
    buf
}

pub fn int8_blob(value: i8) -> Vec<u8> {
    vec![0xC0, value as u8]
}

pub fn lzf_blob(data: &[u8]) -> Vec<u8> {
    let compressed = lzf::compress(data).expect("test data must be compressible");
    let mut buf = vec![0xC3];
    buf.extend(length(compressed.len()));
    buf.extend(length(data.len()));
    buf.extend(compressed);
    buf
}

pub fn blobs(items: &[&[u8]]) -> Vec<u8> {
    let mut buf = length(items.len());
    for item in items {
        buf.extend(blob(item));
    }
    buf
}

pub enum ZlEntry<'a> {
    Str(&'a [u8]),
    Int(i64),
}

pub fn ziplist(entries: &[ZlEntry<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut prev_len = 0usize;
    let mut tail = 10usize;
    for entry in entries {
        tail = 10 + body.len();
        let mut encoded = if prev_len < 254 {
            vec![prev_len as u8]
        } else {
            let mut e = vec![254];
            e.extend_from_slice(&(prev_len as u32).to_le_bytes());
            e
        };
        match entry {
            ZlEntry::Str(data) => {
                assert!(data.len() < 64);
                encoded.push(data.len() as u8);
                encoded.extend_from_slice(data);
            }
            ZlEntry::Int(n @ 0..=12) => encoded.push(0xF1 + *n as u8),
            ZlEntry::Int(n) => {
                encoded.push(0xE0);
                encoded.extend_from_slice(&n.to_le_bytes());
            }
        }
        prev_len = encoded.len();
        body.extend(encoded);
    }

    let total = 10 + body.len() + 1;
    let mut buf = Vec::new();
    buf.extend_from_slice(&(total as u32).to_le_bytes());
    buf.extend_from_slice(&(tail as u32).to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    buf.extend(body);
    buf.push(0xFF);
    buf
}

pub fn intset(width: u32, values: &[i64]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes()[..width as usize]);
    }
    buf
}

pub fn zipmap(pairs: &[(&[u8], &[u8])]) -> Vec<u8> {
    let mut buf = vec![pairs.len() as u8];
    for (key, value) in pairs {
        buf.push(key.len() as u8);
        buf.extend_from_slice(key);
        buf.push(value.len() as u8);
        buf.push(0);
        buf.extend_from_slice(value);
    }
    buf.push(0xFF);
    buf
}

/// Assembles header, records, end marker and, from version 5 on, the checksum.
pub struct DumpBuilder {
    version: u32,
    body: Vec<u8>,
}

impl DumpBuilder {
    pub fn new(version: u32) -> DumpBuilder {
        DumpBuilder {
            version,
            body: Vec::new(),
        }
    }

    pub fn select_db(mut self, db: u32) -> DumpBuilder {
        self.body.push(0xFE);
        self.body.extend(length(db as usize));
        self
    }

    pub fn expire_secs(mut self, secs: u32) -> DumpBuilder {
        self.body.push(0xFD);
        self.body.extend_from_slice(&secs.to_le_bytes());
        self
    }

    pub fn expire_ms(mut self, ms: u64) -> DumpBuilder {
        self.body.push(0xFC);
        self.body.extend_from_slice(&ms.to_le_bytes());
        self
    }

    /// A record with an already encoded value.
    pub fn entry(mut self, tag: u8, key: &[u8], value: &[u8]) -> DumpBuilder {
        self.body.push(tag);
        self.body.extend(blob(key));
        self.body.extend_from_slice(value);
        self
    }

    pub fn string(self, key: &[u8], value: &[u8]) -> DumpBuilder {
        self.entry(0, key, &blob(value))
    }

    pub fn raw(mut self, bytes: &[u8]) -> DumpBuilder {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buf = format!("REDIS{:04}", self.version).into_bytes();
        buf.extend(self.body);
        buf.push(0xFF);
        if self.version >= 5 {
            let checksum = CRC.checksum(&buf);
            buf.extend_from_slice(&checksum.to_le_bytes());
        }
        buf
    }
}
