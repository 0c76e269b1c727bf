use super::Output;
use crate::decoder::Consumer;
use crate::types::{Flow, LogicalValue, Record};
use std::io::{self, Write};

/// Line oriented dump: one line per string, list element, set member, hash
/// field or sorted set member. Keys and values are written as raw bytes.
pub struct Plain {
    out: Output,
}

impl Plain {
    pub fn new(out: Box<dyn Write>) -> Plain {
        Plain {
            out: Output::new(out),
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.out.take_error()
    }

    fn write_line(&mut self, key: &[u8], subkey: Option<&[u8]>, value: &[u8]) {
        self.out.write(key);
        if let Some(subkey) = subkey {
            self.out.write_str("[");
            self.out.write(subkey);
            self.out.write_str("]");
        }
        self.out.write_str(" -> ");
        self.out.write(value);
        self.out.write_str("\n");
    }
}

impl Consumer for Plain {
    fn start_rdb(&mut self, version: u32) {
        self.out
            .write_str(&format!("Start of RDB, version {}\n", version));
    }

    fn start_database(&mut self, db: u32) {
        self.out.write_str(&format!("SELECTDB: {}\n", db));
    }

    fn record(&mut self, record: &Record<'_>) -> Flow {
        let key = record.key;
        match record.value {
            LogicalValue::Scalar(value) => self.write_line(key, None, value),
            LogicalValue::Sequence(values) => {
                for (index, value) in values.iter().enumerate() {
                    let index = index.to_string();
                    self.write_line(key, Some(index.as_bytes()), value);
                }
            }
            LogicalValue::PairSequence(pairs) => {
                for (field, value) in pairs {
                    self.write_line(key, Some(field.as_slice()), value);
                }
            }
        }

        if let Some(expiry) = record.expiry {
            self.out.write(key);
            self.out.write_str(&format!(" expires at {}\n", expiry));
        }
        self.out.flow()
    }

    fn end_database(&mut self, db: u32) {
        self.out.write_str(&format!("END_DB: {}\n", db));
    }

    fn end_rdb(&mut self) {
        self.out.write_str("End of RDB\n");
        self.out.flush();
    }
}
