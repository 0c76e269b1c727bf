use super::Output;
use crate::decoder::Consumer;
use crate::types::{Flow, LogicalValue, Record, Type};
use std::io::{self, Write};

/// Emits the commands that rebuild the dump, in the Redis wire protocol.
/// Replaying the output into a server restores keys, values and expire times.
pub struct Protocol {
    out: Output,
}

impl Protocol {
    pub fn new(out: Box<dyn Write>) -> Protocol {
        Protocol {
            out: Output::new(out),
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.out.take_error()
    }

    fn emit(&mut self, args: &[&[u8]]) {
        self.out.write_str(&format!("*{}\r\n", args.len()));
        for arg in args {
            self.out.write_str(&format!("${}\r\n", arg.len()));
            self.out.write(arg);
            self.out.write_str("\r\n");
        }
    }
}

impl Consumer for Protocol {
    fn start_database(&mut self, db: u32) {
        let db = db.to_string();
        self.emit(&["SELECT".as_bytes(), db.as_bytes()]);
    }

    fn record(&mut self, record: &Record<'_>) -> Flow {
        let key = record.key;
        match (record.kind, record.value) {
            (_, LogicalValue::Scalar(value)) => {
                self.emit(&["SET".as_bytes(), key, value.as_slice()]);
            }
            (Type::Set, LogicalValue::Sequence(members)) => {
                for member in members {
                    self.emit(&["SADD".as_bytes(), key, member.as_slice()]);
                }
            }
            (_, LogicalValue::Sequence(values)) => {
                for value in values {
                    self.emit(&["RPUSH".as_bytes(), key, value.as_slice()]);
                }
            }
            (Type::SortedSet, LogicalValue::PairSequence(pairs)) => {
                for (member, score) in pairs {
                    let args = ["ZADD".as_bytes(), key, score.as_slice(), member.as_slice()];
                    self.emit(&args);
                }
            }
            (_, LogicalValue::PairSequence(pairs)) => {
                for (field, value) in pairs {
                    let args = ["HSET".as_bytes(), key, field.as_slice(), value.as_slice()];
                    self.emit(&args);
                }
            }
        }

        if let Some(expiry) = record.expiry {
            let expiry = expiry.to_string();
            self.emit(&["PEXPIREAT".as_bytes(), key, expiry.as_bytes()]);
        }
        self.out.flow()
    }

    fn end_rdb(&mut self) {
        self.out.flush();
    }
}
