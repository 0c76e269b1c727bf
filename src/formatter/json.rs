use super::Output;
use crate::decoder::Consumer;
use crate::types::{Flow, LogicalValue, Record};
use rustc_serialize::json;
use std::io::{self, Write};
use std::str;

/// Writes the dump as a JSON array holding one object per database.
///
/// Strings map to strings, lists and sets to arrays, hashes to objects and
/// sorted sets to objects from member to score.
pub struct JSON {
    out: Output,
    is_first_db: bool,
    in_database: bool,
    is_first_key_in_db: bool,
}

impl JSON {
    pub fn new(out: Box<dyn Write>) -> JSON {
        JSON {
            out: Output::new(out),
            is_first_db: true,
            in_database: false,
            is_first_key_in_db: true,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.out.take_error()
    }
}

fn escape_bytes(value: &[u8]) -> String {
    let s: String = value
        .iter()
        .map(|&b| match b {
            b'"' => "\\\"".to_string(),
            b'\\' => "\\\\".to_string(),
            32..=126 => (b as char).to_string(),
            _ => format!("\\u{:04x}", b),
        })
        .collect();
    format!("\"{}\"", s)
}

fn encode_to_ascii(value: &[u8]) -> String {
    match str::from_utf8(value) {
        Ok(s) => json::encode(&s).unwrap_or_else(|_| escape_bytes(value)),
        Err(_) => escape_bytes(value),
    }
}

impl JSON {
    fn open_database(&mut self) {
        if !self.is_first_db {
            self.out.write_str(",");
        }

        self.out.write_str("{");
        self.is_first_db = false;
        self.in_database = true;
        self.is_first_key_in_db = true;
    }

    fn start_key(&mut self, key: &[u8]) {
        if !self.is_first_key_in_db {
            self.out.write_str(",");
        }
        self.is_first_key_in_db = false;

        self.write_value(key);
        self.out.write_str(":");
    }

    fn write_value(&mut self, value: &[u8]) {
        let encoded = encode_to_ascii(value);
        self.out.write_str(&encoded);
    }

    fn write_array(&mut self, values: &[Vec<u8>]) {
        self.out.write_str("[");
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.out.write_str(",");
            }
            self.write_value(value);
        }
        self.out.write_str("]");
    }

    fn write_object(&mut self, pairs: &[(Vec<u8>, Vec<u8>)]) {
        self.out.write_str("{");
        for (index, (field, value)) in pairs.iter().enumerate() {
            if index > 0 {
                self.out.write_str(",");
            }
            self.write_value(field);
            self.out.write_str(":");
            self.write_value(value);
        }
        self.out.write_str("}");
    }
}

impl Consumer for JSON {
    fn start_rdb(&mut self, _version: u32) {
        self.out.write_str("[");
    }

    fn start_database(&mut self, _db: u32) {
        self.open_database();
    }

    fn record(&mut self, record: &Record<'_>) -> Flow {
        self.start_key(record.key);
        match record.value {
            LogicalValue::Scalar(value) => self.write_value(value),
            LogicalValue::Sequence(values) => self.write_array(values),
            LogicalValue::PairSequence(pairs) => self.write_object(pairs),
        }
        self.out.flow()
    }

    fn end_database(&mut self, _db: u32) {
        if self.in_database {
            self.out.write_str("}");
            self.in_database = false;
        }
    }

    fn end_rdb(&mut self) {
        if self.in_database {
            self.out.write_str("}");
            self.in_database = false;
        }
        self.out.write_str("]\n");
        self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::tests::{record, SharedBuf};
    use crate::types::Type;
    use pretty_assertions::assert_eq;

    fn render<F: FnOnce(&mut JSON)>(body: F) -> String {
        let buf = SharedBuf::default();
        let mut json = JSON::new(Box::new(buf.clone()));
        json.start_rdb(6);
        body(&mut json);
        json.end_rdb();
        buf.contents()
    }

    #[test]
    fn test_databases_and_value_shapes() {
        let value = LogicalValue::Scalar(b"v".to_vec());
        let list = LogicalValue::Sequence(vec![b"a".to_vec(), b"b".to_vec()]);
        let zset = LogicalValue::PairSequence(vec![(b"m".to_vec(), b"1.5".to_vec())]);

        let out = render(|json| {
            json.start_database(0);
            json.record(&record(b"k", Type::String, &value));
            json.record(&record(b"l", Type::List, &list));
            json.end_database(0);
            json.start_database(1);
            json.record(&record(b"z", Type::SortedSet, &zset));
            json.end_database(1);
        });

        assert_eq!(
            "[{\"k\":\"v\",\"l\":[\"a\",\"b\"]},{\"z\":{\"m\":\"1.5\"}}]\n",
            out
        );
    }

    #[test]
    fn test_empty_dump() {
        assert_eq!("[]\n", render(|_| {}));
    }

    #[test]
    fn test_binary_and_quoted_values() {
        let value = LogicalValue::Scalar(b"\xff\x01".to_vec());
        let out = render(|json| {
            json.start_database(0);
            json.record(&record(b"q\"", Type::String, &value));
            json.end_database(0);
        });
        assert_eq!("[{\"q\\\"\":\"\\u00ff\\u0001\"}]\n", out);
    }
}
