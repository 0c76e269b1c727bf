use std::io::{self, Write};

pub use self::json::JSON;
pub use self::nil::Nil;
pub use self::plain::Plain;
pub use self::protocol::Protocol;

use crate::decoder::Consumer;
use crate::types::{Flow, Record};

pub mod json;
pub mod nil;
pub mod plain;
pub mod protocol;

/// Output sink shared by the formatters. Remembers the first write error and
/// ignores everything written after it.
pub struct Output {
    out: Box<dyn Write>,
    error: Option<io::Error>,
}

impl Output {
    pub fn new(out: Box<dyn Write>) -> Output {
        Output { out, error: None }
    }

    pub fn write(&mut self, data: &[u8]) {
        if self.error.is_none() {
            if let Err(e) = self.out.write_all(data) {
                self.error = Some(e);
            }
        }
    }

    pub fn write_str(&mut self, data: &str) {
        self.write(data.as_bytes());
    }

    pub fn flush(&mut self) {
        if self.error.is_none() {
            if let Err(e) = self.out.flush() {
                self.error = Some(e);
            }
        }
    }

    /// Stop the parse once the sink is broken.
    pub fn flow(&self) -> Flow {
        if self.error.is_some() {
            Flow::Abort
        } else {
            Flow::Continue
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

pub enum FormatterType {
    Json(JSON),
    Plain(Plain),
    Nil(Nil),
    Protocol(Protocol),
}

impl FormatterType {
    /// Write error that made the formatter stop, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        match self {
            Self::Json(f) => f.take_error(),
            Self::Plain(f) => f.take_error(),
            Self::Nil(_) => None,
            Self::Protocol(f) => f.take_error(),
        }
    }

    fn inner(&mut self) -> &mut dyn Consumer {
        match self {
            Self::Json(f) => f,
            Self::Plain(f) => f,
            Self::Nil(f) => f,
            Self::Protocol(f) => f,
        }
    }
}

impl Consumer for FormatterType {
    fn start_rdb(&mut self, version: u32) {
        self.inner().start_rdb(version)
    }

    fn start_database(&mut self, db: u32) {
        self.inner().start_database(db)
    }

    fn record(&mut self, record: &Record<'_>) -> Flow {
        self.inner().record(record)
    }

    fn end_database(&mut self, db: u32) {
        self.inner().end_database(db)
    }

    fn end_rdb(&mut self) {
        self.inner().end_rdb()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{LogicalValue, Type, ValueType};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A writer the test keeps a handle to after boxing it into a formatter.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn record<'a>(key: &'a [u8], kind: Type, value: &'a LogicalValue) -> Record<'a> {
        let encoding = match kind {
            Type::String => ValueType::String,
            Type::List => ValueType::List,
            Type::Set => ValueType::Set,
            Type::SortedSet => ValueType::SortedSet,
            Type::Hash => ValueType::Hash,
        };
        Record {
            db: 0,
            kind,
            encoding,
            key,
            value,
            expiry: None,
            reported_len: value.len(),
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_aborts() {
        let value = LogicalValue::Scalar(b"v".to_vec());
        let mut formatter = FormatterType::Plain(Plain::new(Box::new(BrokenPipe)));

        assert_eq!(Flow::Abort, formatter.record(&record(b"k", Type::String, &value)));
        let err = formatter.take_error().unwrap();
        assert_eq!(io::ErrorKind::BrokenPipe, err.kind());
    }

    #[test]
    fn test_nil_writes_nothing() {
        let value = LogicalValue::Scalar(b"v".to_vec());
        let mut formatter = FormatterType::Nil(Nil::new());
        formatter.start_rdb(6);
        assert_eq!(Flow::Continue, formatter.record(&record(b"k", Type::String, &value)));
        formatter.end_rdb();
        assert!(formatter.take_error().is_none());
    }
}
