use crate::decoder::Consumer;
use crate::types::{Flow, Record};

/// Do not output anything
#[derive(Debug, Default)]
pub struct Nil;

impl Nil {
    pub fn new() -> Nil {
        Nil
    }
}

impl Consumer for Nil {
    fn record(&mut self, _record: &Record<'_>) -> Flow {
        Flow::Continue
    }
}
