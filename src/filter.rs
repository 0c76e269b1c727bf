//! Filter trait and implementations to skip items in the parser

use regex::Regex;

use crate::types::Type;

/// A trait to decide which databases, types or keys get decoded.
///
/// Records that do not match are skipped without decoding their values.
pub trait Filter {
    fn matches_db(&self, _db: u32) -> bool {
        true
    }
    fn matches_type(&self, _typ: Type) -> bool {
        true
    }
    fn matches_key(&self, _key: &[u8]) -> bool {
        true
    }
}

/// A filter to match by database, type or a regular expression against key names
#[derive(Debug, Default, Clone)]
pub struct Simple {
    databases: Vec<u32>,
    types: Vec<Type>,
    keys: Option<Regex>,
}

impl Simple {
    pub fn new() -> Simple {
        Simple::default()
    }

    pub fn add_database(&mut self, db: u32) {
        self.databases.push(db);
    }

    pub fn add_type(&mut self, typ: Type) {
        self.types.push(typ);
    }

    pub fn add_keys(&mut self, re: Regex) {
        self.keys = Some(re);
    }
}

impl Filter for Simple {
    fn matches_db(&self, db: u32) -> bool {
        self.databases.is_empty() || self.databases.contains(&db)
    }

    fn matches_type(&self, typ: Type) -> bool {
        self.types.is_empty() || self.types.contains(&typ)
    }

    fn matches_key(&self, key: &[u8]) -> bool {
        match &self.keys {
            None => true,
            Some(re) => re.is_match(&String::from_utf8_lossy(key)),
        }
    }
}
