pub(crate) mod cursor;
pub mod intset;
pub mod utils;
pub mod ziplist;
pub mod zipmap;

pub use self::intset::read_intset;
pub use self::ziplist::{read_ziplist_flat, read_ziplist_pairs, ZiplistEntry};
pub use self::zipmap::read_zipmap;
