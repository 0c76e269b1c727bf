pub mod version {
    pub const SUPPORTED_MINIMUM: u32 = 1;
    pub const SUPPORTED_MAXIMUM: u32 = 6;
    /// First version allowed to carry millisecond expire times.
    pub const EXPIRETIME_MS: u32 = 3;
    /// First version that ends with a CRC-64 trailer.
    pub const CHECKSUM: u32 = 5;
    /// Versions below this report twice the element count for ziplist sorted sets.
    pub const ZSET_COUNT_QUIRK_BELOW: u32 = 2;
}

pub mod constant {
    pub const RDB_6BITLEN: u8 = 0;
    pub const RDB_14BITLEN: u8 = 1;
    pub const RDB_32BITLEN: u8 = 2;
    pub const RDB_ENCVAL: u8 = 3;
    pub const RDB_MAGIC: &str = "REDIS";
}

pub mod op_code {
    pub const EXPIRETIME_MS: u8 = 252;
    pub const EXPIRETIME: u8 = 253;
    pub const SELECTDB: u8 = 254;
    pub const EOF: u8 = 255;
}

pub mod encoding_type {
    pub const STRING: u8 = 0;
    pub const LIST: u8 = 1;
    pub const SET: u8 = 2;
    pub const ZSET: u8 = 3;
    pub const HASH: u8 = 4;
    pub const HASH_ZIPMAP: u8 = 9;
    pub const LIST_ZIPLIST: u8 = 10;
    pub const SET_INTSET: u8 = 11;
    pub const ZSET_ZIPLIST: u8 = 12;
    pub const HASH_ZIPLIST: u8 = 13;
}

pub mod encoding {
    pub const INT8: u32 = 0;
    pub const INT16: u32 = 1;
    pub const INT32: u32 = 2;
    pub const LZF: u32 = 3;
}

/// Score length bytes of the plain sorted set encoding.
pub mod score {
    pub const NAN: u8 = 253;
    pub const POS_INF: u8 = 254;
    pub const NEG_INF: u8 = 255;
}

pub mod ziplist {
    pub const END: u8 = 0xFF;
    pub const BIGLEN: u8 = 254;
    /// zllen value meaning "too many entries to count in the header".
    pub const UNKNOWN_LEN: u16 = u16::MAX;

    pub const ENC_INT16: u8 = 0xC0;
    pub const ENC_INT32: u8 = 0xD0;
    pub const ENC_INT64: u8 = 0xE0;
    pub const ENC_INT24: u8 = 0xF0;
    pub const ENC_INT8: u8 = 0xFE;
    pub const ENC_IMM_MIN: u8 = 0xF1;
    pub const ENC_IMM_MAX: u8 = 0xFD;
}

pub mod zipmap {
    pub const END: u8 = 0xFF;
    pub const BIGLEN: u8 = 254;
}
