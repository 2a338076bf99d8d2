//! Data packet pieces: checksums, trellis coding helpers, and the header and blocks of
//! alternate multi-block packets.

pub mod block;
pub mod coder;
pub mod crc;
pub mod header;
pub mod interleave;

pub use self::block::{AlternateBlockSet, DataBlock};
pub use self::header::DataHeader;
