//! Forward error correction and trunking signalling codecs for P25, DMR and NXDN.
//!
//! Signalling blocks are 12 bytes: opcode, manufacturer and a 64-bit value followed by a
//! CRC-16. A [`BlockFraming`](framing::BlockFraming) strips the over-the-air coding off a
//! frame and verifies the CRC, and the message types in [`trunking`] and [`dmr`] pack and
//! unpack their fields within the value.

pub mod bits;
pub mod coding;
pub mod data;
pub mod dmr;
pub mod error;
pub mod framing;
pub mod nxdn;
pub mod site;
pub mod trunking;
pub mod util;
pub mod value;

pub use crate::error::{CodecError, FrameFault, Result};
pub use crate::framing::{BlockFraming, BptcFraming, RawFraming, TrellisFraming};
pub use crate::site::{IdenEntry, SiteData};
pub use crate::trunking::Direction;
