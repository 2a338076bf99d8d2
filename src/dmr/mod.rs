//! DMR control signalling blocks.

pub mod consts;
pub mod csbk;

pub use self::csbk::{CsbkBlock, CsbkMessage, CsbkPayload};
