//! Error correction codes used by the signalling framings.

pub mod bptc;
pub mod hamming;
pub mod trellis;

pub use self::bptc::Bptc19696;
