//! P25 trunking control channel messages: single-block TSBKs and alternate multi-block
//! (AMBT) messages.

pub mod ambt;
pub mod broadcast;
pub mod consts;
pub mod fields;
pub mod response;
pub mod sndcp;
pub mod tsbk;
pub mod voice;

pub use self::ambt::{AmbtMessage, AmbtPayload};
pub use self::tsbk::{TsbkBlock, TsbkMessage, TsbkPayload};

/// Direction a message travels relative to the infrastructure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Subscriber to infrastructure (ISP).
    Inbound,
    /// Infrastructure to subscriber (OSP).
    Outbound,
}

impl Direction {
    /// Whether the direction is outbound.
    pub fn is_outbound(&self) -> bool { *self == Direction::Outbound }
}
