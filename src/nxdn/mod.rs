//! NXDN channel signalling.

pub mod lich;

pub use self::lich::{Lich, RfChannelType};
