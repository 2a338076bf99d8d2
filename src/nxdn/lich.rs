//! Link information channel (LICH), which follows the frame sync word of every NXDN frame
//! and describes how the rest of the frame is used.
//!
//! The 8 LICH bits are sent one per dibit: each information bit is the high bit of its
//! dibit and the low bit is always 1.

use tracing::debug;

use crate::bits::{Dibit, Dibits};
use crate::error::{FrameFault, Result};

/// Number of dibits in the frame sync word that precedes the LICH.
pub const FSW_DIBITS: usize = 10;

/// Number of dibits in the LICH.
pub const LICH_DIBITS: usize = 8;

/// Number of frame bytes needed to hold the sync word and LICH.
pub const LICH_FRAME_BYTES: usize = (FSW_DIBITS + LICH_DIBITS + 3) / 4;

/// Functional channel type: common access channel (RCCH) or SACCH non-superframe.
pub const FCT_CAC: u8 = 0;
/// Functional channel type: user data channel.
pub const FCT_UDCH: u8 = 1;
/// Functional channel type: SACCH superframe.
pub const FCT_SACCH_SS: u8 = 2;
/// Functional channel type: SACCH superframe, idle.
pub const FCT_SACCH_SS_IDLE: u8 = 3;

/// Channel option: normal data.
pub const OPT_DATA_NORMAL: u8 = 0;
/// Channel option: idle.
pub const OPT_DATA_IDLE: u8 = 1;
/// Channel option: common data.
pub const OPT_DATA_COMMON: u8 = 2;

/// Kind of RF channel the frame travels on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RfChannelType {
    /// Control channel.
    Rcch,
    /// Traffic channel.
    Rtch,
    /// Data channel.
    Rdch,
    /// Composite control and traffic channel.
    RtchC,
}

impl RfChannelType {
    /// Parse the type from the given 2 bits.
    pub fn from_bits(bits: u8) -> RfChannelType {
        use self::RfChannelType::*;

        match bits & 0b11 {
            0b00 => Rcch,
            0b01 => Rtch,
            0b10 => Rdch,
            _ => RtchC,
        }
    }

    /// Convert the type to 2 bits.
    pub fn to_bits(&self) -> u8 {
        use self::RfChannelType::*;

        match *self {
            Rcch => 0b00,
            Rtch => 0b01,
            Rdch => 0b10,
            RtchC => 0b11,
        }
    }
}

impl Default for RfChannelType {
    fn default() -> Self { RfChannelType::Rcch }
}

/// Decoded link information.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Lich {
    pub rfct: RfChannelType,
    /// Functional channel type (2 bits).
    pub fct: u8,
    /// Channel option (2 bits).
    pub option: u8,
    /// Whether the frame is outbound from the repeater.
    pub outbound: bool,
}

impl Lich {
    /// Parse the fields from the given LICH byte, returning whether its parity bit
    /// matched.
    pub fn from_byte(lich: u8) -> (Lich, bool) {
        let fields = Lich {
            rfct: RfChannelType::from_bits(lich >> 6),
            fct: lich >> 4 & 0b11,
            option: lich >> 2 & 0b11,
            outbound: lich >> 1 & 1 == 1,
        };

        (fields, parity(lich) == (lich & 1 == 1))
    }

    /// Pack the fields into a LICH byte with its parity bit.
    pub fn to_byte(&self) -> u8 {
        assert!(self.fct >> 2 == 0);
        assert!(self.option >> 2 == 0);

        let lich = self.rfct.to_bits() << 6 | self.fct << 4 | self.option << 2 |
            (self.outbound as u8) << 1;

        lich | parity(lich) as u8
    }

    /// Read the LICH from the given frame, which starts with the frame sync word. Returns
    /// the fields along with whether the parity bit matched.
    pub fn decode(frame: &[u8]) -> Result<(Lich, bool)> {
        if frame.len() < LICH_FRAME_BYTES {
            return Err(FrameFault::BadLength.into());
        }

        let lich = Dibits::new(frame.iter().cloned())
            .skip(FSW_DIBITS)
            .take(LICH_DIBITS)
            .fold(0, |byte, d| byte << 1 | d.hi());

        let (fields, ok) = Lich::from_byte(lich);

        if !ok {
            debug!(lich, "LICH parity mismatch");
        }

        Ok((fields, ok))
    }

    /// Write the LICH into the given frame after the frame sync word, leaving the other
    /// bits of the frame untouched.
    pub fn encode(&self, frame: &mut [u8]) {
        assert!(frame.len() >= LICH_FRAME_BYTES);

        let lich = self.to_byte();

        for i in 0..LICH_DIBITS {
            let dibit = Dibit::new((lich >> (7 - i) & 1) << 1 | 1);
            let pos = FSW_DIBITS + i;
            let shift = 6 - (pos % 4) * 2;

            frame[pos / 4] &= !(0b11 << shift);
            frame[pos / 4] |= dibit.bits() << shift;
        }
    }
}

/// Compute the parity bit for the given LICH byte.
fn parity(lich: u8) -> bool {
    match lich & 0xF0 {
        0x80 | 0xB0 => true,
        _ => false,
    }
}
