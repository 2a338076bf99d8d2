//! Header block of a data packet.
//!
//! A header has several fields followed by a 16-bit checksum over those fields. For
//! alternate multi-block trunking packets the pad count and sequencing bytes are replaced
//! by the trunking opcode and two opcode specific fields.

use tracing::debug;

use crate::data::crc;
use crate::error::{FrameFault, Result};
use crate::util::{put_u24, slice_u24};

/// Number of bytes in a header block, including the checksum.
pub const HEADER_BYTES: usize = 12;

/// Unconfirmed data packet.
pub const FMT_UNCONFIRMED: u8 = 0x15;
/// Confirmed data packet.
pub const FMT_CONFIRMED: u8 = 0x16;
/// Alternate multi-block trunking control packet.
pub const FMT_AMBT: u8 = 0x17;

/// Trunking control service access point.
pub const SAP_TRUNK_CTRL: u8 = 0x3D;

/// Decoded data packet header.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DataHeader {
    /// Whether the packet requires confirmation.
    pub ack_needed: bool,
    /// Whether the packet is an outbound message.
    pub outbound: bool,
    /// Packet format (5 bits).
    pub format: u8,
    /// Service access point (6 bits).
    pub sap: u8,
    /// Manufacturer ID.
    pub mfid: u8,
    /// Logical link ID (24 bits) of the source or destination subscriber.
    pub llid: u32,
    /// Whether the packet is complete rather than being partially retransmitted.
    pub full_message: bool,
    /// Number of data blocks following the header (7 bits).
    pub blocks_to_follow: u8,
    /// Trunking opcode (6 bits).
    pub ambt_opcode: u8,
    pub ambt_field8: u8,
    pub ambt_field9: u8,
}

impl DataHeader {
    /// Header for an alternate multi-block trunking packet with the given opcode. The block
    /// count is filled in when the data is split into blocks.
    pub fn ambt(outbound: bool, mfid: u8, llid: u32, opcode: u8) -> DataHeader {
        DataHeader {
            ack_needed: false,
            outbound,
            format: FMT_AMBT,
            sap: SAP_TRUNK_CTRL,
            mfid,
            llid,
            full_message: true,
            blocks_to_follow: 0,
            ambt_opcode: opcode,
            ambt_field8: 0,
            ambt_field9: 0,
        }
    }

    /// Whether the header introduces an alternate multi-block trunking packet.
    pub fn is_ambt(&self) -> bool { self.format == FMT_AMBT }

    /// Parse the header from the given bytes, verifying the checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<DataHeader> {
        if bytes.len() != HEADER_BYTES {
            return Err(FrameFault::BadLength.into());
        }

        if !crc::check_crc16(bytes, 0) {
            debug!(format = bytes[0] & 0x1F, "data header CRC mismatch");
            return Err(FrameFault::HeaderCrcMismatch.into());
        }

        Ok(DataHeader {
            ack_needed: bytes[0] >> 6 & 1 == 1,
            outbound: bytes[0] >> 5 & 1 == 1,
            format: bytes[0] & 0x1F,
            sap: bytes[1] & 0x3F,
            mfid: bytes[2],
            llid: slice_u24(&bytes[3..]),
            full_message: bytes[6] >> 7 == 1,
            blocks_to_follow: bytes[6] & 0x7F,
            ambt_opcode: bytes[7] & 0x3F,
            ambt_field8: bytes[8],
            ambt_field9: bytes[9],
        })
    }

    /// Build the header bytes and checksum.
    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        assert!(self.format >> 5 == 0);
        assert!(self.sap >> 6 == 0);
        assert!(self.blocks_to_follow >> 7 == 0);
        assert!(self.ambt_opcode >> 6 == 0);

        let mut buf = [0; HEADER_BYTES];

        buf[0] = (self.ack_needed as u8) << 6 | (self.outbound as u8) << 5 | self.format;
        buf[1] = 0b11000000 | self.sap;
        buf[2] = self.mfid;
        put_u24(&mut buf[3..], self.llid);
        buf[6] = (self.full_message as u8) << 7 | self.blocks_to_follow;
        buf[7] = self.ambt_opcode;
        buf[8] = self.ambt_field8;
        buf[9] = self.ambt_field9;

        crc::add_crc16(&mut buf, 0);

        buf
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CodecError;

    const CONFIRMED: [u8; HEADER_BYTES] = [
        0b01110110,
        0b11000100,
        0b00010010,
        0b00110100,
        0b00100001,
        0b00110100,
        0b11111111,
        0b00000011,
        0b01010010,
        0b00000000,
        0b10001010,
        0b01110010,
    ];

    #[test]
    fn test_confirmed_header() {
        let h = DataHeader::from_bytes(&CONFIRMED).unwrap();

        assert!(h.ack_needed);
        assert!(h.outbound);
        assert_eq!(h.format, FMT_CONFIRMED);
        assert_eq!(h.sap, 0b000100);
        assert_eq!(h.mfid, 0x12);
        assert_eq!(h.llid, 0x342134);
        assert!(h.full_message);
        assert_eq!(h.blocks_to_follow, 127);
        assert!(!h.is_ambt());

        assert_eq!(h.to_bytes(), CONFIRMED);
    }

    #[test]
    fn test_ambt_header() {
        let mut h = DataHeader::ambt(true, 0x00, 0xABCDEF, 0x3A);
        h.blocks_to_follow = 2;
        h.ambt_field8 = 0x11;
        h.ambt_field9 = 0x22;

        let buf = h.to_bytes();
        assert_eq!(&buf[..10], &[0x37, 0xFD, 0x00, 0xAB, 0xCD, 0xEF, 0x82, 0x3A, 0x11, 0x22]);

        let dec = DataHeader::from_bytes(&buf).unwrap();
        assert_eq!(dec, h);
        assert!(dec.is_ambt());
    }

    #[test]
    fn test_header_errors() {
        let mut buf = CONFIRMED;
        buf[4] ^= 0x01;

        assert_eq!(DataHeader::from_bytes(&buf),
            Err(CodecError::FrameIntegrity(FrameFault::HeaderCrcMismatch)));
        assert_eq!(DataHeader::from_bytes(&CONFIRMED[..11]),
            Err(CodecError::FrameIntegrity(FrameFault::BadLength)));
    }

    #[test]
    #[should_panic]
    fn test_block_count_validate() {
        DataHeader { blocks_to_follow: 0xFF, ..DataHeader::default() }.to_bytes();
    }
}
