//! Outer framing of 12-byte signalling blocks: FEC coding plus the trailing CRC-16.
//!
//! A block is 10 bytes of opcode, manufacturer and value followed by the CRC. Encoders
//! fill the first 10 bytes and let the framing write the CRC, and decoders only see a
//! block once its CRC has checked out.

use collect_slice::CollectSlice;
use tracing::debug;

use crate::bits::{Dibit, DibitBytes, Dibits};
use crate::coding::bptc::{self, Bptc19696};
use crate::coding::trellis::ViterbiDecoder;
use crate::data::coder::{DibitCoder, CODING_DIBITS};
use crate::data::crc;
use crate::data::interleave::{Deinterleaver, Interleaver};
use crate::error::{FrameFault, Result};

/// Number of bytes in a block.
pub const BLOCK_BYTES: usize = 12;

/// Number of dibits in an uncoded block.
pub const BLOCK_DIBITS: usize = BLOCK_BYTES * 4;

/// Number of bytes in a trellis coded block, including 2 padding dibits.
pub const TRELLIS_BYTES: usize = 25;

/// CRC mask applied to DMR CSBK blocks.
pub const CSBK_CRC_MASK: u16 = 0xA5A5;

/// Signalling block with its CRC in the last 2 bytes.
pub type Block = [u8; BLOCK_BYTES];

/// Converts between blocks and over-the-air frame bytes.
pub trait BlockFraming {
    /// Number of frame bytes consumed and produced.
    fn frame_bytes(&self) -> usize;

    /// Strip the framing from the given frame and verify the block CRC.
    fn decode_frame(&mut self, frame: &[u8]) -> Result<Block>;

    /// Write the CRC over the first 10 bytes of the block and frame the result into the
    /// given buffer.
    fn encode_frame(&mut self, block: &Block, frame: &mut [u8]);
}

fn check_len(frame: &[u8], len: usize) -> Result<()> {
    if frame.len() < len {
        debug!(got = frame.len(), want = len, "short frame");
        return Err(FrameFault::BadLength.into());
    }

    Ok(())
}

fn check_crc(block: Block, mask: u16) -> Result<Block> {
    if !crc::check_crc16(&block[..], mask) {
        debug!(opcode = block[0] & 0x3F, "block CRC mismatch");
        return Err(FrameFault::CrcMismatch.into());
    }

    Ok(block)
}

fn with_crc(block: &Block, mask: u16) -> Block {
    let mut out = *block;
    crc::add_crc16(&mut out[..], mask);
    out
}

/// Blocks carried without FEC, protected only by the CRC.
#[derive(Copy, Clone, Debug, Default)]
pub struct RawFraming;

impl BlockFraming for RawFraming {
    fn frame_bytes(&self) -> usize { BLOCK_BYTES }

    fn decode_frame(&mut self, frame: &[u8]) -> Result<Block> {
        check_len(frame, BLOCK_BYTES)?;

        let mut block = [0; BLOCK_BYTES];
        block.copy_from_slice(&frame[..BLOCK_BYTES]);

        check_crc(block, 0)
    }

    fn encode_frame(&mut self, block: &Block, frame: &mut [u8]) {
        frame[..BLOCK_BYTES].copy_from_slice(&with_crc(block, 0)[..]);
    }
}

/// P25 blocks protected by the half-rate trellis code and dibit interleaving.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrellisFraming;

impl BlockFraming for TrellisFraming {
    fn frame_bytes(&self) -> usize { TRELLIS_BYTES }

    fn decode_frame(&mut self, frame: &[u8]) -> Result<Block> {
        check_len(frame, TRELLIS_BYTES)?;

        let mut coded = [Dibit::default(); CODING_DIBITS];
        Dibits::new(frame[..TRELLIS_BYTES].iter().cloned())
            .take(CODING_DIBITS)
            .collect_slice_checked(&mut coded[..]);

        let mut dibits = [Dibit::default(); BLOCK_DIBITS];
        let count = ViterbiDecoder::new(Deinterleaver::new(&coded))
            .take(BLOCK_DIBITS)
            .filter_map(|d| d.ok())
            .collect_slice(&mut dibits[..]);

        if count != dibits.len() {
            debug!(decoded = count, "trellis decode unrecoverable");
            return Err(FrameFault::ViterbiUnrecoverable.into());
        }

        let mut block = [0; BLOCK_BYTES];
        DibitBytes::new(dibits.iter().cloned()).collect_slice_checked(&mut block[..]);

        check_crc(block, 0)
    }

    fn encode_frame(&mut self, block: &Block, frame: &mut [u8]) {
        let coded = DibitCoder::new()
            .feed_bytes(with_crc(block, 0).iter().cloned())
            .finish();

        let padding = [Dibit::default(); 2];

        DibitBytes::new(Interleaver::new(coded).chain(padding.iter().cloned()))
            .collect_slice_checked(&mut frame[..TRELLIS_BYTES]);
    }
}

/// DMR blocks protected by BPTC(196, 96) with a masked CRC.
#[derive(Clone, Debug)]
pub struct BptcFraming {
    bptc: Bptc19696,
    /// Mask XORed onto the CRC, which identifies the data type of the burst.
    mask: u16,
}

impl BptcFraming {
    /// Construct a new `BptcFraming` with the given CRC mask.
    pub fn new(mask: u16) -> Self {
        BptcFraming {
            bptc: Bptc19696::new(),
            mask,
        }
    }

    /// Construct a new `BptcFraming` for CSBK bursts.
    pub fn csbk() -> Self { Self::new(CSBK_CRC_MASK) }
}

impl BlockFraming for BptcFraming {
    fn frame_bytes(&self) -> usize { bptc::FRAME_BYTES }

    fn decode_frame(&mut self, frame: &[u8]) -> Result<Block> {
        check_len(frame, bptc::FRAME_BYTES)?;
        check_crc(self.bptc.decode(frame), self.mask)
    }

    fn encode_frame(&mut self, block: &Block, frame: &mut [u8]) {
        self.bptc.encode(&with_crc(block, self.mask), frame);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CodecError;

    const BLOCK: Block = [0x80, 0x00, 0x83, 0x10, 0x64, 0x12, 0x34, 0x00, 0x56, 0x78, 0, 0];

    #[test]
    fn test_raw() {
        let mut frame = [0; BLOCK_BYTES];
        RawFraming.encode_frame(&BLOCK, &mut frame);

        assert_eq!(&frame[..10], &BLOCK[..10]);

        let block = RawFraming.decode_frame(&frame).unwrap();
        assert_eq!(block, frame);

        frame[3] ^= 0x01;
        assert_eq!(RawFraming.decode_frame(&frame),
            Err(CodecError::FrameIntegrity(FrameFault::CrcMismatch)));

        assert_eq!(RawFraming.decode_frame(&frame[..11]),
            Err(CodecError::FrameIntegrity(FrameFault::BadLength)));
    }

    #[test]
    fn test_trellis() {
        let mut frame = [0; TRELLIS_BYTES];
        TrellisFraming.encode_frame(&BLOCK, &mut frame);

        assert_eq!(frame[24] & 0x0F, 0);

        let block = TrellisFraming.decode_frame(&frame).unwrap();
        assert_eq!(&block[..10], &BLOCK[..10]);
        assert!(crc::check_crc16(&block[..], 0));

        // A single flipped bit is corrected by the trellis.
        frame[7] ^= 0x20;
        assert_eq!(TrellisFraming.decode_frame(&frame).unwrap(), block);
    }

    #[test]
    fn test_bptc() {
        let mut framing = BptcFraming::csbk();
        let mut frame = [0; bptc::FRAME_BYTES];
        framing.encode_frame(&BLOCK, &mut frame);

        let block = framing.decode_frame(&frame).unwrap();
        assert_eq!(&block[..10], &BLOCK[..10]);
        assert!(crc::check_crc16(&block[..], CSBK_CRC_MASK));

        frame[5] ^= 0x08;
        assert_eq!(framing.decode_frame(&frame).unwrap(), block);

        // Wrong data type mask.
        let mut other = BptcFraming::new(0);
        assert_eq!(other.decode_frame(&frame),
            Err(CodecError::FrameIntegrity(FrameFault::CrcMismatch)));
    }
}
