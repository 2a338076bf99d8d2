//! Control signalling blocks carried in BPTC(196, 96) protected bursts.

use tracing::debug;

use crate::dmr::consts::*;
use crate::error::{FrameFault, Result};
use crate::framing::{Block, BlockFraming, BLOCK_BYTES};
use crate::util::{put_u32, slice_u32};
use crate::value::{FieldReader, FieldWriter};

/// Generic control signalling block with its 64-bit value still packed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CsbkBlock {
    /// Whether this is the last block of the burst.
    pub last_block: bool,
    /// Protect flag.
    pub protect: bool,
    /// Opcode (6 bits).
    pub csbko: u8,
    /// Feature set ID.
    pub fid: u8,
    pub value: u64,
}

impl CsbkBlock {
    /// Parse the header fields and value out of the given CRC-checked block.
    pub fn from_block(block: &Block) -> CsbkBlock {
        CsbkBlock {
            last_block: block[0] >> 7 == 1,
            protect: block[0] >> 6 & 1 == 1,
            csbko: block[0] & 0x3F,
            fid: block[1],
            value: (slice_u32(&block[2..]) as u64) << 32 | slice_u32(&block[6..]) as u64,
        }
    }

    /// Pack the block, leaving the CRC bytes for the framing to fill.
    pub fn to_block(&self) -> Block {
        assert!(self.csbko >> 6 == 0);

        let mut block = [0; BLOCK_BYTES];

        block[0] = (self.last_block as u8) << 7 | (self.protect as u8) << 6 | self.csbko;
        block[1] = self.fid;
        put_u32(&mut block[2..], (self.value >> 32) as u32);
        put_u32(&mut block[6..], self.value as u32);

        block
    }

    /// Strip the framing off the given burst and parse the block.
    pub fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8]) -> Result<CsbkBlock> {
        framing.decode_frame(frame).map(|b| CsbkBlock::from_block(&b))
    }

    /// Frame the block into the given burst.
    pub fn encode<F: BlockFraming>(&self, framing: &mut F, frame: &mut [u8]) {
        framing.encode_frame(&self.to_block(), frame)
    }

    /// Extract the given message from the block, if the block carries it.
    pub fn payload<P: CsbkPayload>(&self) -> Result<P> {
        if !P::matches(self) {
            debug!(csbko = self.csbko, fid = self.fid, want = P::CSBKO, "opcode mismatch");
            return Err(FrameFault::OpcodeMismatch.into());
        }

        Ok(P::from_value(self.value))
    }
}

/// Layout of one opcode's fields within the 64-bit block value.
pub trait CsbkPayload: Sized {
    /// Opcode identifying the message.
    const CSBKO: u8;
    /// Feature set the opcode belongs to.
    const FID: u8 = FID_ETSI;

    /// Unpack the fields from the given value.
    fn from_value(value: u64) -> Self;

    /// Pack the fields into a value.
    fn to_value(&self) -> u64;

    /// Human readable label.
    fn describe() -> &'static str;

    /// Whether the given block carries this message.
    fn matches(block: &CsbkBlock) -> bool {
        block.csbko == Self::CSBKO && block.fid == Self::FID
    }

    /// Build the single (last) block carrying the message.
    fn to_block(&self) -> CsbkBlock {
        CsbkBlock {
            last_block: true,
            protect: false,
            csbko: Self::CSBKO,
            fid: Self::FID,
            value: self.to_value(),
        }
    }

    /// Decode the message from the given burst.
    fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8]) -> Result<Self> {
        CsbkBlock::decode(framing, frame)?.payload()
    }

    /// Encode the message into the given burst.
    fn encode<F: BlockFraming>(&self, framing: &mut F, frame: &mut [u8]) {
        self.to_block().encode(framing, frame)
    }
}

/// Call alert (page) to a radio or group.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CallAlrt {
    /// Whether the target is a group rather than an individual.
    pub group: bool,
    pub dst_id: u32,
    pub src_id: u32,
}

impl CsbkPayload for CallAlrt {
    const CSBKO: u8 = CSBKO_RAND;
    const FID: u8 = FID_DMRA;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        let opts: u8 = r.take(8);
        r.skip(8);

        CallAlrt {
            group: opts & CALL_ALRT_GROUP != 0,
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self) -> u64 {
        FieldWriter::new()
            .field(8, if self.group { CALL_ALRT_GROUP } else { 0 })
            .reserved(8)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish()
    }

    fn describe() -> &'static str { "CSBKO, RAND (Call Alert)" }
}

/// Unit to unit voice service request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UuVReq {
    /// Service options.
    pub opts: u8,
    pub dst_id: u32,
    pub src_id: u32,
}

impl CsbkPayload for UuVReq {
    const CSBKO: u8 = CSBKO_UU_V_REQ;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        let opts = r.take(8);
        r.skip(8);

        UuVReq {
            opts,
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self) -> u64 {
        FieldWriter::new()
            .field(8, self.opts)
            .reserved(8)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish()
    }

    fn describe() -> &'static str { "CSBKO, UU_V_REQ (Unit to Unit Voice Service Request)" }
}

/// Answer of the called radio to a unit to unit voice service request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UuAnsRsp {
    /// Service options.
    pub opts: u8,
    /// Answer code.
    pub response: u8,
    pub dst_id: u32,
    pub src_id: u32,
}

impl CsbkPayload for UuAnsRsp {
    const CSBKO: u8 = CSBKO_UU_ANS_RSP;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        UuAnsRsp {
            opts: r.take(8),
            response: r.take(8),
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self) -> u64 {
        FieldWriter::new()
            .field(8, self.opts)
            .field(8, self.response)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish()
    }

    fn describe() -> &'static str {
        "CSBKO, UU_ANS_RSP (Unit to Unit Voice Service Answer Response)"
    }
}

/// Refusal of a service request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NackRsp {
    /// Opcode of the refused service.
    pub service_type: u8,
    /// Reason code.
    pub reason: u8,
    pub dst_id: u32,
    pub src_id: u32,
}

impl CsbkPayload for NackRsp {
    const CSBKO: u8 = CSBKO_NACK_RSP;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        NackRsp {
            service_type: r.take(8),
            reason: r.take(8),
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self) -> u64 {
        FieldWriter::new()
            .field(8, self.service_type)
            .field(8, self.reason)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish()
    }

    fn describe() -> &'static str { "CSBKO, NACK_RSP (Negative Acknowledgement Response)" }
}

/// Activation of a base station's outbound channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BsDwnAct {
    /// Base station being activated.
    pub bs_id: u32,
    pub src_id: u32,
}

impl CsbkPayload for BsDwnAct {
    const CSBKO: u8 = CSBKO_BSDWNACT;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(16);

        BsDwnAct {
            bs_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self) -> u64 {
        FieldWriter::new()
            .reserved(16)
            .field(24, self.bs_id)
            .field(24, self.src_id)
            .finish()
    }

    fn describe() -> &'static str { "CSBKO, BSDWNACT (BS Outbound Activation)" }
}

/// DMR control message decoded from a signalling block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CsbkMessage {
    CallAlrt(CallAlrt),
    UuVReq(UuVReq),
    UuAnsRsp(UuAnsRsp),
    NackRsp(NackRsp),
    BsDwnAct(BsDwnAct),
    /// Opcode this crate has no layout for.
    Unknown(CsbkBlock),
}

impl CsbkMessage {
    /// Interpret the given block.
    pub fn from_block(block: CsbkBlock) -> CsbkMessage {
        let v = block.value;

        if CallAlrt::matches(&block) {
            CsbkMessage::CallAlrt(CallAlrt::from_value(v))
        } else if UuVReq::matches(&block) {
            CsbkMessage::UuVReq(UuVReq::from_value(v))
        } else if UuAnsRsp::matches(&block) {
            CsbkMessage::UuAnsRsp(UuAnsRsp::from_value(v))
        } else if NackRsp::matches(&block) {
            CsbkMessage::NackRsp(NackRsp::from_value(v))
        } else if BsDwnAct::matches(&block) {
            CsbkMessage::BsDwnAct(BsDwnAct::from_value(v))
        } else {
            CsbkMessage::Unknown(block)
        }
    }

    /// Build the block carrying this message.
    pub fn to_block(&self) -> CsbkBlock {
        match *self {
            CsbkMessage::CallAlrt(ref m) => m.to_block(),
            CsbkMessage::UuVReq(ref m) => m.to_block(),
            CsbkMessage::UuAnsRsp(ref m) => m.to_block(),
            CsbkMessage::NackRsp(ref m) => m.to_block(),
            CsbkMessage::BsDwnAct(ref m) => m.to_block(),
            CsbkMessage::Unknown(block) => block,
        }
    }

    /// Human readable label for the message.
    pub fn describe(&self) -> &'static str {
        match *self {
            CsbkMessage::CallAlrt(_) => CallAlrt::describe(),
            CsbkMessage::UuVReq(_) => UuVReq::describe(),
            CsbkMessage::UuAnsRsp(_) => UuAnsRsp::describe(),
            CsbkMessage::NackRsp(_) => NackRsp::describe(),
            CsbkMessage::BsDwnAct(_) => BsDwnAct::describe(),
            CsbkMessage::Unknown(_) => "CSBKO, UNKNOWN",
        }
    }

    /// Decode a message from the given burst.
    pub fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8]) -> Result<CsbkMessage> {
        CsbkBlock::decode(framing, frame).map(CsbkMessage::from_block)
    }

    /// Encode the message into the given burst.
    pub fn encode<F: BlockFraming>(&self, framing: &mut F, frame: &mut [u8]) {
        self.to_block().encode(framing, frame)
    }
}

impl From<CallAlrt> for CsbkMessage {
    fn from(m: CallAlrt) -> Self { CsbkMessage::CallAlrt(m) }
}

impl From<UuVReq> for CsbkMessage {
    fn from(m: UuVReq) -> Self { CsbkMessage::UuVReq(m) }
}

impl From<UuAnsRsp> for CsbkMessage {
    fn from(m: UuAnsRsp) -> Self { CsbkMessage::UuAnsRsp(m) }
}

impl From<NackRsp> for CsbkMessage {
    fn from(m: NackRsp) -> Self { CsbkMessage::NackRsp(m) }
}

impl From<BsDwnAct> for CsbkMessage {
    fn from(m: BsDwnAct) -> Self { CsbkMessage::BsDwnAct(m) }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coding::bptc::FRAME_BYTES;
    use crate::error::CodecError;
    use crate::framing::{BptcFraming, RawFraming};

    #[test]
    fn test_call_alert() {
        let m = CallAlrt { group: true, dst_id: 0x000123, src_id: 0x004567 };

        assert_eq!(m.to_value(), 0x40_00_000123_004567);
        assert_eq!(m.to_block().fid, FID_DMRA);
        assert_eq!(CallAlrt::from_value(0x40_00_000123_004567), m);

        let mut frame = [0; FRAME_BYTES];
        m.encode(&mut BptcFraming::csbk(), &mut frame);

        assert_eq!(CallAlrt::decode(&mut BptcFraming::csbk(), &frame).unwrap(), m);
        assert_eq!(CsbkMessage::decode(&mut BptcFraming::csbk(), &frame).unwrap().describe(),
            "CSBKO, RAND (Call Alert)");
    }

    #[test]
    fn test_crc_mask() {
        let m = CallAlrt { group: false, dst_id: 1, src_id: 2 };

        let mut frame = [0; FRAME_BYTES];
        m.encode(&mut BptcFraming::csbk(), &mut frame);

        // Unmasked CRC doesn't verify a CSBK.
        assert_eq!(CallAlrt::decode(&mut BptcFraming::new(0), &frame),
            Err(CodecError::FrameIntegrity(FrameFault::CrcMismatch)));
    }

    #[test]
    fn test_bit_errors() {
        let m = UuAnsRsp { opts: 0x80, response: 0x20, dst_id: 0xFFFFFF, src_id: 0x000001 };

        let mut frame = [0; FRAME_BYTES];
        m.encode(&mut BptcFraming::csbk(), &mut frame);

        frame[0] ^= 0x10;
        frame[30] ^= 0x02;

        assert_eq!(UuAnsRsp::decode(&mut BptcFraming::csbk(), &frame).unwrap(), m);
    }

    #[test]
    fn test_messages() {
        let msgs: Vec<CsbkMessage> = vec![
            UuVReq { opts: 0x10, dst_id: 0x10, src_id: 0x20 }.into(),
            UuAnsRsp { opts: 0, response: 0x21, dst_id: 0x20, src_id: 0x10 }.into(),
            NackRsp { service_type: 0x04, reason: 0x27, dst_id: 0x20, src_id: 0x10 }.into(),
            BsDwnAct { bs_id: 0xABCDEF, src_id: 0x123456 }.into(),
        ];

        for msg in msgs {
            let mut frame = [0; BLOCK_BYTES];
            msg.encode(&mut RawFraming, &mut frame);

            let dec = CsbkMessage::decode(&mut RawFraming, &frame).unwrap();
            assert_eq!(dec, msg);
            assert_eq!(dec.to_block().fid, FID_ETSI);
        }

        assert_eq!(BsDwnAct { bs_id: 0xABCDEF, src_id: 0x123456 }.to_value(),
            0x0000_ABCDEF_123456);
    }

    #[test]
    fn test_unknown() {
        let b = CsbkBlock { last_block: true, csbko: 0x1F, fid: FID_ETSI, ..CsbkBlock::default() };
        let msg = CsbkMessage::from_block(b);

        assert_eq!(msg, CsbkMessage::Unknown(b));
        assert_eq!(msg.describe(), "CSBKO, UNKNOWN");
        assert_eq!(msg.to_block(), b);
        assert_eq!(b.payload::<CallAlrt>(),
            Err(CodecError::FrameIntegrity(FrameFault::OpcodeMismatch)));
    }
}
