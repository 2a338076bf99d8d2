//! Trunking signalling blocks and the per-opcode message family carried in them.

use tracing::debug;

use crate::error::{FrameFault, Result};
use crate::framing::{Block, BlockFraming, BLOCK_BYTES};
use crate::site::SiteData;
use crate::trunking::Direction;
use crate::trunking::consts::MFID_STANDARD;
use crate::trunking::{broadcast, response, sndcp, voice};
use crate::util::{put_u32, slice_u32};

/// Generic trunking signalling block with its 64-bit value still packed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TsbkBlock {
    /// Whether this is the last block of the burst.
    pub last_block: bool,
    /// Whether the block is protected (encrypted).
    pub protect: bool,
    /// Opcode (6 bits).
    pub opcode: u8,
    /// Manufacturer ID.
    pub mfid: u8,
    /// Opcode specific value.
    pub value: u64,
}

impl TsbkBlock {
    /// Parse the header fields and value out of the given CRC-checked block.
    pub fn from_block(block: &Block) -> TsbkBlock {
        TsbkBlock {
            last_block: block[0] >> 7 == 1,
            protect: block[0] >> 6 & 1 == 1,
            opcode: block[0] & 0x3F,
            mfid: block[1],
            value: (slice_u32(&block[2..]) as u64) << 32 | slice_u32(&block[6..]) as u64,
        }
    }

    /// Pack the block, leaving the CRC bytes for the framing to fill.
    pub fn to_block(&self) -> Block {
        assert!(self.opcode >> 6 == 0);

        let mut block = [0; BLOCK_BYTES];

        block[0] = (self.last_block as u8) << 7 | (self.protect as u8) << 6 | self.opcode;
        block[1] = self.mfid;
        put_u32(&mut block[2..], (self.value >> 32) as u32);
        put_u32(&mut block[6..], self.value as u32);

        block
    }

    /// Strip the framing off the given frame and parse the block.
    pub fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8]) -> Result<TsbkBlock> {
        framing.decode_frame(frame).map(|b| TsbkBlock::from_block(&b))
    }

    /// Frame the block into the given buffer.
    pub fn encode<F: BlockFraming>(&self, framing: &mut F, frame: &mut [u8]) {
        framing.encode_frame(&self.to_block(), frame)
    }

    /// Build the single (last) block carrying the given message.
    pub fn from_payload<P: TsbkPayload>(payload: &P, site: &SiteData) -> Result<TsbkBlock> {
        Ok(TsbkBlock {
            last_block: true,
            protect: false,
            opcode: P::OPCODE,
            mfid: P::MFID,
            value: payload.to_value(site)?,
        })
    }

    /// Extract the given message from the block, if the block carries it.
    pub fn payload<P: TsbkPayload>(&self) -> Result<P> {
        if self.opcode != P::OPCODE || self.mfid != P::MFID {
            debug!(opcode = self.opcode, mfid = self.mfid, want = P::OPCODE, "opcode mismatch");
            return Err(FrameFault::OpcodeMismatch.into());
        }

        Ok(P::from_value(self.value))
    }
}

/// Layout of one opcode's fields within the 64-bit block value.
pub trait TsbkPayload: Sized {
    /// Opcode identifying the message.
    const OPCODE: u8;
    /// Manufacturer ID the opcode belongs to.
    const MFID: u8 = MFID_STANDARD;
    /// Direction the opcode is limited to, or `None` if it's the same in both.
    const DIRECTION: Option<Direction>;

    /// Unpack the fields from the given value.
    fn from_value(value: u64) -> Self;

    /// Pack the fields into a value, filling unset fields from the given site.
    fn to_value(&self, site: &SiteData) -> Result<u64>;

    /// Human readable label for the given direction.
    fn describe(dir: Direction) -> &'static str;

    /// Whether the given block, seen travelling in the given direction, carries this
    /// message.
    fn matches(block: &TsbkBlock, dir: Direction) -> bool {
        block.opcode == Self::OPCODE && block.mfid == Self::MFID &&
            Self::DIRECTION.map_or(true, |d| d == dir)
    }

    /// Decode the message from the given frame.
    fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8]) -> Result<Self> {
        TsbkBlock::decode(framing, frame)?.payload()
    }

    /// Encode the message into the given frame. Nothing is written if encoding is
    /// refused.
    fn encode<F: BlockFraming>(&self, site: &SiteData, framing: &mut F, frame: &mut [u8])
        -> Result<()>
    {
        TsbkBlock::from_payload(self, site)?.encode(framing, frame);
        Ok(())
    }
}

macro_rules! tsbk_messages {
    ($($variant:ident($ty:ty),)+) => {
        /// Trunking message decoded from a signalling block.
        #[derive(Clone, Debug, PartialEq)]
        pub enum TsbkMessage {
            $($variant($ty),)+
            /// Opcode this crate has no layout for.
            Unknown(TsbkBlock),
        }

        impl TsbkMessage {
            /// Interpret the given block, seen travelling in the given direction.
            pub fn from_block(block: TsbkBlock, dir: Direction) -> TsbkMessage {
                $(
                    if <$ty as TsbkPayload>::matches(&block, dir) {
                        return TsbkMessage::$variant(<$ty as TsbkPayload>::from_value(block.value));
                    }
                )+

                TsbkMessage::Unknown(block)
            }

            /// Build the block carrying this message.
            pub fn to_block(&self, site: &SiteData) -> Result<TsbkBlock> {
                match *self {
                    $(TsbkMessage::$variant(ref p) => TsbkBlock::from_payload(p, site),)+
                    TsbkMessage::Unknown(block) => Ok(block),
                }
            }

            /// Human readable label for the message in the given direction.
            pub fn describe(&self, dir: Direction) -> &'static str {
                match *self {
                    $(TsbkMessage::$variant(_) => <$ty as TsbkPayload>::describe(dir),)+
                    TsbkMessage::Unknown(_) => "TSBKO, UNKNOWN",
                }
            }
        }

        $(
            impl From<$ty> for TsbkMessage {
                fn from(p: $ty) -> Self { TsbkMessage::$variant(p) }
            }
        )+
    };
}

tsbk_messages! {
    GrpVch(voice::GrpVch),
    GrpVchGrantUpd(voice::GrpVchGrantUpd),
    UuVchReq(voice::UuVchReq),
    UuVchGrant(voice::UuVchGrant),
    UuAns(voice::UuAns),
    CallAlrt(voice::CallAlrt),
    CallTerm(voice::CallTerm),
    SndcpChGnt(sndcp::SndcpChGnt),
    SndcpRecReq(sndcp::SndcpRecReq),
    QueRsp(response::QueRsp),
    DenyRsp(response::DenyRsp),
    GrpAffReq(response::GrpAffReq),
    GrpAffRsp(response::GrpAffRsp),
    URegReq(response::URegReq),
    URegRsp(response::URegRsp),
    UDeregAck(response::UDeregAck),
    IdenUpVu(broadcast::IdenUpVu),
    IdenUp(broadcast::IdenUp),
    SysSrvBcast(broadcast::SysSrvBcast),
    Sccb(broadcast::Sccb),
    RfssStsBcast(broadcast::RfssStsBcast),
    NetStsBcast(broadcast::NetStsBcast),
    AdjStsBcast(broadcast::AdjStsBcast),
}

impl TsbkMessage {
    /// Decode a message from the given frame.
    pub fn decode<F: BlockFraming>(framing: &mut F, frame: &[u8], dir: Direction)
        -> Result<TsbkMessage>
    {
        TsbkBlock::decode(framing, frame).map(|b| TsbkMessage::from_block(b, dir))
    }

    /// Encode the message into the given frame. Nothing is written if encoding is
    /// refused.
    pub fn encode<F: BlockFraming>(&self, site: &SiteData, framing: &mut F,
                                   frame: &mut [u8])
        -> Result<()>
    {
        self.to_block(site)?.encode(framing, frame);
        Ok(())
    }
}

/// Encode the message through trellis framing and decode it back.
#[cfg(test)]
pub(crate) fn round_trip<P: TsbkPayload>(payload: &P, site: &SiteData) -> P {
    use crate::framing::{TrellisFraming, TRELLIS_BYTES};

    let mut frame = [0; TRELLIS_BYTES];
    payload.encode(site, &mut TrellisFraming, &mut frame).unwrap();

    let block = TsbkBlock::decode(&mut TrellisFraming, &frame).unwrap();
    assert!(P::matches(&block, P::DIRECTION.unwrap_or(Direction::Outbound)));

    block.payload().unwrap()
}
