//! Voice call setup and teardown messages.

use crate::error::Result;
use crate::site::SiteData;
use crate::trunking::Direction;
use crate::trunking::consts::*;
use crate::trunking::fields::{Channel, ServiceOptions};
use crate::trunking::tsbk::TsbkPayload;
use crate::value::{FieldReader, FieldWriter};

/// Group voice channel request (inbound) or grant (outbound).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GrpVch {
    pub opts: ServiceOptions,
    /// Granted channel. An unset channel ID is filled with the site channel ID.
    pub channel: Channel,
    /// Send the channel ID as-is, even when unset.
    pub force_channel_id: bool,
    /// Talkgroup.
    pub dst_id: u16,
    /// Source radio.
    pub src_id: u32,
}

impl TsbkPayload for GrpVch {
    const OPCODE: u8 = IOSP_GRP_VCH;
    const DIRECTION: Option<Direction> = None;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        GrpVch {
            opts: ServiceOptions::from_bits(r.take(8)),
            channel: Channel::from_bits(r.take(16)),
            force_channel_id: false,
            dst_id: r.take(16),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        let channel = if self.force_channel_id {
            self.channel
        } else {
            self.channel.with_default_id(site.channel_id)
        };

        Ok(FieldWriter::new()
            .field(8, self.opts.to_bits())
            .field(16, channel.to_bits())
            .field(16, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(dir: Direction) -> &'static str {
        match dir {
            Direction::Inbound => "TSBKO, IOSP_GRP_VCH (Group Voice Channel Request)",
            Direction::Outbound => "TSBKO, IOSP_GRP_VCH (Group Voice Channel Grant)",
        }
    }
}

/// Pair of ongoing group calls announced on the control channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GrpVchGrantUpd {
    pub channel_a: Channel,
    pub group_a: u16,
    pub channel_b: Channel,
    pub group_b: u16,
}

impl TsbkPayload for GrpVchGrantUpd {
    const OPCODE: u8 = OSP_GRP_VCH_GRANT_UPD;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        GrpVchGrantUpd {
            channel_a: Channel::from_bits(r.take(16)),
            group_a: r.take(16),
            channel_b: Channel::from_bits(r.take(16)),
            group_b: r.take(16),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(16, self.channel_a.with_default_id(site.channel_id).to_bits())
            .field(16, self.group_a)
            .field(16, self.channel_b.with_default_id(site.channel_id).to_bits())
            .field(16, self.group_b)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_GRP_VCH_GRANT_UPD (Group Voice Channel Grant Update)"
    }
}

/// Unit to unit voice channel request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UuVchReq {
    pub opts: ServiceOptions,
    /// Called radio.
    pub dst_id: u32,
    /// Calling radio.
    pub src_id: u32,
}

impl TsbkPayload for UuVchReq {
    const OPCODE: u8 = ISP_UU_VCH_REQ;
    const DIRECTION: Option<Direction> = Some(Direction::Inbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        let opts = ServiceOptions::from_bits(r.take(8));
        r.skip(8);

        UuVchReq {
            opts,
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(8, self.opts.to_bits())
            .reserved(8)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, ISP_UU_VCH_REQ (Unit-to-Unit Voice Channel Request)"
    }
}

/// Unit to unit voice channel grant.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UuVchGrant {
    /// Granted channel. An unset channel ID is filled with the site channel ID.
    pub channel: Channel,
    pub dst_id: u32,
    pub src_id: u32,
}

impl TsbkPayload for UuVchGrant {
    const OPCODE: u8 = OSP_UU_VCH_GRANT;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        UuVchGrant {
            channel: Channel::from_bits(r.take(16)),
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(16, self.channel.with_default_id(site.channel_id).to_bits())
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_UU_VCH_GRANT (Unit-to-Unit Voice Channel Grant)"
    }
}

/// Unit to unit answer request (outbound) or response (inbound).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UuAns {
    pub opts: ServiceOptions,
    /// Answer given by the called radio, one of the `ANS_*` values.
    pub response: u8,
    pub dst_id: u32,
    pub src_id: u32,
}

impl TsbkPayload for UuAns {
    const OPCODE: u8 = IOSP_UU_ANS;
    const DIRECTION: Option<Direction> = None;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        UuAns {
            opts: ServiceOptions::from_bits(r.take(8)),
            response: r.take(8),
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(8, self.opts.to_bits())
            .field(8, self.response)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(dir: Direction) -> &'static str {
        match dir {
            Direction::Inbound => "TSBKO, IOSP_UU_ANS (Unit-to-Unit Answer Response)",
            Direction::Outbound => "TSBKO, IOSP_UU_ANS (Unit-to-Unit Answer Request)",
        }
    }
}

/// Call alert (page) from one radio to another.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CallAlrt {
    pub dst_id: u32,
    pub src_id: u32,
}

impl TsbkPayload for CallAlrt {
    const OPCODE: u8 = IOSP_CALL_ALRT;
    const DIRECTION: Option<Direction> = None;

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(16);

        CallAlrt {
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .reserved(16)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(dir: Direction) -> &'static str {
        match dir {
            Direction::Inbound => "TSBKO, IOSP_CALL_ALRT (Call Alert Request)",
            Direction::Outbound => "TSBKO, IOSP_CALL_ALRT (Call Alert)",
        }
    }
}

/// Termination or cancellation of a call on a voice channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CallTerm {
    /// Voice channel being released. An unset channel ID is filled with the site channel
    /// ID, but a non-zero one is sent as given rather than forced to the site's.
    pub channel: Channel,
    pub dst_id: u16,
    pub src_id: u32,
}

impl TsbkPayload for CallTerm {
    const OPCODE: u8 = OSP_DVM_LC_CALL_TERM;
    const MFID: u8 = MFID_DVM;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(8);

        CallTerm {
            channel: Channel::from_bits(r.take(16)),
            dst_id: r.take(16),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .reserved(8)
            .field(16, self.channel.with_default_id(site.channel_id).to_bits())
            .field(16, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "LC_CALL_TERM (Call Termination or Cancellation)"
    }
}
