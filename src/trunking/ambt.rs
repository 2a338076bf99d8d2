//! Alternate multi-block trunking (AMBT) messages, whose fields span a data header and
//! one or more data blocks.
//!
//! The fields are read from a wide value made of header fields 8 and 9 followed by the
//! user data of the blocks, in order. The header's logical link ID carries the source
//! radio or, for site broadcasts, a packed site identity.

use tracing::debug;

use crate::data::block::AlternateBlockSet;
use crate::data::header::DataHeader;
use crate::error::{FrameFault, Result};
use crate::site::SiteData;
use crate::trunking::Direction;
use crate::trunking::consts::*;
use crate::trunking::fields::Channel;
use crate::value::{FieldReader, FieldWriter};

/// Number of user data bytes that fit in the wide value after the two header fields.
pub const WIDE_DATA_BYTES: usize = 14;

/// Build the wide value from the given header and assembled user data. Missing bytes read
/// as zero and extra bytes are ignored.
pub fn wide_value(header: &DataHeader, user_data: &[u8]) -> u128 {
    let mut bytes = [0; 16];

    bytes[0] = header.ambt_field8;
    bytes[1] = header.ambt_field9;

    let n = user_data.len().min(WIDE_DATA_BYTES);
    bytes[2..2 + n].copy_from_slice(&user_data[..n]);

    u128::from_be_bytes(bytes)
}

/// Layout of one opcode's fields within the wide value.
pub trait AmbtPayload: Sized {
    /// Opcode identifying the message.
    const OPCODE: u8;
    /// Manufacturer ID the opcode belongs to.
    const MFID: u8 = MFID_STANDARD;
    /// Direction the opcode is limited to, or `None` if it's the same in both.
    const DIRECTION: Option<Direction>;
    /// Number of user data bytes the fields occupy after the two header fields.
    const DATA_BYTES: usize;

    /// Unpack the fields from the given header and wide value.
    fn from_wide(header: &DataHeader, value: u128) -> Self;

    /// Pack the fields, returning the logical link ID for the header along with the wide
    /// value.
    fn to_wide(&self, site: &SiteData) -> Result<(u32, u128)>;

    /// Human readable label for the given direction.
    fn describe(dir: Direction) -> &'static str;

    /// Whether the given header, seen travelling in the given direction, introduces this
    /// message.
    fn matches(header: &DataHeader, dir: Direction) -> bool {
        header.is_ambt() && header.ambt_opcode == Self::OPCODE && header.mfid == Self::MFID &&
            Self::DIRECTION.map_or(true, |d| d == dir)
    }

    /// Assemble the block set and decode the message from it.
    fn decode(set: &AlternateBlockSet) -> Result<Self> {
        if !set.header.is_ambt() {
            return Err(FrameFault::UnexpectedFormat.into());
        }

        if set.header.ambt_opcode != Self::OPCODE || set.header.mfid != Self::MFID {
            debug!(opcode = set.header.ambt_opcode, want = Self::OPCODE, "opcode mismatch");
            return Err(FrameFault::OpcodeMismatch.into());
        }

        let data = set.assemble()?;

        Ok(Self::from_wide(&set.header, wide_value(&set.header, &data)))
    }

    /// Encode the message into a header and data blocks travelling in the given direction.
    fn encode(&self, site: &SiteData, dir: Direction) -> Result<AlternateBlockSet> {
        let (llid, value) = self.to_wide(site)?;
        let bytes = value.to_be_bytes();

        let mut header = DataHeader::ambt(dir.is_outbound(), Self::MFID, llid, Self::OPCODE);
        header.ambt_field8 = bytes[0];
        header.ambt_field9 = bytes[1];

        Ok(AlternateBlockSet::from_user_data(header, &bytes[2..2 + Self::DATA_BYTES]))
    }
}

/// Group affiliation request (inbound) or response (outbound).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GrpAff {
    /// WACN ID (20 bits).
    pub net_id: u32,
    /// System ID (12 bits).
    pub sys_id: u16,
    pub group: u16,
    /// Announcement group the talkgroup belongs to.
    pub announce_group: u16,
    /// Radio affiliating, carried in the header.
    pub src_id: u32,
}

impl AmbtPayload for GrpAff {
    const OPCODE: u8 = MBT_IOSP_GRP_AFF;
    const DIRECTION: Option<Direction> = None;
    const DATA_BYTES: usize = 7;

    fn from_wide(header: &DataHeader, value: u128) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(8);

        GrpAff {
            net_id: r.take(20),
            sys_id: r.take(12),
            group: r.take(16),
            announce_group: r.take(16),
            src_id: header.llid,
        }
    }

    fn to_wide(&self, _: &SiteData) -> Result<(u32, u128)> {
        let value = FieldWriter::new()
            .reserved(8)
            .field(20, self.net_id)
            .field(12, self.sys_id)
            .field(16, self.group)
            .field(16, self.announce_group)
            .finish();

        Ok((self.src_id, value))
    }

    fn describe(dir: Direction) -> &'static str {
        match dir {
            Direction::Inbound => "AMBT, IOSP_GRP_AFF (Group Affiliation Request)",
            Direction::Outbound => "AMBT, IOSP_GRP_AFF (Group Affiliation Response)",
        }
    }
}

/// Demand from a subscriber to authenticate the system.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthSuDmd {
    /// WACN ID (20 bits).
    pub net_id: u32,
    /// System ID (12 bits).
    pub sys_id: u16,
    pub src_id: u32,
}

impl AmbtPayload for AuthSuDmd {
    const OPCODE: u8 = MBT_ISP_AUTH_SU_DMD;
    const DIRECTION: Option<Direction> = Some(Direction::Inbound);
    const DATA_BYTES: usize = 2;

    fn from_wide(header: &DataHeader, value: u128) -> Self {
        let mut r = FieldReader::new(value);

        AuthSuDmd {
            net_id: r.take(20),
            sys_id: r.take(12),
            src_id: header.llid,
        }
    }

    fn to_wide(&self, _: &SiteData) -> Result<(u32, u128)> {
        let value = FieldWriter::new()
            .field(20, self.net_id)
            .field(12, self.sys_id)
            .finish();

        Ok((self.src_id, value))
    }

    fn describe(_: Direction) -> &'static str {
        "AMBT, ISP_AUTH_SU_DMD (Authentication SU Demand)"
    }
}

/// Status of the RF subsystem, with the site identity packed into the header.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RfssStsBcast {
    pub lra: u8,
    pub net_active: bool,
    /// System ID (12 bits).
    pub sys_id: u16,
    pub rfss_id: u8,
    pub site_id: u8,
    pub tx_channel: Channel,
    pub rx_channel: Channel,
    pub service_class: u8,
}

impl RfssStsBcast {
    /// Describe the given site.
    pub fn from_site(site: &SiteData) -> RfssStsBcast {
        let channel = Channel::new(site.channel_id, site.channel_no);

        RfssStsBcast {
            lra: site.lra,
            net_active: site.net_active,
            sys_id: site.sys_id,
            rfss_id: site.rfss_id,
            site_id: site.site_id,
            tx_channel: channel,
            rx_channel: channel,
            service_class: site.service_class,
        }
    }

    /// Header LLID carrying the registration area and system: `lra` in bits 23-16, the
    /// network active flag in bit 12 and `sys_id` in bits 11-0. Receivers packing
    /// `lra << 12 | 0x1000 | site_id` here read these fields differently.
    fn llid(&self) -> u32 {
        assert!(self.sys_id >> 12 == 0);
        (self.lra as u32) << 16 | (self.net_active as u32) << 12 | self.sys_id as u32
    }
}

impl AmbtPayload for RfssStsBcast {
    const OPCODE: u8 = MBT_OSP_RFSS_STS_BCAST;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);
    const DATA_BYTES: usize = 7;

    fn from_wide(header: &DataHeader, value: u128) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(16);

        RfssStsBcast {
            lra: (header.llid >> 16) as u8,
            net_active: header.llid >> 12 & 1 == 1,
            sys_id: (header.llid & 0xFFF) as u16,
            rfss_id: r.take(8),
            site_id: r.take(8),
            tx_channel: Channel::from_bits(r.take(16)),
            rx_channel: Channel::from_bits(r.take(16)),
            service_class: r.take(8),
        }
    }

    fn to_wide(&self, site: &SiteData) -> Result<(u32, u128)> {
        let value = FieldWriter::new()
            .reserved(16)
            .field(8, self.rfss_id)
            .field(8, self.site_id)
            .field(16, self.tx_channel.with_default_id(site.channel_id).to_bits())
            .field(16, self.rx_channel.with_default_id(site.channel_id).to_bits())
            .field(8, self.service_class)
            .finish();

        Ok((self.llid(), value))
    }

    fn describe(_: Direction) -> &'static str {
        "AMBT, OSP_RFSS_STS_BCAST (RFSS Status Broadcast)"
    }
}

/// Trunking message decoded from an alternate block set.
#[derive(Clone, Debug, PartialEq)]
pub enum AmbtMessage {
    GrpAff(GrpAff),
    AuthSuDmd(AuthSuDmd),
    RfssStsBcast(RfssStsBcast),
    /// Opcode this crate has no layout for, with its assembled user data.
    Unknown(DataHeader, Vec<u8>),
}

impl AmbtMessage {
    /// Assemble the given block set, seen travelling in the given direction, and decode the
    /// message it carries.
    pub fn decode(set: &AlternateBlockSet, dir: Direction) -> Result<AmbtMessage> {
        let header = &set.header;

        if !header.is_ambt() {
            debug!(format = header.format, "not an alternate trunking packet");
            return Err(FrameFault::UnexpectedFormat.into());
        }

        let data = set.assemble()?;
        let value = wide_value(header, &data);

        Ok(if GrpAff::matches(header, dir) {
            AmbtMessage::GrpAff(GrpAff::from_wide(header, value))
        } else if AuthSuDmd::matches(header, dir) {
            AmbtMessage::AuthSuDmd(AuthSuDmd::from_wide(header, value))
        } else if RfssStsBcast::matches(header, dir) {
            AmbtMessage::RfssStsBcast(RfssStsBcast::from_wide(header, value))
        } else {
            AmbtMessage::Unknown(*header, data)
        })
    }

    /// Encode the message into a header and data blocks travelling in the given direction.
    pub fn encode(&self, site: &SiteData, dir: Direction) -> Result<AlternateBlockSet> {
        match *self {
            AmbtMessage::GrpAff(ref m) => m.encode(site, dir),
            AmbtMessage::AuthSuDmd(ref m) => m.encode(site, dir),
            AmbtMessage::RfssStsBcast(ref m) => m.encode(site, dir),
            AmbtMessage::Unknown(header, ref data) =>
                Ok(AlternateBlockSet::from_user_data(header, data)),
        }
    }

    /// Human readable label for the message in the given direction.
    pub fn describe(&self, dir: Direction) -> &'static str {
        match *self {
            AmbtMessage::GrpAff(_) => GrpAff::describe(dir),
            AmbtMessage::AuthSuDmd(_) => AuthSuDmd::describe(dir),
            AmbtMessage::RfssStsBcast(_) => RfssStsBcast::describe(dir),
            AmbtMessage::Unknown(..) => "AMBT, UNKNOWN",
        }
    }
}
