//! SNDCP packet data channel request and grant.

use tracing::trace;

use crate::error::Result;
use crate::site::{refusal, IdenEntry, SiteData};
use crate::trunking::Direction;
use crate::trunking::consts::*;
use crate::trunking::fields::Channel;
use crate::trunking::tsbk::TsbkPayload;
use crate::value::{FieldReader, FieldWriter};

/// Grant of a data channel, with separate transmit and receive channels.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SndcpChGnt {
    /// Data service options.
    pub dso: u8,
    /// Channel the site transmits on.
    pub tx_channel: Channel,
    /// Channel the subscriber transmits on.
    pub rx_channel: Channel,
    /// Target radio.
    pub dst_id: u32,
}

impl SndcpChGnt {
    /// Grant the given channel, deriving the paired inbound channel number from the given
    /// frequency plan. Refused if the plan is incomplete or the channel doesn't fit its
    /// fields.
    pub fn for_channel(dso: u8, ch_id: u8, ch_no: u16, dst_id: u32, iden: &IdenEntry)
        -> Result<SndcpChGnt>
    {
        iden.validate("OSP_SNDCP_CH_GNT")?;

        if ch_id >> 4 != 0 || ch_no >> 12 != 0 {
            return Err(refusal("OSP_SNDCP_CH_GNT", ch_id, "channel exceeds 16 bits"));
        }

        let base = iden.base_frequency as i64;
        let inbound = iden.rx_frequency(ch_no) as i64 + iden.tx_offset_hz();
        let rx_no = ((inbound - base) / iden.spacing_hz() as i64) & 0xFFF;

        trace!(ch_no, rx_no, inbound, "derived inbound data channel");

        Ok(SndcpChGnt {
            dso,
            tx_channel: Channel::new(ch_id, ch_no),
            rx_channel: Channel::new(ch_id, rx_no as u16),
            dst_id,
        })
    }
}

impl TsbkPayload for SndcpChGnt {
    const OPCODE: u8 = OSP_SNDCP_CH_GNT;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        SndcpChGnt {
            dso: r.take(8),
            tx_channel: Channel::from_bits(r.take(16)),
            rx_channel: Channel::from_bits(r.take(16)),
            dst_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(8, self.dso)
            .field(16, self.tx_channel.with_default_id(site.channel_id).to_bits())
            .field(16, self.rx_channel.with_default_id(site.channel_id).to_bits())
            .field(24, self.dst_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_SNDCP_CH_GNT (SNDCP Data Channel Grant)"
    }
}

/// Request for a data channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SndcpRecReq {
    /// Data service options.
    pub dso: u8,
    /// Whether the subscriber has data queued to send.
    pub data_to_send: bool,
    /// Data access control.
    pub dac: u16,
    /// Requesting radio.
    pub src_id: u32,
}

impl TsbkPayload for SndcpRecReq {
    const OPCODE: u8 = ISP_SNDCP_REC_REQ;
    const DIRECTION: Option<Direction> = Some(Direction::Inbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        let dso = r.take(8);
        let data_to_send = r.flag();
        r.skip(7);
        let dac = r.take(16);
        r.skip(8);

        SndcpRecReq {
            dso,
            data_to_send,
            dac,
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .field(8, self.dso)
            .flag(self.data_to_send)
            .reserved(7)
            .field(16, self.dac)
            .reserved(8)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, ISP_SNDCP_REC_REQ (SNDCP Data Channel Request)"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CodecError;
    use crate::trunking::tsbk::{round_trip, TsbkBlock, TsbkMessage};

    fn vhf() -> IdenEntry {
        IdenEntry {
            channel_id: 1,
            base_frequency: 450_000_000,
            ch_space_khz: 12.5,
            tx_offset_mhz: 5.0,
            ch_bandwidth_khz: 12.5,
        }
    }

    #[test]
    fn test_grant_channels() {
        let g = SndcpChGnt::for_channel(0x10, 1, 10, 0x001234, &vhf()).unwrap();

        assert_eq!(g.tx_channel, Channel::new(1, 10));
        // 5 MHz above at 12.5 kHz spacing.
        assert_eq!(g.rx_channel, Channel::new(1, 410));

        let site = SiteData::default();
        assert_eq!(g.to_value(&site).unwrap(), 0x10_100A_119A_001234);
        assert_eq!(round_trip(&g, &site), g);
    }

    #[test]
    fn test_grant_negative_offset() {
        let iden = IdenEntry {
            base_frequency: 851_006_250,
            tx_offset_mhz: -45.0,
            ..vhf()
        };

        let g = SndcpChGnt::for_channel(0, 0, 10, 1, &iden).unwrap();
        // 3590 channels below the base, wrapped into 12 bits.
        assert_eq!(g.rx_channel.number, 506);

        let site = SiteData { channel_id: 4, ..SiteData::default() };
        let dec = round_trip(&g, &site);
        assert_eq!(dec.tx_channel, Channel::new(4, 10));
        assert_eq!(dec.rx_channel, Channel::new(4, 506));
    }

    #[test]
    fn test_grant_refused() {
        let iden = IdenEntry { ch_space_khz: 0.0, ..vhf() };

        assert_eq!(SndcpChGnt::for_channel(0, 1, 10, 1, &iden), Err(CodecError::DomainValidation {
            opcode: "OSP_SNDCP_CH_GNT",
            reason: "channel spacing is zero".to_string(),
        }));

        let cases = [
            (IdenEntry { ch_space_khz: -12.5, ..vhf() }, "channel spacing is negative"),
            (IdenEntry { ch_space_khz: 0.0001, ..vhf() }, "channel spacing is below 1 Hz"),
        ];

        for (iden, reason) in cases.iter() {
            assert_eq!(SndcpChGnt::for_channel(0, 1, 10, 1, iden),
                Err(CodecError::DomainValidation {
                    opcode: "OSP_SNDCP_CH_GNT",
                    reason: reason.to_string(),
                }));
        }

        assert_eq!(SndcpChGnt::for_channel(0, 16, 10, 1, &vhf()),
            Err(CodecError::DomainValidation {
                opcode: "OSP_SNDCP_CH_GNT",
                reason: "channel exceeds 16 bits".to_string(),
            }));
    }

    #[test]
    fn test_rec_req() {
        let r = SndcpRecReq {
            dso: 0x82,
            data_to_send: true,
            dac: 0xBEEF,
            src_id: 0xC0FFEE,
        };

        let site = SiteData::default();
        assert_eq!(r.to_value(&site).unwrap(), 0x82_80_BEEF_00_C0FFEE);
        assert_eq!(round_trip(&r, &site), r);

        let b = TsbkBlock::from_payload(&r, &site).unwrap();
        assert_eq!(TsbkMessage::from_block(b, Direction::Inbound), TsbkMessage::SndcpRecReq(r));
        assert_eq!(TsbkMessage::from_block(b, Direction::Outbound),
            TsbkMessage::SndcpChGnt(SndcpChGnt::from_value(b.value)));
    }
}
