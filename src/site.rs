//! Site context consumed by encoders that default or derive fields from the current site.

use tracing::warn;

use crate::error::{CodecError, Result};

/// Log and build the error for an encode refused because of the given reason.
pub(crate) fn refusal(opcode: &'static str, channel_id: u8, reason: &'static str)
    -> CodecError
{
    warn!(opcode, channel_id, reason, "refusing to encode");

    CodecError::DomainValidation {
        opcode,
        reason: reason.to_string(),
    }
}

/// Channel identity entry: the frequency plan used to turn a channel number into RF
/// frequencies.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(default, deny_unknown_fields))]
pub struct IdenEntry {
    /// Channel ID (4 bits) this plan is advertised under.
    pub channel_id: u8,
    /// Base frequency in Hz.
    pub base_frequency: u32,
    /// Spacing between channel numbers in kHz.
    pub ch_space_khz: f32,
    /// Transmit offset from the receive frequency in MHz. Negative offsets transmit below.
    pub tx_offset_mhz: f32,
    /// Channel bandwidth in kHz.
    pub ch_bandwidth_khz: f32,
}

impl IdenEntry {
    /// Whether every part of the frequency plan is filled in.
    pub fn is_complete(&self) -> bool {
        self.base_frequency != 0 && self.ch_space_khz > 0.0 && self.spacing_hz() != 0 &&
            self.tx_offset_mhz != 0.0 && self.ch_bandwidth_khz > 0.0 &&
            self.channel_id >> 4 == 0
    }

    /// Refuse to encode the given opcode unless the plan is complete.
    pub fn validate(&self, opcode: &'static str) -> Result<()> {
        let reason = if self.ch_bandwidth_khz == 0.0 {
            "channel bandwidth is zero"
        } else if !(self.ch_bandwidth_khz > 0.0) {
            "channel bandwidth is negative"
        } else if self.ch_space_khz == 0.0 {
            "channel spacing is zero"
        } else if !(self.ch_space_khz > 0.0) {
            "channel spacing is negative"
        } else if self.spacing_hz() == 0 {
            "channel spacing is below 1 Hz"
        } else if self.tx_offset_mhz == 0.0 {
            "transmit offset is zero"
        } else if self.base_frequency == 0 {
            "base frequency is zero"
        } else if self.channel_id >> 4 != 0 {
            "channel ID exceeds 4 bits"
        } else {
            return Ok(());
        };

        Err(refusal(opcode, self.channel_id, reason))
    }

    /// Channel spacing in Hz.
    pub fn spacing_hz(&self) -> u32 { (self.ch_space_khz * 1000.0) as u32 }

    /// Transmit offset in Hz.
    pub fn tx_offset_hz(&self) -> i64 { (self.tx_offset_mhz as f64 * 1_000_000.0) as i64 }

    /// Receive (downlink) frequency of the given channel number in Hz.
    pub fn rx_frequency(&self, ch_no: u16) -> u32 {
        self.base_frequency + self.spacing_hz() * ch_no as u32
    }

    /// Transmit (uplink) frequency of the given channel number in Hz.
    pub fn tx_frequency(&self, ch_no: u16) -> u32 {
        (self.rx_frequency(ch_no) as i64 + self.tx_offset_hz()) as u32
    }
}

/// Read-only snapshot of the site a message is encoded for.
///
/// Encoders pack the IDs as-is, so they must fit their field widths. `from_toml` checks
/// this and callers building a `SiteData` by hand are expected to do the same.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(default, deny_unknown_fields))]
pub struct SiteData {
    /// Wide area communications network ID (20 bits).
    pub net_id: u32,
    /// System ID (12 bits).
    pub sys_id: u16,
    /// RF subsystem ID.
    pub rfss_id: u8,
    /// Site ID within the RFSS.
    pub site_id: u8,
    /// Location registration area.
    pub lra: u8,
    /// Channel ID (4 bits) of the current site channel.
    pub channel_id: u8,
    /// Channel number (12 bits) of the current site channel.
    pub channel_no: u16,
    /// System service class advertised by the site.
    pub service_class: u8,
    /// Whether the site is connected to the wider network.
    pub net_active: bool,
    /// Frequency plan of the current site channel.
    pub iden: IdenEntry,
}

impl SiteData {
    /// Channel ID to use when the given one is unset (zero).
    pub fn channel_id_or(&self, channel_id: u8) -> u8 {
        if channel_id == 0 { self.channel_id } else { channel_id }
    }

    /// Load a site snapshot from a TOML document. Missing keys keep their defaults, and
    /// IDs too wide for their fields are rejected.
    #[cfg(feature = "config")]
    pub fn from_toml(doc: &str) -> std::result::Result<SiteData, toml::de::Error> {
        use serde::de::Error;

        let site: SiteData = toml::from_str(doc)?;

        match site.overflow() {
            Some(field) => Err(toml::de::Error::custom(format!("{} out of range", field))),
            None => Ok(site),
        }
    }

    /// Name of the first ID that doesn't fit its field width, if any.
    pub fn overflow(&self) -> Option<&'static str> {
        if self.net_id >> 20 != 0 {
            Some("net_id")
        } else if self.sys_id >> 12 != 0 {
            Some("sys_id")
        } else if self.channel_id >> 4 != 0 {
            Some("channel_id")
        } else if self.channel_no >> 12 != 0 {
            Some("channel_no")
        } else if self.iden.channel_id >> 4 != 0 {
            Some("iden.channel_id")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plan() -> IdenEntry {
        IdenEntry {
            channel_id: 1,
            base_frequency: 851_006_250,
            ch_space_khz: 12.5,
            tx_offset_mhz: -45.0,
            ch_bandwidth_khz: 12.5,
        }
    }

    #[test]
    fn test_frequencies() {
        let p = plan();

        assert!(p.is_complete());
        assert_eq!(p.spacing_hz(), 12_500);
        assert_eq!(p.tx_offset_hz(), -45_000_000);
        assert_eq!(p.rx_frequency(10), 851_131_250);
        assert_eq!(p.tx_frequency(10), 806_131_250);
    }

    #[test]
    fn test_validate() {
        assert!(plan().validate("OSP_IDEN_UP").is_ok());

        let p = IdenEntry { ch_space_khz: 0.0, ..plan() };
        assert!(!p.is_complete());

        match p.validate("OSP_IDEN_UP") {
            Err(CodecError::DomainValidation { opcode, reason }) => {
                assert_eq!(opcode, "OSP_IDEN_UP");
                assert_eq!(reason, "channel spacing is zero");
            },
            _ => panic!(),
        }
    }

    #[test]
    fn test_validate_bad_values() {
        let cases = [
            (IdenEntry { ch_bandwidth_khz: -12.5, ..plan() }, "channel bandwidth is negative"),
            (IdenEntry { ch_space_khz: -12.5, ..plan() }, "channel spacing is negative"),
            (IdenEntry { ch_space_khz: 0.0005, ..plan() }, "channel spacing is below 1 Hz"),
            (IdenEntry { channel_id: 16, ..plan() }, "channel ID exceeds 4 bits"),
        ];

        for (p, want) in cases.iter() {
            assert!(!p.is_complete());

            match p.validate("OSP_SNDCP_CH_GNT") {
                Err(CodecError::DomainValidation { reason, .. }) => assert_eq!(reason, *want),
                _ => panic!(),
            }
        }
    }

    #[test]
    fn test_overflow() {
        let site = SiteData { channel_id: 15, channel_no: 0xFFF, ..SiteData::default() };
        assert_eq!(site.overflow(), None);

        assert_eq!(SiteData { channel_id: 16, ..site }.overflow(), Some("channel_id"));
        assert_eq!(SiteData { sys_id: 0x1000, ..site }.overflow(), Some("sys_id"));
    }

    #[test]
    fn test_channel_default() {
        let site = SiteData { channel_id: 3, ..SiteData::default() };

        assert_eq!(site.channel_id_or(0), 3);
        assert_eq!(site.channel_id_or(5), 5);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_toml() {
        let site = SiteData::from_toml(r#"
            net_id = 0xBB800
            sys_id = 0x001
            rfss_id = 2
            site_id = 3
            channel_id = 1
            channel_no = 100
            net_active = true

            [iden]
            channel_id = 1
            base_frequency = 851006250
            ch_space_khz = 12.5
            tx_offset_mhz = -45.0
            ch_bandwidth_khz = 12.5
        "#).unwrap();

        assert_eq!(site.net_id, 0xBB800);
        assert_eq!(site.site_id, 3);
        assert!(site.net_active);
        assert_eq!(site.lra, 0);
        assert_eq!(site.iden, plan());

        assert!(SiteData::from_toml("bogus = 1").is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_toml_range() {
        for doc in &["channel_id = 16", "channel_no = 0x1000", "sys_id = 0x1000",
                     "net_id = 0x100000", "[iden]\nchannel_id = 16"]
        {
            assert!(SiteData::from_toml(doc).is_err(), "{}", doc);
        }

        let site = SiteData::from_toml("channel_id = 15\nchannel_no = 0xFFF").unwrap();
        assert_eq!(site.overflow(), None);
    }
}
