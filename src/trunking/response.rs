//! Queue, deny, affiliation and registration exchanges.

use crate::error::Result;
use crate::site::SiteData;
use crate::trunking::Direction;
use crate::trunking::consts::*;
use crate::trunking::tsbk::TsbkPayload;
use crate::value::{FieldReader, FieldWriter};

/// Generates a response to a request for service: the service type that was requested,
/// the reason it wasn't granted, and the radio it concerns.
macro_rules! service_response {
    ($(#[$meta:meta])* $name:ident, $opcode:expr, $label:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
        pub struct $name {
            /// Whether `additional_info` holds a valid address.
            pub aiv: bool,
            /// Opcode of the service that was requested (6 bits).
            pub service_type: u8,
            /// Reason code.
            pub reason: u8,
            /// Reason specific information, usually the calling radio or talkgroup.
            pub additional_info: u32,
            /// Radio the response is for.
            pub dst_id: u32,
        }

        impl TsbkPayload for $name {
            const OPCODE: u8 = $opcode;
            const DIRECTION: Option<Direction> = Some(Direction::Outbound);

            fn from_value(value: u64) -> Self {
                let mut r = FieldReader::new(value);

                let aiv = r.flag();
                r.skip(1);

                $name {
                    aiv,
                    service_type: r.take(6),
                    reason: r.take(8),
                    additional_info: r.take(24),
                    dst_id: r.take(24),
                }
            }

            fn to_value(&self, _: &SiteData) -> Result<u64> {
                Ok(FieldWriter::new()
                    .flag(self.aiv)
                    .reserved(1)
                    .field(6, self.service_type)
                    .field(8, self.reason)
                    .field(24, self.additional_info)
                    .field(24, self.dst_id)
                    .finish())
            }

            fn describe(_: Direction) -> &'static str { $label }
        }
    };
}

service_response! {
    /// Request was queued until resources free up.
    QueRsp, OSP_QUE_RSP, "TSBKO, OSP_QUE_RSP (Queued Response)"
}

service_response! {
    /// Request was denied.
    DenyRsp, OSP_DENY_RSP, "TSBKO, OSP_DENY_RSP (Deny Response)"
}

/// Request to join a talkgroup.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GrpAffReq {
    /// System ID (12 bits) the radio believes it's on.
    pub sys_id: u16,
    pub group: u16,
    pub src_id: u32,
}

impl TsbkPayload for GrpAffReq {
    const OPCODE: u8 = ISP_GRP_AFF_REQ;
    const DIRECTION: Option<Direction> = Some(Direction::Inbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(12);

        GrpAffReq {
            sys_id: r.take(12),
            group: r.take(16),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .reserved(12)
            .field(12, self.sys_id)
            .field(16, self.group)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, ISP_GRP_AFF_REQ (Group Affiliation Request)"
    }
}

/// Result of a talkgroup affiliation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GrpAffRsp {
    /// Whether the affiliation is local to the site rather than system wide.
    pub local: bool,
    /// Affiliation value, one of the `RSP_*` codes (2 bits).
    pub response: u8,
    /// Announcement group the talkgroup belongs to.
    pub announce_group: u16,
    pub group: u16,
    pub dst_id: u32,
}

impl TsbkPayload for GrpAffRsp {
    const OPCODE: u8 = OSP_GRP_AFF_RSP;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);

        let local = r.flag();
        let response = r.take(2);
        r.skip(5);

        GrpAffRsp {
            local,
            response,
            announce_group: r.take(16),
            group: r.take(16),
            dst_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .flag(self.local)
            .field(2, self.response)
            .reserved(5)
            .field(16, self.announce_group)
            .field(16, self.group)
            .field(24, self.dst_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_GRP_AFF_RSP (Group Affiliation Response)"
    }
}

/// Request to register with the system.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct URegReq {
    /// WACN ID (20 bits) of the radio's home system.
    pub net_id: u32,
    /// System ID (12 bits) of the radio's home system.
    pub sys_id: u16,
    pub src_id: u32,
}

impl TsbkPayload for URegReq {
    const OPCODE: u8 = ISP_U_REG_REQ;
    const DIRECTION: Option<Direction> = Some(Direction::Inbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(8);

        URegReq {
            net_id: r.take(20),
            sys_id: r.take(12),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, _: &SiteData) -> Result<u64> {
        Ok(FieldWriter::new()
            .reserved(8)
            .field(20, self.net_id)
            .field(12, self.sys_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, ISP_U_REG_REQ (Unit Registration Request)"
    }
}

/// Result of a unit registration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct URegRsp {
    /// Registration value, one of the `RSP_*` codes (2 bits).
    pub response: u8,
    /// System ID (12 bits). Unset uses the site's.
    pub sys_id: u16,
    /// Radio being registered.
    pub dst_id: u32,
    /// Address assigned to the radio.
    pub src_id: u32,
}

impl TsbkPayload for URegRsp {
    const OPCODE: u8 = OSP_U_REG_RSP;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(2);

        URegRsp {
            response: r.take(2),
            sys_id: r.take(12),
            dst_id: r.take(24),
            src_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        let sys_id = if self.sys_id == 0 { site.sys_id } else { self.sys_id };

        Ok(FieldWriter::new()
            .reserved(2)
            .field(2, self.response)
            .field(12, sys_id)
            .field(24, self.dst_id)
            .field(24, self.src_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_U_REG_RSP (Unit Registration Response)"
    }
}

/// Acknowledgement of a unit deregistration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UDeregAck {
    /// WACN ID (20 bits). Unset uses the site's.
    pub net_id: u32,
    /// System ID (12 bits). Unset uses the site's.
    pub sys_id: u16,
    pub dst_id: u32,
}

impl TsbkPayload for UDeregAck {
    const OPCODE: u8 = OSP_U_DEREG_ACK;
    const DIRECTION: Option<Direction> = Some(Direction::Outbound);

    fn from_value(value: u64) -> Self {
        let mut r = FieldReader::new(value);
        r.skip(8);

        UDeregAck {
            net_id: r.take(20),
            sys_id: r.take(12),
            dst_id: r.take(24),
        }
    }

    fn to_value(&self, site: &SiteData) -> Result<u64> {
        let net_id = if self.net_id == 0 { site.net_id } else { self.net_id };
        let sys_id = if self.sys_id == 0 { site.sys_id } else { self.sys_id };

        Ok(FieldWriter::new()
            .reserved(8)
            .field(20, net_id)
            .field(12, sys_id)
            .field(24, self.dst_id)
            .finish())
    }

    fn describe(_: Direction) -> &'static str {
        "TSBKO, OSP_U_DEREG_ACK (Unit Deregistration Acknowledge)"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trunking::tsbk::{round_trip, TsbkBlock, TsbkMessage};

    fn site() -> SiteData {
        SiteData {
            net_id: 0xBEE00,
            sys_id: 0x2A1,
            ..SiteData::default()
        }
    }

    #[test]
    fn test_service_responses() {
        let q = QueRsp {
            aiv: true,
            service_type: IOSP_GRP_VCH,
            reason: 0x2F,
            additional_info: 0x00FFFF,
            dst_id: 0x123456,
        };

        assert_eq!(q.to_value(&site()).unwrap(), 0x80_2F_00FFFF_123456);
        assert_eq!(round_trip(&q, &site()), q);

        let d = DenyRsp {
            aiv: false,
            service_type: OSP_SNDCP_CH_GNT,
            reason: 0x61,
            additional_info: 0,
            dst_id: 0xFFFFFF,
        };

        assert_eq!(d.to_value(&site()).unwrap(), 0x14_61_000000_FFFFFF);
        assert_eq!(round_trip(&d, &site()), d);
        assert_eq!(DenyRsp::describe(Direction::Outbound), "TSBKO, OSP_DENY_RSP (Deny Response)");
    }

    #[test]
    fn test_affiliation() {
        let req = GrpAffReq { sys_id: 0x2A1, group: 0x0101, src_id: 0x000123 };
        assert_eq!(req.to_value(&site()).unwrap(), 0x000_2A1_0101_000123);
        assert_eq!(round_trip(&req, &site()), req);

        let rsp = GrpAffRsp {
            local: true,
            response: RSP_DENY,
            announce_group: 0xFFFF,
            group: 0x0101,
            dst_id: 0x000123,
        };
        assert_eq!(rsp.to_value(&site()).unwrap() >> 56, 0xC0);
        assert_eq!(round_trip(&rsp, &site()), rsp);

        // Same opcode, resolved by direction.
        let b = TsbkBlock::from_payload(&req, &site()).unwrap();
        assert_eq!(TsbkMessage::from_block(b, Direction::Inbound), TsbkMessage::GrpAffReq(req));
        match TsbkMessage::from_block(b, Direction::Outbound) {
            TsbkMessage::GrpAffRsp(_) => {},
            m => panic!("unexpected {:?}", m),
        }
    }

    #[test]
    fn test_registration() {
        let req = URegReq { net_id: 0xBEE00, sys_id: 0x2A1, src_id: 0x00ABCD };
        assert_eq!(req.to_value(&site()).unwrap(), 0x00_BEE00_2A1_00ABCD);
        assert_eq!(round_trip(&req, &site()), req);

        let rsp = URegRsp { response: RSP_ACCEPT, sys_id: 0, dst_id: 0x00ABCD, src_id: 0x00ABCD };
        let dec = round_trip(&rsp, &site());
        assert_eq!(dec.sys_id, 0x2A1);
        assert_eq!(dec.response, RSP_ACCEPT);

        let rsp = URegRsp { response: RSP_REFUSED, sys_id: 0x001, ..rsp };
        assert_eq!(round_trip(&rsp, &site()), rsp);
    }

    #[test]
    fn test_dereg_ack() {
        let ack = UDeregAck { dst_id: 0x00ABCD, ..UDeregAck::default() };

        assert_eq!(ack.to_value(&site()).unwrap(), 0x00_BEE00_2A1_00ABCD);
        assert_eq!(round_trip(&ack, &site()), UDeregAck {
            net_id: 0xBEE00,
            sys_id: 0x2A1,
            dst_id: 0x00ABCD,
        });
    }
}
