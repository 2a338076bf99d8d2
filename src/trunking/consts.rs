//! Opcodes, manufacturer IDs and field values for trunking signalling blocks.

/// Standard (non manufacturer specific) feature set.
pub const MFID_STANDARD: u8 = 0x00;
/// DVM open control system manufacturer ID.
pub const MFID_DVM: u8 = 0x9C;

/// Group voice channel request (ISP) / grant (OSP).
pub const IOSP_GRP_VCH: u8 = 0x00;
/// Group voice channel grant update.
pub const OSP_GRP_VCH_GRANT_UPD: u8 = 0x02;
/// Unit to unit voice channel request.
pub const ISP_UU_VCH_REQ: u8 = 0x04;
/// Unit to unit voice channel grant.
pub const OSP_UU_VCH_GRANT: u8 = 0x04;
/// Unit to unit answer request (OSP) / response (ISP).
pub const IOSP_UU_ANS: u8 = 0x05;
/// Call termination or cancellation (DVM).
pub const OSP_DVM_LC_CALL_TERM: u8 = 0x0F;
/// SNDCP data channel grant.
pub const OSP_SNDCP_CH_GNT: u8 = 0x14;
/// SNDCP data channel request.
pub const ISP_SNDCP_REC_REQ: u8 = 0x14;
/// Call alert.
pub const IOSP_CALL_ALRT: u8 = 0x1F;
/// Queued response.
pub const OSP_QUE_RSP: u8 = 0x21;
/// Deny response.
pub const OSP_DENY_RSP: u8 = 0x27;
/// Group affiliation request.
pub const ISP_GRP_AFF_REQ: u8 = 0x28;
/// Group affiliation response.
pub const OSP_GRP_AFF_RSP: u8 = 0x28;
/// Unit registration request.
pub const ISP_U_REG_REQ: u8 = 0x2C;
/// Unit registration response.
pub const OSP_U_REG_RSP: u8 = 0x2C;
/// Unit deregistration acknowledge.
pub const OSP_U_DEREG_ACK: u8 = 0x2F;
/// Channel identifier update for VHF/UHF bands.
pub const OSP_IDEN_UP_VU: u8 = 0x34;
/// System service broadcast.
pub const OSP_SYS_SRV_BCAST: u8 = 0x38;
/// Secondary control channel broadcast.
pub const OSP_SCCB: u8 = 0x39;
/// RFSS status broadcast.
pub const OSP_RFSS_STS_BCAST: u8 = 0x3A;
/// Network status broadcast.
pub const OSP_NET_STS_BCAST: u8 = 0x3B;
/// Adjacent site status broadcast.
pub const OSP_ADJ_STS_BCAST: u8 = 0x3C;
/// Channel identifier update.
pub const OSP_IDEN_UP: u8 = 0x3D;

/// Alternate multi-block group affiliation.
pub const MBT_IOSP_GRP_AFF: u8 = 0x28;
/// Alternate multi-block authentication demand.
pub const MBT_ISP_AUTH_SU_DMD: u8 = 0x38;
/// Alternate multi-block RFSS status broadcast.
pub const MBT_OSP_RFSS_STS_BCAST: u8 = 0x3A;

/// Response: accepted.
pub const RSP_ACCEPT: u8 = 0x00;
/// Response: failed.
pub const RSP_FAIL: u8 = 0x01;
/// Response: denied.
pub const RSP_DENY: u8 = 0x02;
/// Response: refused.
pub const RSP_REFUSED: u8 = 0x03;

/// Answer: proceed with the call.
pub const ANS_PROCEED: u8 = 0x20;
/// Answer: deny the call.
pub const ANS_DENY: u8 = 0x21;
/// Answer: wait.
pub const ANS_WAIT: u8 = 0x22;

/// IDEN_UP_VU bandwidth code for 6.25 kHz channels.
pub const IDEN_UP_VU_BW_625K: u8 = 0x04;
/// IDEN_UP_VU bandwidth code for 12.5 kHz channels.
pub const IDEN_UP_VU_BW_125K: u8 = 0x05;

/// Lowest base frequency (Hz) that IDEN_UP can describe; lower bands use IDEN_UP_VU.
pub const IDEN_UP_MIN_BASE: u32 = 762_000_000;
