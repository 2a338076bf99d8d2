//! Opcodes and feature set IDs for DMR control signalling blocks.

/// Standard ETSI feature set.
pub const FID_ETSI: u8 = 0x00;
/// DMR Association feature set.
pub const FID_DMRA: u8 = 0x10;
/// DVM open control system feature set.
pub const FID_DVM: u8 = 0x9C;

/// Unit to unit voice service request.
pub const CSBKO_UU_V_REQ: u8 = 0x04;
/// Unit to unit voice service answer response.
pub const CSBKO_UU_ANS_RSP: u8 = 0x05;
/// Negative acknowledgement response.
pub const CSBKO_NACK_RSP: u8 = 0x26;
/// Call alert, sent as a random access service request.
pub const CSBKO_RAND: u8 = 0x1F;
/// BS outbound activation.
pub const CSBKO_BSDWNACT: u8 = 0x38;

/// Group/individual flag in the call alert options.
pub const CALL_ALRT_GROUP: u8 = 0x40;
