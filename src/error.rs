//! Errors that may occur when decoding or encoding signalling blocks.

use thiserror::Error;

/// Integrity check that rejected a received frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameFault {
    /// The frame buffer had the wrong number of bytes for its framing.
    BadLength,
    /// Too many errors were detected when attempting a convolutional decode.
    ViterbiUnrecoverable,
    /// Block CRC didn't match the recovered bytes.
    CrcMismatch,
    /// Data header CRC didn't match the header bytes.
    HeaderCrcMismatch,
    /// Data header doesn't describe the expected packet format.
    UnexpectedFormat,
    /// Block carries a different opcode than the one requested.
    OpcodeMismatch,
}

impl std::fmt::Display for FrameFault {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use self::FrameFault::*;

        f.write_str(match *self {
            BadLength => "bad frame length",
            ViterbiUnrecoverable => "trellis decode unrecoverable",
            CrcMismatch => "CRC mismatch",
            HeaderCrcMismatch => "data header CRC mismatch",
            UnexpectedFormat => "unexpected data header format",
            OpcodeMismatch => "opcode mismatch",
        })
    }
}

/// Codec errors returned to the caller.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CodecError {
    /// Outer framing (FEC, CRC) rejected the frame before any field was extracted.
    #[error("frame integrity check failed: {0}")]
    FrameIntegrity(FrameFault),

    /// Encode was refused because a required parameter is missing or invalid.
    #[error("refusing to encode {opcode}: {reason}")]
    DomainValidation {
        opcode: &'static str,
        reason: String,
    },

    /// Fewer data blocks were supplied than the header declares.
    #[error("incomplete block set: header declares {declared} blocks, {supplied} supplied")]
    IncompleteBlockSet {
        declared: usize,
        supplied: usize,
    },
}

impl From<FrameFault> for CodecError {
    fn from(fault: FrameFault) -> Self { CodecError::FrameIntegrity(fault) }
}

/// Standard result using `CodecError`.
pub type Result<T> = std::result::Result<T, CodecError>;
