//! Data blocks following a header, and their reassembly into a single payload.

use tracing::debug;

use crate::data::crc;
use crate::data::header::DataHeader;
use crate::error::{CodecError, FrameFault, Result};
use crate::util::{div_ceil, put_u32, slice_u32};

/// Number of user data bytes in an unconfirmed data block.
pub const BLOCK_DATA_BYTES: usize = 12;

/// Number of bytes in the packet checksum at the end of the last block.
pub const PACKET_CRC_BYTES: usize = 4;

/// Unconfirmed data block.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DataBlock {
    pub user_data: [u8; BLOCK_DATA_BYTES],
}

impl DataBlock {
    /// Construct a new `DataBlock` from the given user data bytes.
    pub fn new(user_data: [u8; BLOCK_DATA_BYTES]) -> DataBlock {
        DataBlock { user_data }
    }
}

/// Header and the ordered data blocks it declares.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AlternateBlockSet {
    pub header: DataHeader,
    pub blocks: Vec<DataBlock>,
}

impl AlternateBlockSet {
    /// Construct a new `AlternateBlockSet` from received parts.
    pub fn new(header: DataHeader, blocks: Vec<DataBlock>) -> AlternateBlockSet {
        AlternateBlockSet { header, blocks }
    }

    /// Split the given data over as many blocks as needed, pad with zeroes and append the
    /// packet checksum. The header's block count is set to match.
    pub fn from_user_data(mut header: DataHeader, data: &[u8]) -> AlternateBlockSet {
        let count = div_ceil(data.len() + PACKET_CRC_BYTES, BLOCK_DATA_BYTES);
        assert!(count >> 7 == 0, "too much data for one packet");

        let mut buf = vec![0; count * BLOCK_DATA_BYTES];
        buf[..data.len()].copy_from_slice(data);

        let end = buf.len() - PACKET_CRC_BYTES;
        let checksum = crc::crc32(&buf[..end]);
        put_u32(&mut buf[end..], checksum);

        header.blocks_to_follow = count as u8;

        let blocks = buf.chunks(BLOCK_DATA_BYTES).map(|chunk| {
            let mut user_data = [0; BLOCK_DATA_BYTES];
            user_data.copy_from_slice(chunk);
            DataBlock::new(user_data)
        }).collect();

        AlternateBlockSet { header, blocks }
    }

    /// Concatenate the user data of the declared blocks and verify the packet checksum.
    /// The returned bytes exclude the checksum.
    pub fn assemble(&self) -> Result<Vec<u8>> {
        let declared = self.header.blocks_to_follow as usize;

        if self.blocks.len() < declared {
            debug!(declared, supplied = self.blocks.len(), "incomplete block set");

            return Err(CodecError::IncompleteBlockSet {
                declared,
                supplied: self.blocks.len(),
            });
        }

        if declared == 0 {
            return Err(FrameFault::BadLength.into());
        }

        let mut buf: Vec<u8> = self.blocks[..declared].iter()
            .flat_map(|b| b.user_data.iter().cloned())
            .collect();

        let end = buf.len() - PACKET_CRC_BYTES;

        if crc::crc32(&buf[..end]) != slice_u32(&buf[end..]) {
            debug!(blocks = declared, "packet CRC mismatch");
            return Err(FrameFault::CrcMismatch.into());
        }

        buf.truncate(end);

        Ok(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn header() -> DataHeader {
        DataHeader::ambt(true, 0x00, 0x000001, 0x3A)
    }

    #[test]
    fn test_single_block() {
        let set = AlternateBlockSet::from_user_data(header(), &[1, 2, 3, 4, 5, 6, 7]);

        assert_eq!(set.header.blocks_to_follow, 1);
        assert_eq!(set.blocks.len(), 1);
        assert_eq!(&set.blocks[0].user_data[..8], &[1, 2, 3, 4, 5, 6, 7, 0]);

        let data = set.assemble().unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_multi_block() {
        let data: Vec<u8> = (0..20).collect();
        let set = AlternateBlockSet::from_user_data(header(), &data);

        assert_eq!(set.header.blocks_to_follow, 2);
        assert_eq!(set.blocks[1].user_data[..8], data[12..20]);

        let out = set.assemble().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_incomplete() {
        let mut set = AlternateBlockSet::from_user_data(header(), &[0xAA; 16]);
        assert_eq!(set.header.blocks_to_follow, 2);

        set.blocks.truncate(1);

        assert_eq!(set.assemble(), Err(CodecError::IncompleteBlockSet {
            declared: 2,
            supplied: 1,
        }));
    }

    #[test]
    fn test_corrupt() {
        let mut set = AlternateBlockSet::from_user_data(header(), &[0x55; 8]);
        set.blocks[0].user_data[3] ^= 0x10;

        assert_eq!(set.assemble(), Err(CodecError::FrameIntegrity(FrameFault::CrcMismatch)));

        let empty = AlternateBlockSet::new(header(), vec![]);
        assert_eq!(empty.assemble(), Err(CodecError::FrameIntegrity(FrameFault::BadLength)));
    }
}
