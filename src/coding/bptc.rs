//! Encoding and decoding of the DMR BPTC(196, 96) block product turbo code.
//!
//! The 96 payload bits are laid out in a 13x15 matrix (plus one unused leading bit)
//! where each of the first 9 rows is a (15, 11) Hamming codeword and each of the 15
//! columns is a (13, 9) Hamming codeword. The matrix is then scattered across the burst
//! with a fixed multiplicative interleaver.
//!
//! Decoding never fails: payload bits beyond the correction capacity of the code are
//! passed through, so callers must follow up with an outer integrity check.

use tracing::trace;

use crate::bits::BitPlane;
use crate::coding::hamming;

/// Number of bits in the code.
pub const CODE_BITS: usize = 196;

/// Number of bytes in a burst carrying the code.
pub const FRAME_BYTES: usize = 33;

/// Number of payload bytes carried by the code.
pub const PAYLOAD_BYTES: usize = 12;

/// Maximum number of column/row correction passes made over a received matrix.
const MAX_PASSES: usize = 5;

/// Matrix row/column stride.
const STRIDE: usize = 15;

/// Inclusive ranges of matrix positions that hold payload bits, in payload order.
const DATA_RANGES: [(usize, usize); 9] = [
    (4, 11),
    (16, 26),
    (31, 41),
    (46, 56),
    (61, 71),
    (76, 86),
    (91, 101),
    (106, 116),
    (121, 131),
];

/// Map the given matrix position to its position in the transmitted bit stream.
fn interleave(pos: usize) -> usize { pos * 181 % CODE_BITS }

/// BPTC(196, 96) coder holding its scratch planes.
#[derive(Clone, Debug, Default)]
pub struct Bptc19696 {
    /// Bits in transmitted order.
    raw: BitPlane<CODE_BITS>,
    /// Bits in matrix order.
    deinterleaved: BitPlane<CODE_BITS>,
}

impl Bptc19696 {
    /// Construct a new `Bptc19696` with cleared planes.
    pub fn new() -> Self { Self::default() }

    /// Recover the 12 payload bytes from the given 33-byte burst, correcting errors where
    /// possible.
    pub fn decode(&mut self, frame: &[u8]) -> [u8; PAYLOAD_BYTES] {
        assert!(frame.len() >= FRAME_BYTES);

        self.extract_binary(frame);
        self.deinterleave();
        self.correct();
        self.extract_data()
    }

    /// Encode the 12 payload bytes into the given 33-byte burst.
    ///
    /// Bytes 13 to 19 are left untouched, as are all but the 2 MSBs of byte 12 and all but
    /// the 2 LSBs of byte 20, since those belong to neighbouring fields of the burst.
    pub fn encode(&mut self, payload: &[u8; PAYLOAD_BYTES], frame: &mut [u8]) {
        assert!(frame.len() >= FRAME_BYTES);

        self.place_data(payload);
        self.add_parity();
        self.interleave();
        self.insert_binary(frame);
    }

    fn extract_binary(&mut self, frame: &[u8]) {
        self.raw.clear();

        for (i, &byte) in frame[..13].iter().enumerate() {
            self.raw.load_byte(i * 8, byte);
        }

        // Two bits of the first half are carried at the end of byte 20.
        self.raw[98] = frame[20] >> 1 & 1 == 1;
        self.raw[99] = frame[20] & 1 == 1;

        for (i, &byte) in frame[21..FRAME_BYTES].iter().enumerate() {
            self.raw.load_byte(100 + i * 8, byte);
        }
    }

    fn deinterleave(&mut self) {
        for a in 0..CODE_BITS {
            self.deinterleaved[a] = self.raw[interleave(a)];
        }
    }

    fn interleave(&mut self) {
        self.raw.clear();

        for a in 0..CODE_BITS {
            self.raw[interleave(a)] = self.deinterleaved[a];
        }
    }

    /// Run column then row correction until a pass fixes nothing or the pass limit is
    /// reached.
    fn correct(&mut self) {
        for pass in 0..MAX_PASSES {
            let mut fixing = false;

            for c in 0..STRIDE {
                let mut col = self.column(c);

                if hamming::short::correct_bits(&mut col) {
                    self.set_column(c, &col);
                    fixing = true;
                }
            }

            for r in 0..9 {
                let start = r * STRIDE + 1;

                if hamming::standard::correct_bits(
                    &mut self.deinterleaved.as_mut_slice()[start..start + STRIDE])
                {
                    fixing = true;
                }
            }

            if !fixing {
                break;
            }

            trace!(pass, "BPTC corrected bits");
        }
    }

    fn add_parity(&mut self) {
        for r in 0..9 {
            let start = r * STRIDE + 1;
            hamming::standard::encode_bits(
                &mut self.deinterleaved.as_mut_slice()[start..start + STRIDE]);
        }

        for c in 0..STRIDE {
            let mut col = self.column(c);
            hamming::short::encode_bits(&mut col);
            self.set_column(c, &col);
        }
    }

    fn column(&self, c: usize) -> [bool; 13] {
        let mut col = [false; 13];

        for (a, bit) in col.iter_mut().enumerate() {
            *bit = self.deinterleaved[c + 1 + a * STRIDE];
        }

        col
    }

    fn set_column(&mut self, c: usize, col: &[bool; 13]) {
        for (a, &bit) in col.iter().enumerate() {
            self.deinterleaved[c + 1 + a * STRIDE] = bit;
        }
    }

    fn extract_data(&self) -> [u8; PAYLOAD_BYTES] {
        let mut data = BitPlane::<96>::new();

        DATA_RANGES.iter()
            .flat_map(|&(start, end)| start..=end)
            .enumerate()
            .for_each(|(i, pos)| data[i] = self.deinterleaved[pos]);

        let mut bytes = [0; PAYLOAD_BYTES];
        data.write_bytes(&mut bytes);

        bytes
    }

    fn place_data(&mut self, payload: &[u8; PAYLOAD_BYTES]) {
        let data = BitPlane::<96>::from_bytes(payload);

        self.deinterleaved.clear();

        DATA_RANGES.iter()
            .flat_map(|&(start, end)| start..=end)
            .enumerate()
            .for_each(|(i, pos)| self.deinterleaved[pos] = data[i]);
    }

    fn insert_binary(&self, frame: &mut [u8]) {
        for (i, byte) in frame[..12].iter_mut().enumerate() {
            *byte = self.raw.byte_at(i * 8);
        }

        let byte = self.raw.byte_at(96);
        frame[12] = (frame[12] & 0x3F) | (byte & 0xC0);
        frame[20] = (frame[20] & 0xFC) | (byte >> 4 & 0x03);

        for (i, byte) in frame[21..FRAME_BYTES].iter_mut().enumerate() {
            *byte = self.raw.byte_at(100 + i * 8);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    /// Locate the byte and bit mask carrying the given transmitted bit.
    fn raw_location(pos: usize) -> (usize, u8) {
        match pos {
            0..=97 => (pos / 8, 0x80 >> (pos % 8)),
            98 => (20, 0b10),
            99 => (20, 0b01),
            _ => (21 + (pos - 100) / 8, 0x80 >> ((pos - 100) % 8)),
        }
    }

    #[test]
    fn test_interleave_permutation() {
        let mut seen = [false; CODE_BITS];

        for a in 0..CODE_BITS {
            assert!(!seen[interleave(a)]);
            seen[interleave(a)] = true;
        }

        assert_eq!(interleave(0), 0);
        assert_eq!(interleave(1), 181);
        assert_eq!(interleave(2), 166);
    }

    #[test]
    fn test_interleave_idempotent() {
        let mut rng = StdRng::seed_from_u64(0x196);
        let mut bptc = Bptc19696::new();

        for _ in 0..20 {
            let mut orig = BitPlane::<CODE_BITS>::new();

            for bit in orig.as_mut_slice() {
                *bit = rng.random();
            }

            bptc.deinterleaved = orig;
            bptc.interleave();
            bptc.deinterleave();
            assert_eq!(bptc.deinterleaved, orig);

            bptc.raw = orig;
            bptc.deinterleave();
            bptc.interleave();
            assert_eq!(bptc.raw, orig);
        }
    }

    #[test]
    fn test_data_ranges() {
        let total: usize = DATA_RANGES.iter().map(|&(s, e)| e - s + 1).sum();
        assert_eq!(total, 96);
    }

    #[test]
    fn test_round_trip() {
        let mut rng = StdRng::seed_from_u64(96);
        let mut bptc = Bptc19696::new();

        for _ in 0..200 {
            let mut payload = [0; PAYLOAD_BYTES];
            rng.fill(&mut payload[..]);

            let mut frame = [0; FRAME_BYTES];
            bptc.encode(&payload, &mut frame);
            assert_eq!(bptc.decode(&frame), payload);
        }
    }

    #[test]
    fn test_preserves_neighbours() {
        let payload = [0xA5; PAYLOAD_BYTES];
        let mut frame = [0xFF; FRAME_BYTES];

        Bptc19696::new().encode(&payload, &mut frame);

        assert_eq!(frame[12] & 0x3F, 0x3F);
        assert_eq!(frame[20] & 0xFC, 0xFC);
        assert!(frame[13..20].iter().all(|&b| b == 0xFF));

        assert_eq!(Bptc19696::new().decode(&frame), payload);
    }

    #[test]
    fn test_single_bit_errors() {
        let mut rng = StdRng::seed_from_u64(0xB97C);
        let mut bptc = Bptc19696::new();

        for _ in 0..10 {
            let mut payload = [0; PAYLOAD_BYTES];
            rng.fill(&mut payload[..]);

            let mut frame = [0; FRAME_BYTES];
            bptc.encode(&payload, &mut frame);

            for pos in 0..CODE_BITS {
                let (byte, mask) = raw_location(pos);
                let mut bad = frame;
                bad[byte] ^= mask;

                assert_eq!(bptc.decode(&bad), payload, "bit {}", pos);
            }
        }
    }

    #[test]
    fn test_zero_payload() {
        let mut frame = [0; FRAME_BYTES];
        Bptc19696::new().encode(&[0; PAYLOAD_BYTES], &mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }
}
