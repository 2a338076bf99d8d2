//! Encoding and decoding of the (15, 11, 3) and (13, 9, 3) Hamming codes used by the
//! DMR block product turbo code.
//!
//! Both codes can correct up to 1 error. Codewords are held MSB-first: the first data
//! bit is the highest bit of the word and the parity bits are the 4 LSBs. The bit-slice
//! forms operate in place on one row or column of a BPTC plane.

use binfield_matrix::{matrix_mul, matrix_mul_systematic};
use num::PrimInt;

/// Encoding and decoding of the (15, 11, 3) code.
pub mod standard {
    use super::*;

    /// Encode the given 11 bits of data into a 15-bit codeword.
    pub fn encode(data: u16) -> u16 {
        assert!(data >> 11 == 0);
        matrix_mul_systematic(data, GEN)
    }

    /// Try to decode the given 15-bit word to the nearest codeword, correcting up to 1
    /// error.
    ///
    /// If decoding was successful, return `Some((data, err))`, where `data` is the 11
    /// data bits and `err` is the number of corrected bits. Otherwise, return `None` to
    /// indicate an unrecoverable error.
    pub fn decode(word: u16) -> Option<(u16, usize)> {
        assert!(word >> 15 == 0);
        super::decode(word, PAR, LOCATIONS).map(|(w, n)| (w >> 4, n))
    }

    /// Recompute the 4 parity bits of the given 15 bits from their first 11.
    pub fn encode_bits(bits: &mut [bool]) {
        super::encode_bits(bits, 15, encode)
    }

    /// Correct up to 1 error in the given 15 bits in place. Return `true` if a bit was
    /// flipped.
    pub fn correct_bits(bits: &mut [bool]) -> bool {
        super::correct_bits(bits, 15, |w| super::decode(w, PAR, LOCATIONS))
    }

    /// Generator matrix rows for the 4 parity bits, without identity part.
    const GEN: &[u16] = &[
        0b11110101100,
        0b01111010110,
        0b00111101011,
        0b11101011001,
    ];

    /// Parity-check matrix, ordered so the first parity bit lands in the syndrome LSB.
    const PAR: &[u16] = &[
        0b111010110010001,
        0b001111010110010,
        0b011110101100100,
        0b111101011001000,
    ];

    /// Maps 4-bit syndrome values to bit error locations.
    const LOCATIONS: &[u16] = &[
        0,
        0b0000000000001000,
        0b0000000000000100,
        0b0000000001000000,
        0b0000000000000010,
        0b0000001000000000,
        0b0000000000100000,
        0b0000100000000000,
        0b0000000000000001,
        0b0100000000000000,
        0b0000000100000000,
        0b0010000000000000,
        0b0000000000010000,
        0b0000000010000000,
        0b0000010000000000,
        0b0001000000000000,
    ];
}

/// Encoding and decoding of the (13, 9, 3) code.
pub mod short {
    use super::*;

    /// Encode the given 9 data bits into a 13-bit codeword.
    pub fn encode(data: u16) -> u16 {
        assert!(data >> 9 == 0);
        matrix_mul_systematic(data, GEN)
    }

    /// Try to decode the given 13-bit word to the nearest codeword, correcting up to 1
    /// error.
    ///
    /// If decoding was successful, return `Some((data, err))`, where `data` is the 9
    /// data bits and `err` is the number of corrected bits. Otherwise, return `None` to
    /// indicate an unrecoverable error.
    pub fn decode(word: u16) -> Option<(u16, usize)> {
        assert!(word >> 13 == 0);
        super::decode(word, PAR, LOCATIONS).map(|(w, n)| (w >> 4, n))
    }

    /// Recompute the 4 parity bits of the given 13 bits from their first 9.
    pub fn encode_bits(bits: &mut [bool]) {
        super::encode_bits(bits, 13, encode)
    }

    /// Correct up to 1 error in the given 13 bits in place. Return `true` if a bit was
    /// flipped.
    pub fn correct_bits(bits: &mut [bool]) -> bool {
        super::correct_bits(bits, 13, |w| super::decode(w, PAR, LOCATIONS))
    }

    const GEN: &[u16] = &[
        0b110101100,
        0b111010110,
        0b111101011,
        0b101011001,
    ];

    const PAR: &[u16] = &[
        0b1010110010001,
        0b1111010110010,
        0b1110101100100,
        0b1101011001000,
    ];

    // Syndromes 9 and 11 aren't reachable by a single error.
    const LOCATIONS: &[u16] = &[
        0,
        0b0000000000001000,
        0b0000000000000100,
        0b0000000001000000,
        0b0000000000000010,
        0b0000001000000000,
        0b0000000000100000,
        0b0000100000000000,
        0b0000000000000001,
        0,
        0b0000000100000000,
        0,
        0b0000000000010000,
        0b0000000010000000,
        0b0000010000000000,
        0b0001000000000000,
    ];
}

fn decode<T: PrimInt>(word: T, par: &[T], locs: &[T]) -> Option<(T, usize)> {
    let s: usize = matrix_mul(word, par);

    if s == 0 {
        return Some((word, 0));
    }

    locs.get(s).and_then(|&loc| if loc == T::zero() {
        None
    } else {
        Some((word ^ loc, 1))
    })
}

fn pack(bits: &[bool]) -> u16 {
    bits.iter().fold(0, |word, &bit| word << 1 | bit as u16)
}

fn unpack(word: u16, bits: &mut [bool]) {
    let n = bits.len();

    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = word >> (n - 1 - i) & 1 == 1;
    }
}

fn encode_bits<F: Fn(u16) -> u16>(bits: &mut [bool], n: usize, enc: F) {
    assert!(bits.len() == n);
    unpack(enc(pack(&bits[..n - 4])), bits);
}

fn correct_bits<F>(bits: &mut [bool], n: usize, dec: F) -> bool where
    F: Fn(u16) -> Option<(u16, usize)>
{
    assert!(bits.len() == n);

    match dec(pack(bits)) {
        Some((word, 1)) => {
            unpack(word, bits);
            true
        },
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_standard() {
        let w = 0b10101010101;
        let e = standard::encode(w);
        assert_eq!(e, 0b101010101011011);

        for i in 0..15 {
            assert_eq!(standard::decode(e ^ 1 << i), Some((w, 1)));
        }

        for i in 0..1<<11 {
            assert_eq!(standard::decode(standard::encode(i)), Some((i, 0)));
        }
    }

    #[test]
    fn test_standard_equations() {
        for i in 0..1<<11 {
            let mut d = [false; 15];
            unpack(standard::encode(i), &mut d);

            let x = |bits: &[usize]| bits.iter().fold(false, |p, &b| p ^ d[b]);

            assert_eq!(d[11], x(&[0, 1, 2, 3, 5, 7, 8]));
            assert_eq!(d[12], x(&[1, 2, 3, 4, 6, 8, 9]));
            assert_eq!(d[13], x(&[2, 3, 4, 5, 7, 9, 10]));
            assert_eq!(d[14], x(&[0, 1, 2, 4, 6, 7, 10]));
        }
    }

    #[test]
    fn test_short() {
        let w = 0b110011010;
        let e = short::encode(w);

        for i in 0..13 {
            assert_eq!(short::decode(e ^ 1 << i), Some((w, 1)));
        }

        for i in 0..1<<9 {
            assert_eq!(short::decode(short::encode(i)), Some((i, 0)));
        }
    }

    #[test]
    fn test_short_equations() {
        for i in 0..1<<9 {
            let mut d = [false; 13];
            unpack(short::encode(i), &mut d);

            let x = |bits: &[usize]| bits.iter().fold(false, |p, &b| p ^ d[b]);

            assert_eq!(d[9], x(&[0, 1, 3, 5, 6]));
            assert_eq!(d[10], x(&[0, 1, 2, 4, 6, 7]));
            assert_eq!(d[11], x(&[0, 1, 2, 3, 5, 7, 8]));
            assert_eq!(d[12], x(&[0, 2, 4, 5, 8]));
        }
    }

    #[test]
    fn test_short_uncorrectable() {
        let e = short::encode(0b101010101);
        // Syndrome 9: errors on both d9 and d12.
        assert_eq!(short::decode(e ^ 0b1001), None);
    }

    #[test]
    fn test_bits() {
        let mut bits = [false; 15];
        bits[0] = true;
        bits[5] = true;
        bits[10] = true;
        standard::encode_bits(&mut bits);

        let orig = bits;
        assert!(!standard::correct_bits(&mut bits));
        assert_eq!(bits, orig);

        for i in 0..15 {
            bits[i] = !bits[i];
            assert!(standard::correct_bits(&mut bits));
            assert_eq!(bits, orig);
        }

        let mut bits = [false; 13];
        bits[1] = true;
        bits[8] = true;
        short::encode_bits(&mut bits);

        let orig = bits;

        for i in 0..13 {
            bits[i] = !bits[i];
            assert!(short::correct_bits(&mut bits));
            assert_eq!(bits, orig);
        }
    }
}
