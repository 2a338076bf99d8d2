//! Implements the 16 and 32-bit CRCs protecting signalling blocks and multi-block user
//! data.
//!
//! The CRC-16 guards every 12-byte block, XORed with a data type mask for DMR (0xA5A5 on
//! CSBKs). The CRC-32 closes the user data of an alternate multi-block trunking packet.
//!
//! This implementation uses the typical long division and takes advantage of the short
//! lengths to use only a 64-bit word as a buffer, allowing simple bitwise operations.

/// 16-bit CRC-CCITT calculator.
pub type CRC16 = CRC<CRC16Params>;

/// 32-bit CRC calculator.
pub type CRC32 = CRC<CRC32Params>;

pub trait CRCParams {
    /// Generator polynomial, with the MSB being the coefficient of highest degree.
    fn gen() -> u64;

    /// Inversion polynomial, with the MSB being the coefficient of highest degree.
    fn inv() -> u64;

    /// Amount to left-shift the message (multiply by x^i) before division.
    fn shift() -> usize;

    /// Verify the parameters are well-formed.
    fn validate() {
        // Prevent division by zero.
        assert!(Self::gen() != 0);
        // Ensure the generator can be left-shifted by up to a byte (since that's the
        // maximum number of bits that will be fed in per long division step.)
        assert!(degree(Self::gen()) < 64 - 8);
    }
}

/// Params for 16-bit CRC.
pub struct CRC16Params;

impl CRCParams for CRC16Params {
    fn gen() -> u64 { 0b10001000000100001 }
    fn inv() -> u64 { 0b1111111111111111 }
    fn shift() -> usize { 16 }
}

/// Params for 32-bit CRC.
pub struct CRC32Params;

impl CRCParams for CRC32Params {
    fn gen() -> u64 { 0b100000100110000010001110110110111 }
    fn inv() -> u64 { 0b11111111111111111111111111111111 }
    fn shift() -> usize { 32 }
}

/// CRC calculator using long division.
pub struct CRC<P: CRCParams> {
    params: std::marker::PhantomData<P>,
    /// Current output of the calculator.
    word: u64
}

impl<P: CRCParams> CRC<P> {
    /// Construct a new `CRC` with empty output.
    pub fn new() -> CRC<P> {
        CRC {
            params: std::marker::PhantomData,
            word: 0,
        }
    }

    /// Feed in `num` LSBs of the given byte.
    pub fn feed_bits(&mut self, bits: u8, num: usize) -> &mut Self {
        assert!(num <= 8);
        // Verify there are no stray MSBs.
        assert!((bits as u16) >> num == 0);

        self.word <<= num;
        self.word |= bits as u64;

        self.div();
        self
    }

    /// Feed in the given byte stream.
    pub fn feed_bytes<T: IntoIterator<Item = u8>>(&mut self, bytes: T) -> &mut Self {
        for byte in bytes {
            self.feed_bits(byte, 8);
        }

        self
    }

    /// Finish the CRC calculation and return the resulting CRC.
    pub fn finish(&mut self) -> u64 {
        self.flush();
        self.word ^ P::inv()
    }

    /// Reduce the current word by dividing by the generator.
    fn div(&mut self) {
        while self.word != 0 {
            let diff = degree(self.word) as i32 - degree(P::gen()) as i32;

            // If the divisor (generator) has higher degree than the dividend (word), then
            // no more division can be done.
            if diff < 0 {
                break;
            }

            // Bring the generator up to the same degree and knock off at least one of the
            // word's MSBs.
            self.word ^= P::gen() << diff;
        }
    }

    /// Perform the final shift and division of the word.
    fn flush(&mut self) {
        for _ in 0..P::shift() {
            self.word <<= 1;
            self.div();
        }
    }
}

impl<P: CRCParams> Default for CRC<P> {
    fn default() -> Self { Self::new() }
}

/// Calculate the CRC-16 of the given bytes.
pub fn crc16(bytes: &[u8]) -> u16 {
    CRC16::new().feed_bytes(bytes.iter().cloned()).finish() as u16
}

/// Calculate the CRC-32 of the given bytes.
pub fn crc32(bytes: &[u8]) -> u32 {
    CRC32::new().feed_bytes(bytes.iter().cloned()).finish() as u32
}

/// Write the CRC-16 of all but the last 2 bytes of the block into those 2 bytes, XORed
/// with the given mask.
pub fn add_crc16(block: &mut [u8], mask: u16) {
    let n = block.len() - 2;
    let crc = crc16(&block[..n]) ^ mask;

    block[n] = (crc >> 8) as u8;
    block[n + 1] = crc as u8;
}

/// Check the trailing masked CRC-16 of the given block.
pub fn check_crc16(block: &[u8], mask: u16) -> bool {
    let n = block.len() - 2;
    let recv = (block[n] as u16) << 8 | block[n + 1] as u16;

    crc16(&block[..n]) ^ mask == recv
}

// Calculate the degree of the polynomial represented by x, where x > 0.
fn degree(x: u64) -> u32 {
    64 - 1 - x.leading_zeros()
}

#[cfg(test)]
mod test {
    use super::*;

    struct CRCTest;

    impl CRCParams for CRCTest {
        fn gen() -> u64 { 0b100011011 }
        fn inv() -> u64 { 0b111 }
        fn shift() -> usize { 0 }
    }

    #[test]
    fn validate_params() {
        CRC16Params::validate();
        CRC32Params::validate();
    }

    #[test]
    fn test_calc() {
        let mut c = CRC::<CRCTest>::new();
        c.feed_bytes([
            0b00111111,
            0b01111110,
        ].iter().cloned());
        assert_eq!(c.finish(), 0b110);
    }

    #[test]
    fn test_check_values() {
        assert_eq!(crc16(b"123456789"), 0xCE3C);
        assert_eq!(crc32(b"123456789"), 0x765E7680);
        assert_eq!(crc16(&[0; 10]), 0xFFFF);
    }

    #[test]
    fn test_masked() {
        let mut block = [0x3F, 0x00, 1, 2, 3, 4, 5, 6, 7, 8, 0, 0];

        add_crc16(&mut block, 0xA5A5);
        assert!(check_crc16(&block, 0xA5A5));
        assert!(!check_crc16(&block, 0));

        add_crc16(&mut block, 0);
        assert!(check_crc16(&block, 0));

        block[4] ^= 0x10;
        assert!(!check_crc16(&block, 0));
    }
}
