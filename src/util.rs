//! Big-endian integer access within byte slices.

use num::PrimInt;

/// Calculate ceil(a / b).
pub fn div_ceil<T: PrimInt>(a: T, b: T) -> T {
    (a + b - T::one()) / b
}

/// Read a 16-bit word from the first 2 bytes.
pub fn slice_u16(bytes: &[u8]) -> u16 {
    (bytes[0] as u16) << 8 | bytes[1] as u16
}

/// Read a 24-bit word from the first 3 bytes.
pub fn slice_u24(bytes: &[u8]) -> u32 {
    (slice_u16(bytes) as u32) << 8 | bytes[2] as u32
}

/// Read a 32-bit word from the first 4 bytes.
pub fn slice_u32(bytes: &[u8]) -> u32 {
    (slice_u16(bytes) as u32) << 16 | slice_u16(&bytes[2..]) as u32
}

/// Write a 16-bit word into the first 2 bytes.
pub fn put_u16(bytes: &mut [u8], word: u16) {
    bytes[0] = (word >> 8) as u8;
    bytes[1] = word as u8;
}

/// Write the lower 24 bits of the word into the first 3 bytes.
pub fn put_u24(bytes: &mut [u8], word: u32) {
    assert!(word >> 24 == 0);

    bytes[0] = (word >> 16) as u8;
    put_u16(&mut bytes[1..], word as u16);
}

/// Write a 32-bit word into the first 4 bytes.
pub fn put_u32(bytes: &mut [u8], word: u32) {
    put_u16(bytes, (word >> 16) as u16);
    put_u16(&mut bytes[2..], word as u16);
}
