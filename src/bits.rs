//! Bit planes and utilities for packing/unpacking dibits into/out of bytes.

use std::ops::{Index, IndexMut};

/// Unpack the given byte into 8 bits, MSB first.
pub fn byte_to_bits_be(byte: u8, bits: &mut [bool]) {
    assert!(bits.len() >= 8);

    for (i, bit) in bits[..8].iter_mut().enumerate() {
        *bit = byte >> (7 - i) & 1 == 1;
    }
}

/// Pack the first 8 of the given bits into a byte, MSB first.
pub fn bits_to_byte_be(bits: &[bool]) -> u8 {
    assert!(bits.len() >= 8);

    bits[..8].iter().fold(0, |byte, &bit| byte << 1 | bit as u8)
}

/// Fixed-length plane of bits. The length is set by the type and never changes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BitPlane<const N: usize>([bool; N]);

impl<const N: usize> BitPlane<N> {
    /// Construct a new `BitPlane` with all bits cleared.
    pub fn new() -> Self { BitPlane([false; N]) }

    /// Unpack the given bytes, MSB first, into a new plane. Bytes past the end of the
    /// plane are ignored and missing bytes leave bits cleared.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut plane = Self::new();

        for (i, &byte) in bytes.iter().enumerate().take(N / 8) {
            plane.load_byte(i * 8, byte);
        }

        plane
    }

    /// Number of bits in the plane.
    pub fn len(&self) -> usize { N }

    /// Whether the plane holds no bits.
    pub fn is_empty(&self) -> bool { N == 0 }

    /// Clear every bit.
    pub fn clear(&mut self) { self.0 = [false; N]; }

    /// Unpack a byte into the 8 bits starting at `pos`.
    pub fn load_byte(&mut self, pos: usize, byte: u8) {
        byte_to_bits_be(byte, &mut self.0[pos..pos + 8]);
    }

    /// Pack the 8 bits starting at `pos` into a byte.
    pub fn byte_at(&self, pos: usize) -> u8 {
        bits_to_byte_be(&self.0[pos..pos + 8])
    }

    /// Pack all whole bytes of the plane into the given buffer.
    pub fn write_bytes(&self, bytes: &mut [u8]) {
        for (i, byte) in bytes.iter_mut().enumerate().take(N / 8) {
            *byte = self.byte_at(i * 8);
        }
    }

    /// Slice over the underlying bits.
    pub fn as_slice(&self) -> &[bool] { &self.0[..] }

    /// Mutable slice over the underlying bits.
    pub fn as_mut_slice(&mut self) -> &mut [bool] { &mut self.0[..] }
}

impl<const N: usize> Default for BitPlane<N> {
    fn default() -> Self { Self::new() }
}

impl<const N: usize> Index<usize> for BitPlane<N> {
    type Output = bool;
    fn index(&self, idx: usize) -> &bool { &self.0[idx] }
}

impl<const N: usize> IndexMut<usize> for BitPlane<N> {
    fn index_mut(&mut self, idx: usize) -> &mut bool { &mut self.0[idx] }
}

/// Iterate over the 2-bit symbols of a byte source, MSB to LSB.
pub type Dibits<T> = SubByteIter<DibitParams, T>;

/// Groups dibits into full bytes. The source must be a multiple of 4 dibits.
pub type DibitBytes<T> = SubByteIter<DibitByteParams, T>;

pub trait IterParams {
    /// Type to consume when buffering.
    type Input;
    /// Type to yield at each iteration.
    type Output;

    /// Number of bits to consume at each iteration.
    fn bits() -> usize;

    /// Number of input symbols to consume when buffering.
    fn buffer() -> usize;

    /// Amount to shift buffer after loading an input symbol.
    fn shift() -> usize;

    /// Amount to shift buffer after all buffering.
    fn post_shift() -> usize { 32 - Self::shift() * Self::buffer() }

    /// Number of iterations before buffering.
    fn iterations() -> usize { Self::shift() * Self::buffer() / Self::bits() }

    /// Convert input symbol to a byte.
    fn to_byte(input: Self::Input) -> u8;

    /// Convert bits to output type.
    fn to_output(bits: u8) -> Self::Output;

    /// Verify the parameters are supported.
    fn validate() {
        // Maximum buffer size is currently 32 bits.
        assert!(Self::buffer() * Self::shift() <= 32);
    }
}

/// Two bits.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Dibit(u8);

impl Dibit {
    /// Construct a new `Dibit` with the two given bits in the LSB position.
    pub fn new(bits: u8) -> Dibit {
        assert!(bits >> 2 == 0);
        Dibit(bits)
    }

    /// Get the wrapped dibit, which is guaranteed to have only 2 LSBs.
    pub fn bits(&self) -> u8 { self.0 }
    /// Get the MSB.
    pub fn hi(&self) -> u8 { self.0 >> 1 }
    /// Get the LSB.
    pub fn lo(&self) -> u8 { self.0 & 1 }
}

/// Parameters for `Dibits` iterator.
pub struct DibitParams;

impl IterParams for DibitParams {
    type Input = u8;
    type Output = Dibit;

    fn bits() -> usize { 2 }
    fn buffer() -> usize { 1 }
    fn shift() -> usize { 8 }

    fn to_byte(input: Self::Input) -> u8 { input }
    fn to_output(bits: u8) -> Dibit { Dibit::new(bits) }
}

/// Parameters for `DibitBytes` iterator.
pub struct DibitByteParams;

impl IterParams for DibitByteParams {
    type Input = Dibit;
    type Output = u8;

    fn bits() -> usize { 8 }
    fn buffer() -> usize { 4 }
    fn shift() -> usize { 2 }

    fn to_byte(input: Self::Input) -> u8 { input.bits() }
    fn to_output(bits: u8) -> Self::Output { bits }
}

/// An iterator for sub-byte (bit-level) values.
pub struct SubByteIter<P, T> where
    P: IterParams, T: Iterator<Item = P::Input>
{
    params: std::marker::PhantomData<P>,
    /// Source of symbols.
    src: T,
    /// Current buffered bits.
    buf: u32,
    /// Current bit-level index into the current byte.
    idx: u8,
}

impl<P, T> SubByteIter<P, T> where
    P: IterParams, T: Iterator<Item = P::Input>
{
    /// Construct a new `SubByteIter` over the given symbol source.
    pub fn new(src: T) -> SubByteIter<P, T> {
        SubByteIter {
            params: std::marker::PhantomData,
            src,
            buf: 0,
            idx: 0,
        }
    }

    /// Consume one or more symbols to create a buffer of bits, filled starting from the
    /// MSB.
    fn buffer(&mut self) -> Option<u32> {
        let (buf, added) = (&mut self.src)
            .take(P::buffer())
            .fold((0, 0), |(buf, added), next| {
                (buf << P::shift() | P::to_byte(next) as u32, added + 1)
            });

        // It's okay if there are no more source symbols here, because we're on a safe
        // boundary.
        if added == 0 {
            return None;
        }

        assert!(added == P::buffer(), "incomplete source");

        Some(buf << P::post_shift())
    }
}

impl<P, T> Iterator for SubByteIter<P, T> where
    P: IterParams, T: Iterator<Item = P::Input>
{
    type Item = P::Output;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx == 0 {
            self.buf = self.buffer()?;
        }

        // Extract MSBs.
        let bits = self.buf >> (32 - P::bits());

        // Strip off the MSBs for the next iteration.
        self.buf <<= P::bits();

        // Move to the next item and reset after all have been visited.
        self.idx += 1;
        self.idx %= P::iterations() as u8;

        Some(P::to_output(bits as u8))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate_params() {
        DibitParams::validate();
        DibitByteParams::validate();
    }

    #[test]
    fn test_byte_bits() {
        let mut bits = [false; 8];
        byte_to_bits_be(0b10010110, &mut bits);
        assert_eq!(bits, [true, false, false, true, false, true, true, false]);
        assert_eq!(bits_to_byte_be(&bits), 0b10010110);
    }

    #[test]
    fn test_plane() {
        let mut p = BitPlane::<24>::from_bytes(&[0xDE, 0xAD, 0xBE]);

        assert_eq!(p.len(), 24);
        assert!(p[0]);
        assert!(p[1]);
        assert!(!p[2]);
        assert_eq!(p.byte_at(8), 0xAD);
        assert_eq!(p.byte_at(4), 0xEA);

        p.load_byte(4, 0x00);
        let mut out = [0; 3];
        p.write_bytes(&mut out);
        assert_eq!(out, [0xD0, 0x0D, 0xBE]);

        p.clear();
        assert!(p.as_slice().iter().all(|&b| !b));
    }

    #[test]
    fn test_plane_partial() {
        let p = BitPlane::<12>::from_bytes(&[0xFF, 0xFF]);
        assert!(p.as_slice()[..8].iter().all(|&b| b));
        assert!(p.as_slice()[8..].iter().all(|&b| !b));
    }

    #[test]
    fn test_dibits() {
        let bytes = [
            0b00110011,
            0b10011001,
            0b11111111,
        ];

        let mut d = Dibits::new(bytes.iter().cloned());

        assert_eq!(d.next().unwrap().bits(), 0b00);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert_eq!(d.next().unwrap().bits(), 0b00);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert_eq!(d.next().unwrap().bits(), 0b10);
        assert_eq!(d.next().unwrap().bits(), 0b01);
        assert_eq!(d.next().unwrap().bits(), 0b10);
        assert_eq!(d.next().unwrap().bits(), 0b01);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert_eq!(d.next().unwrap().bits(), 0b11);
        assert!(d.next().is_none());
    }

    #[test]
    fn test_dibit_bytes() {
        let dibits = [
            Dibit::new(0b00),
            Dibit::new(0b11),
            Dibit::new(0b00),
            Dibit::new(0b11),
            Dibit::new(0b10),
            Dibit::new(0b01),
            Dibit::new(0b10),
            Dibit::new(0b01),
        ];

        let mut d = DibitBytes::new(dibits.iter().cloned());

        assert_eq!(d.next().unwrap(), 0b00110011);
        assert_eq!(d.next().unwrap(), 0b10011001);
        assert!(d.next().is_none());
    }

    #[test]
    #[should_panic]
    fn test_dibit_bytes_panic() {
        let dibits = [
            Dibit::new(0b00),
            Dibit::new(0b11),
            Dibit::new(0b00),
            Dibit::new(0b11),
            Dibit::new(0b10),
        ];

        let mut d = DibitBytes::new(dibits.iter().cloned());

        d.next();
        d.next();
    }
}
