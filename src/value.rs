//! Packing and unpacking of ordered bitfields within a single unsigned signalling value.
//!
//! Fields are laid out most significant first: each written field shifts everything
//! before it to the left. Standard blocks carry a `u64` value and alternate multi-block
//! messages carry a `u128`.

use num::PrimInt;
use num::traits::AsPrimitive;

/// Unsigned integer that can hold a signalling value.
pub trait SignallingValue: PrimInt + From<u64> + AsPrimitive<u64> {
    /// Number of bits in the value.
    fn capacity() -> usize { Self::zero().count_zeros() as usize }
}

impl SignallingValue for u64 {}
impl SignallingValue for u128 {}

/// Builds a signalling value by appending fields MSB first.
///
/// Widths are fixed by each message layout, so a field that doesn't fit its width or a
/// layout that overflows the value is a programming error and panics.
#[derive(Copy, Clone, Debug)]
pub struct FieldWriter<T: SignallingValue> {
    value: T,
    used: usize,
}

impl<T: SignallingValue> FieldWriter<T> {
    /// Construct a new `FieldWriter` with no fields.
    pub fn new() -> Self {
        FieldWriter {
            value: T::zero(),
            used: 0,
        }
    }

    /// Append the given field with the given width in bits.
    pub fn field<F: Into<u64>>(mut self, width: usize, field: F) -> Self {
        let field = field.into();

        assert!(width > 0 && width <= 64);
        assert!(width == 64 || field >> width == 0, "field overflows {} bits", width);
        assert!(self.used + width <= T::capacity(), "layout overflows value");

        self.value = if self.used == 0 {
            <T as From<u64>>::from(field)
        } else {
            self.value << width | <T as From<u64>>::from(field)
        };
        self.used += width;

        self
    }

    /// Append a single bit.
    pub fn flag(self, bit: bool) -> Self { self.field(1, bit as u64) }

    /// Append the given number of zero bits.
    pub fn reserved(mut self, width: usize) -> Self {
        let mut remain = width;

        while remain > 0 {
            let w = remain.min(64);
            self = self.field(w, 0u64);
            remain -= w;
        }

        self
    }

    /// Number of bits written so far.
    pub fn used(&self) -> usize { self.used }

    /// Finish the value, left-aligning the written fields if they don't fill it.
    pub fn finish(self) -> T {
        if self.used == 0 {
            T::zero()
        } else {
            self.value << (T::capacity() - self.used)
        }
    }
}

impl<T: SignallingValue> Default for FieldWriter<T> {
    fn default() -> Self { Self::new() }
}

/// Extracts fields from a signalling value MSB first, in the same order they were
/// written.
#[derive(Copy, Clone, Debug)]
pub struct FieldReader<T: SignallingValue> {
    value: T,
    pos: usize,
}

impl<T: SignallingValue> FieldReader<T> {
    /// Construct a new `FieldReader` at the MSB of the given value.
    pub fn new(value: T) -> Self {
        FieldReader { value, pos: 0 }
    }

    /// Extract the next field of the given width.
    pub fn field(&mut self, width: usize) -> u64 {
        assert!(width > 0 && width <= 64);
        assert!(self.pos + width <= T::capacity(), "layout overflows value");

        let shift = T::capacity() - self.pos - width;
        let bits: u64 = (self.value >> shift).as_();

        self.pos += width;

        if width == 64 {
            bits
        } else {
            bits & ((1 << width) - 1)
        }
    }

    /// Extract the next field and narrow it to the given type, which must be wide enough
    /// for the width.
    pub fn take<F: num::NumCast>(&mut self, width: usize) -> F {
        let bits = self.field(width);

        match F::from(bits) {
            Some(f) => f,
            None => panic!("{} bit field doesn't fit target type", width),
        }
    }

    /// Extract the next single bit.
    pub fn flag(&mut self) -> bool { self.field(1) == 1 }

    /// Skip over the given number of bits.
    pub fn skip(&mut self, width: usize) -> &mut Self {
        assert!(self.pos + width <= T::capacity());
        self.pos += width;
        self
    }

    /// Number of bits consumed so far.
    pub fn pos(&self) -> usize { self.pos }
}
