//! Interleaving and deinterleaving of the 98 coded dibits of a trunking signalling block.
//!
//! Dibits are moved in pairs. The 49 pairs are read out in four sweeps, taking every
//! fourth pair starting from pair 0, 1, 2, then 3.

use crate::bits::Dibit;
use crate::data::coder::CODING_DIBITS;

/// Number of dibit pairs in a coded block.
const PAIRS: usize = CODING_DIBITS / 2;

/// First transmitted pair of each sweep.
const SWEEPS: [usize; 4] = [0, 13, 25, 37];

/// Map a transmitted dibit index to its index in the coded block.
fn interleave_idx(idx: usize) -> usize {
    let pair = idx / 2;
    let sweep = SWEEPS.iter().rposition(|&start| pair >= start).unwrap_or(0);

    (4 * (pair - SWEEPS[sweep]) + sweep) * 2 + idx % 2
}

/// Map a coded block dibit index to its transmitted index.
fn deinterleave_idx(idx: usize) -> usize {
    let pair = idx / 2;

    (SWEEPS[pair % 4] + pair / 4) * 2 + idx % 2
}

/// Takes ownership of a coded dibit buffer, yielding dibits in transmitted order.
pub struct Interleaver {
    /// Wrapped buffer.
    dibits: [Dibit; CODING_DIBITS],
    /// Current transmitted index.
    pos: usize,
}

impl Interleaver {
    /// Construct a new `Interleaver` over the given buffer.
    pub fn new(dibits: [Dibit; CODING_DIBITS]) -> Interleaver {
        Interleaver { dibits, pos: 0 }
    }
}

impl Iterator for Interleaver {
    type Item = Dibit;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == CODING_DIBITS {
            return None;
        }

        let dibit = self.dibits[interleave_idx(self.pos)];
        self.pos += 1;

        Some(dibit)
    }
}

/// Yields the dibits of a received buffer in coded order.
pub struct Deinterleaver<'a> {
    dibits: &'a [Dibit; CODING_DIBITS],
    pos: usize,
}

impl<'a> Deinterleaver<'a> {
    pub fn new(dibits: &'a [Dibit; CODING_DIBITS]) -> Deinterleaver<'a> {
        Deinterleaver { dibits, pos: 0 }
    }
}

impl<'a> Iterator for Deinterleaver<'a> {
    type Item = Dibit;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == CODING_DIBITS {
            return None;
        }

        let dibit = self.dibits[deinterleave_idx(self.pos)];
        self.pos += 1;

        Some(dibit)
    }
}
