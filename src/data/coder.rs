//! Provides a convenience interface for trellis coding a block into a dibit buffer.

use crate::bits::{Dibit, Dibits};
use crate::coding::trellis::TrellisEncoder;

/// Number of dibits produced by coding a 12-byte block, including the flushing pair.
pub const CODING_DIBITS: usize = 98;

/// Half-rate (dibit) convolutional coder.
pub struct DibitCoder {
    /// Convolutional state machine.
    fsm: TrellisEncoder,
    /// Current coded buffer.
    buf: [Dibit; CODING_DIBITS],
    /// Current index into `buf`.
    pos: usize,
}

impl DibitCoder {
    /// Construct a new `DibitCoder` at the initial trellis state.
    pub fn new() -> DibitCoder {
        DibitCoder {
            fsm: TrellisEncoder::new(),
            buf: [Dibit::default(); CODING_DIBITS],
            pos: 0,
        }
    }

    /// Code the given bytes as dibits.
    pub fn feed_bytes<T: Iterator<Item = u8>>(mut self, bytes: T) -> Self {
        for dibit in Dibits::new(bytes) {
            let pair = self.fsm.feed(dibit);
            self.append(pair);
        }

        self
    }

    /// Flush the state machine and return the coded buffer of dibits.
    pub fn finish(mut self) -> [Dibit; CODING_DIBITS] {
        let pair = self.fsm.finish();
        self.append(pair);

        assert!(self.pos == self.buf.len());

        self.buf
    }

    /// Append the given dibit pair to the buffer.
    fn append(&mut self, (a, b): (Dibit, Dibit)) {
        self.buf[self.pos] = a;
        self.pos += 1;
        self.buf[self.pos] = b;
        self.pos += 1;
    }
}

impl Default for DibitCoder {
    fn default() -> Self { Self::new() }
}
