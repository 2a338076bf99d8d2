//! Encoding and decoding of the half-rate "trellis" convolutional code that protects P25
//! trunking signalling blocks. Encoding is done with a 4-state machine and decoding is
//! done with a truncated Viterbi search.

use std::ops::{Deref, DerefMut};

use collect_slice::CollectSlice;

use crate::bits::Dibit;

use self::Decision::*;

/// Number of states in the trellis.
const STATES: usize = 4;

/// Length of the path history kept for each state. This also sets the delay before the
/// first decoded dibit is yielded.
const HISTORY: usize = 4;

/// Constellation point index on each transition, indexed by `[current][next]` state.
const TRANSITIONS: [[usize; STATES]; STATES] = [
    [0, 15, 12, 3],
    [4, 11, 8, 7],
    [13, 2, 1, 14],
    [9, 6, 5, 10],
];

/// Dibit pair transmitted for each constellation point.
const POINTS: [(u8, u8); 16] = [
    (0b00, 0b10),
    (0b10, 0b10),
    (0b01, 0b11),
    (0b11, 0b11),
    (0b11, 0b10),
    (0b01, 0b10),
    (0b10, 0b11),
    (0b00, 0b11),
    (0b11, 0b01),
    (0b01, 0b01),
    (0b10, 0b00),
    (0b00, 0b00),
    (0b00, 0b01),
    (0b10, 0b01),
    (0b01, 0b00),
    (0b11, 0b00),
];

/// Get the dibit pair on the transition from the current state to the next state.
fn pair(cur: usize, next: usize) -> (Dibit, Dibit) {
    let (hi, lo) = POINTS[TRANSITIONS[cur][next]];
    (Dibit::new(hi), Dibit::new(lo))
}

/// Half-rate convolutional code state machine. Each fed-in dibit becomes the next state.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrellisEncoder {
    /// Current state.
    state: usize,
}

impl TrellisEncoder {
    /// Construct a new `TrellisEncoder` at the initial state.
    pub fn new() -> Self { Self::default() }

    /// Apply the given dibit to the state machine and return the dibit pair on the
    /// transition.
    pub fn feed(&mut self, input: Dibit) -> (Dibit, Dibit) {
        let next = input.bits() as usize;
        let out = pair(self.state, next);

        self.state = next;

        out
    }

    /// Flush the state machine back to the initial state and return the final
    /// transition.
    pub fn finish(&mut self) -> (Dibit, Dibit) {
        self.feed(Dibit::new(0b00))
    }
}

/// Decodes a received half-rate dibit stream to a nearby codeword using the truncated
/// Viterbi algorithm. Each yielded item is the decoded dibit, or `Err(())` if the path
/// choice was ambiguous.
pub struct ViterbiDecoder<T: Iterator<Item = Dibit>> {
    /// Source of dibits.
    src: T,
    /// Walks associated with each state, for the current and previous tick.
    walks: [[Walk; STATES]; 2],
    cur: usize,
    prev: usize,
    /// Remaining symbols to yield.
    remain: usize,
}

impl<T: Iterator<Item = Dibit>> ViterbiDecoder<T> {
    /// Construct a new `ViterbiDecoder` over the given dibit source.
    pub fn new(src: T) -> Self {
        let mut walks = [Walk::default(); STATES];
        (0..STATES).map(Walk::new).collect_slice_checked(&mut walks[..]);

        ViterbiDecoder {
            src,
            walks: [walks; 2],
            cur: 1,
            prev: 0,
            remain: 0,
        }.prime()
    }

    fn prime(mut self) -> Self {
        for _ in 1..HISTORY {
            self.step();
        }

        self
    }

    /// Consume the next received pair and extend each state's best walk. Return `false`
    /// if the source is exhausted.
    fn step(&mut self) -> bool {
        let input = Edge::new(match (self.src.next(), self.src.next()) {
            (Some(hi), Some(lo)) => (hi, lo),
            (Some(_), None) | (None, Some(_)) => panic!("dibits ended on boundary"),
            (None, None) => return false,
        });

        self.remain += 1;
        std::mem::swap(&mut self.cur, &mut self.prev);

        for s in 0..STATES {
            let walk = self.search(s, input);
            self.walks[self.cur][s].append(walk);
        }

        true
    }

    /// Find the previous walk with minimum distance that leads into the given state.
    fn search(&self, state: usize, input: Edge) -> Walk {
        self.walks[self.prev].iter()
            .enumerate()
            .map(|(i, w)| (Edge::new(pair(i, state)), w))
            .fold(Walk::default(), |walk, (e, w)| {
                match w.distance.checked_add(input.distance(e)) {
                    Some(sum) if sum < walk.distance => walk.replace(w, sum),
                    Some(sum) if sum == walk.distance => walk.combine(w, sum),
                    _ => walk,
                }
            })
    }

    fn decide(&self) -> Decision {
        self.walks[self.cur].iter().fold(Ambiguous(usize::MAX), |s, w| {
            match s {
                Ambiguous(min) | Definite(min, _) if w.distance < min =>
                    Definite(w.distance, w[self.remain]),
                Definite(min, state) if w.distance == min && w[self.remain] != state =>
                    Ambiguous(w.distance),
                _ => s,
            }
        })
    }
}

impl<T: Iterator<Item = Dibit>> Iterator for ViterbiDecoder<T> {
    type Item = Result<Dibit, ()>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.step() && self.remain == 0 {
            return None;
        }

        self.remain -= 1;

        Some(match self.decide() {
            Ambiguous(_) | Definite(_, None) => Err(()),
            Definite(_, Some(state)) => Ok(Dibit::new(state as u8)),
        })
    }
}

/// Decoding decision.
enum Decision {
    Definite(usize, Option<usize>),
    Ambiguous(usize),
}

/// Path through the trellis ending at some state, most recent state first.
#[derive(Copy, Clone, Debug)]
struct Walk {
    history: [Option<usize>; HISTORY],
    distance: usize,
}

impl Walk {
    fn new(state: usize) -> Walk {
        let mut history = [None; HISTORY];
        history[0] = Some(state);

        Walk {
            history,
            distance: if state == 0 { 0 } else { usize::MAX },
        }
    }

    fn append(&mut self, other: Self) {
        self.distance = other.distance;
        other.iter().cloned().collect_slice(&mut self[1..]);
    }

    fn combine(mut self, other: &Self, distance: usize) -> Self {
        self.distance = distance;

        for (dest, src) in self.iter_mut().zip(other.iter()) {
            if src != dest {
                *dest = None;
            }
        }

        self
    }

    fn replace(mut self, other: &Self, distance: usize) -> Self {
        self.distance = distance;
        other.iter().cloned().collect_slice_checked(&mut self[..]);

        self
    }
}

impl Deref for Walk {
    type Target = [Option<usize>];
    fn deref(&self) -> &Self::Target { &self.history[..] }
}

impl DerefMut for Walk {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.history[..] }
}

impl Default for Walk {
    fn default() -> Self { Walk::new(usize::MAX) }
}

#[derive(Copy, Clone)]
struct Edge(u8);

impl Edge {
    fn new((hi, lo): (Dibit, Dibit)) -> Edge {
        Edge(hi.bits() << 2 | lo.bits())
    }

    fn distance(&self, other: Edge) -> usize {
        (self.0 ^ other.0).count_ones() as usize
    }
}
