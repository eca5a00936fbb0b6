//! Branch history registers.

use bitvec::prelude::*;
use crate::Outcome;

/// A shift register recording the most recent branch outcomes.
///
/// The newest outcome is always found at bit 0. Consumers only ever read
/// some number of the low-order bits, so a single register can serve
/// consumers with different effective history lengths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl HistoryRegister {
    /// Shift the register by 'n' bits.
    /// The bottom 'n' bits become zero, and the top 'n' bits are discarded.
    pub fn shift_by(&mut self, n: usize) {
        if self.len == 0 {
            return;
        }
        self.data.shift_right(n.min(self.len));
    }

    /// Shift a new outcome into the bottom of the register.
    pub fn push(&mut self, outcome: Outcome) {
        if self.len == 0 {
            return;
        }
        self.shift_by(1);
        self.data.set(0, outcome.into());
    }

    /// Return the 'n' most recent outcomes packed into an integer
    /// (the newest outcome in bit 0).
    pub fn low_bits(&self, n: usize) -> usize {
        let n = n.min(self.len).min(usize::BITS as usize);
        if n == 0 {
            return 0;
        }
        self.data[..n].load_le::<usize>()
    }

    /// Fold [by addition] the 'len' most recent bits into chunks of
    /// 'chunk_bits', returning the (unmasked) sum of all chunks.
    ///
    /// Every bit in the range contributes: when 'len' is not a multiple of
    /// 'chunk_bits', the last chunk is simply shorter.
    pub fn fold_sum(&self, len: usize, chunk_bits: usize) -> usize {
        let len = len.min(self.len);
        if len == 0 || chunk_bits == 0 {
            return 0;
        }
        let chunk_bits = chunk_bits.min(usize::BITS as usize);
        self.data[..len].chunks(chunk_bits)
            .fold(0usize, |res, x| res.wrapping_add(x.load_le::<usize>()))
    }
}

/// A table of per-branch ("local") history registers.
///
/// All histories have the same width and are packed back-to-back into a
/// single bit vector.
#[derive(Clone, Debug)]
pub struct LocalHistoryTable {
    data: BitVec<usize, Lsb0>,
    /// Number of histories
    size: usize,
    /// Width of each history [in bits]
    width: usize,
}
impl LocalHistoryTable {
    pub fn new(size: usize, width: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; size * width],
            size,
            width,
        }
    }

    pub fn size(&self) -> usize { self.size }
    pub fn width(&self) -> usize { self.width }

    fn slot(&self, idx: usize) -> &BitSlice<usize, Lsb0> {
        let base = idx * self.width;
        &self.data[base..base + self.width]
    }

    /// Read the history for the slot 'idx'.
    pub fn read(&self, idx: usize) -> usize {
        if self.width == 0 {
            return 0;
        }
        self.slot(idx).load_le::<usize>()
    }

    /// Shift a new outcome into the history for the slot 'idx'.
    pub fn push(&mut self, idx: usize, outcome: Outcome) {
        if self.width == 0 {
            return;
        }
        let base = idx * self.width;
        let slot = &mut self.data[base..base + self.width];
        slot.shift_right(1);
        slot.set(0, outcome.into());
    }
}
