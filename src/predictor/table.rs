//! Types for implementing a table of predictors.

use crate::predictor::counter::*;

/// Interface to a table of predictors.
pub trait PredictorTable {
    /// The type of input to the table used to form an index.
    type Input<'a>;

    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Given some input, return the corresponding index into the table.
    fn get_index(&self, input: Self::Input<'_>) -> usize;

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        debug_assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// Interface to a *tagged* table of predictors.
pub trait TaggedPredictorTable: PredictorTable {
    fn get_tag(&self, input: Self::Input<'_>) -> u32;
}

/// A power-of-two table of [`SaturatingCounter`].
///
/// The input is some already-hashed value: only the low bits are used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternTable<S: CounterState = Direction> {
    /// Table of counters
    data: Vec<SaturatingCounter<S>>,

    /// Number of index bits
    index_bits: usize,
}
impl<S: CounterState> PatternTable<S> {
    /// Create a table with 2^'index_bits' entries in the default state.
    pub fn new(index_bits: usize) -> Self {
        Self {
            data: vec![SaturatingCounter::default(); 1 << index_bits],
            index_bits,
        }
    }

    pub fn index_bits(&self) -> usize { self.index_bits }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        SaturatingCounter::<S>::storage_bits() * self.data.len()
    }
}

impl<S: CounterState> PredictorTable for PatternTable<S> {
    type Input<'a> = usize;
    type Entry = SaturatingCounter<S>;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: usize) -> usize {
        input & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter<S> {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter<S> {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
