//! Implementation of a "TAgged GEometric history length" (TAGE) predictor.

pub mod component;
pub mod stat;
pub mod config;

pub use component::*;
pub use stat::*;
pub use config::*;

use itertools::Itertools;
use log::trace;
use rand::RngCore;
use rand::rngs::StdRng;

use crate::history::*;
use crate::Outcome;
use crate::predictor::*;

/// Identifies a particular component in a [`TagePredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TageProvider {
    /// The base component
    Base,

    /// A tagged component
    Tagged(usize),
}

/// The index and tag computed for one tagged component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TageLookup {
    pub idx: usize,
    pub tag: u32,
}

/// Container for output from [`TagePredictor::predict`], including the
/// predicted outcome and other metadata about how the prediction was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagePrediction {
    /// The component providing the prediction
    pub provider: TageProvider,

    /// A predicted direction
    pub outcome: Outcome,

    /// The index identifying the entry used to make this prediction
    pub idx: usize,

    /// Alternate component used to provide a prediction
    pub alt_provider: TageProvider,

    /// Predicted direction from the alternate component
    pub alt_outcome: Outcome,

    /// The index identifying the entry from the alternate component
    pub alt_idx: usize,

    /// Index and tag for every tagged component
    pub lookups: Vec<TageLookup>,
}
impl Prediction for TagePrediction {
    fn outcome(&self) -> Outcome { self.outcome }
}

/// Pick one of 'count' candidates using some random bits.
///
/// Bits are consumed from the least-significant end: the first candidate
/// whose bit is zero is chosen, and the last candidate is chosen if we run
/// out of candidates first. Candidate 'n' is half as likely to be chosen as
/// candidate 'n-1'.
pub fn select_position(mut bits: u32, count: usize) -> usize {
    let mut pos = 0;
    while pos + 1 < count && (bits & 1) != 0 {
        bits >>= 1;
        pos += 1;
    }
    pos
}

/// The "TAgged GEometric history length" predictor.
///
/// Tagged components are ordered by history length: component 0 uses the
/// shortest history and the last component uses the longest.
///
/// See the following:
///  - "A case for (partially) TAgged GEometric history length branch prediction"
///  (Seznec, 2006).
pub struct TagePredictor<R: RngCore = StdRng> {
    /// The configuration used to create this object
    pub cfg: TageConfig,

    pub stat: TageStats,

    /// Base component
    pub base: PatternTable,

    /// Tagged components
    pub comp: Vec<TageComponent>,

    /// Global history register
    ghr: HistoryRegister,

    /// Source of random bits for allocation
    rng: R,
}

impl<R: RngCore> TagePredictor<R> {
    /// Compute the index and tag for all tagged components.
    fn get_lookups(&self, pc: u32) -> Vec<TageLookup> {
        let input = TageInputs { pc, ghr: &self.ghr };
        self.comp.iter()
            .map(|c| TageLookup { idx: c.get_index(input), tag: c.get_tag(input) })
            .collect()
    }

    /// Given the prediction that turned out to be incorrect, try to select
    /// a tagged component that will be used to allocate a new entry.
    ///
    /// Returns [None] if we fail to allocate a new entry. When every
    /// candidate entry is still marked as useful, all of them are aged
    /// instead.
    fn select_alloc_candidate(&mut self, prediction: &TagePrediction)
        -> Option<usize>
    {
        // Only components with a longer history than the provider are
        // eligible.
        let first = match prediction.provider {
            TageProvider::Base => 0,
            TageProvider::Tagged(num) if num == self.longest_tagged_component() => {
                return None;
            },
            TageProvider::Tagged(num) => num + 1,
        };
        let range = first..self.num_tagged_components();

        let candidates = range.clone()
            .filter(|&num| {
                let idx = prediction.lookups[num].idx;
                self.comp[num].get_entry(idx).useful.is_available()
            })
            .collect_vec();

        if candidates.is_empty() {
            for num in range {
                let idx = prediction.lookups[num].idx;
                self.comp[num].get_entry_mut(idx).useful.bump(false);
            }
            self.stat.failed_alcs += 1;
            trace!("no free entries above {:?}, aging", prediction.provider);
            return None;
        }

        let pos = select_position(self.rng.next_u32(), candidates.len());
        match candidates.get(pos) {
            Some(&num) => Some(num),
            None => panic!(
                "selected allocation candidate {} of {}", pos, candidates.len()
            ),
        }
    }

    /// Update the predictor to account for a misprediction.
    fn update_incorrect(&mut self, prediction: &TagePrediction, outcome: Outcome) {
        match prediction.provider {
            TageProvider::Base => {
                self.base.get_entry_mut(prediction.idx).update(outcome);
                self.stat.base_miss += 1;
            },
            TageProvider::Tagged(num) => {
                self.comp[num].get_entry_mut(prediction.idx).ctr.update(outcome);
                self.stat.comp_miss[num] += 1;
            },
        }

        if let Some(num) = self.select_alloc_candidate(prediction) {
            let lookup = prediction.lookups[num];
            self.comp[num].get_entry_mut(lookup.idx).allocate(lookup.tag, outcome);
            self.stat.alcs += 1;
            trace!("allocated comp{}[{:#x}] (tag {:#x}) for {:?}",
                num, lookup.idx, lookup.tag, outcome
            );
        }
    }

    /// Update the predictor to account for a correct prediction.
    fn update_correct(&mut self, prediction: &TagePrediction, outcome: Outcome) {
        match prediction.provider {
            TageProvider::Base => {
                self.base.get_entry_mut(prediction.idx).update(outcome);
                self.stat.base_hits += 1;
            },
            TageProvider::Tagged(num) => {
                self.comp[num].get_entry_mut(prediction.idx).ctr.update(outcome);
                self.stat.comp_hits[num] += 1;
            },
        }
    }
}

/// The public interface to a [`TagePredictor`].
impl<R: RngCore> TagePredictor<R> {
    /// Return the number of tagged components.
    pub fn num_tagged_components(&self) -> usize {
        self.comp.len()
    }

    /// Return the index of the tagged component with the longest associated
    /// history length.
    pub fn longest_tagged_component(&self) -> usize {
        self.num_tagged_components() - 1
    }

    /// Return the global history register.
    pub fn history(&self) -> &HistoryRegister { &self.ghr }
}

impl<R: RngCore> BranchPredictor for TagePredictor<R> {
    type Prediction = TagePrediction;

    fn name(&self) -> &'static str { "TAGE" }

    /// Make a prediction for the provided program counter.
    fn predict(&self, pc: u32) -> TagePrediction {
        // The base component provides the default predicted outcome
        // for cases where we miss in all tagged components
        let base_idx = self.base.get_index(pc as usize);
        let default_outcome = self.base.get_entry(base_idx).predict();
        let mut result = TagePrediction {
            provider: TageProvider::Base,
            outcome: default_outcome,
            idx: base_idx,
            alt_provider: TageProvider::Base,
            alt_outcome: default_outcome,
            alt_idx: base_idx,
            lookups: Vec::new(),
        };

        // Components go from the shortest to the longest history, so the
        // last hit is the provider and the hit before it is the alternate.
        let lookups = self.get_lookups(pc);
        for (num, lookup) in lookups.iter().enumerate() {
            let entry = self.comp[num].get_entry(lookup.idx);
            if entry.tag_matches(lookup.tag) {
                result.alt_provider = result.provider;
                result.alt_outcome = result.outcome;
                result.alt_idx = result.idx;

                result.provider = TageProvider::Tagged(num);
                result.outcome = entry.predict();
                result.idx = lookup.idx;
            }
        }
        result.lookups = lookups;
        result
    }

    /// Given a particular prediction and the resolved outcome, update the
    /// state of the predictor.
    fn update(&mut self, _pc: u32, prediction: TagePrediction, outcome: Outcome) {
        // When the alternate disagreed with the provider, the alternate is
        // more useful if the provider was wrong, and less useful otherwise.
        if let TageProvider::Tagged(alt) = prediction.alt_provider {
            if prediction.alt_outcome != prediction.outcome {
                let entry = self.comp[alt].get_entry_mut(prediction.alt_idx);
                entry.useful.bump(prediction.outcome == outcome);
            }
        }

        if prediction.outcome != outcome {
            self.update_incorrect(&prediction, outcome);
        } else {
            self.update_correct(&prediction, outcome);
        }

        // Allocation uses indices computed with the old history, so this
        // must happen last.
        self.ghr.push(outcome);
        self.stat.clk += 1;
    }

    fn stats(&self) -> Option<&dyn std::fmt::Display> { Some(&self.stat) }
}
