//! Helpers for collecting statistics.

use std::collections::*;
use itertools::*;

use crate::Outcome;

/// Container for recording simple statistics while evaluating a predictor.
#[derive(Clone, Debug, Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by program counter value).
    pub data: BTreeMap<u32, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of branches
    pub global_brns: usize,
}
impl BranchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 {
            return 0.0;
        }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global miss rate.
    pub fn miss_rate(&self) -> f64 {
        if self.global_brns == 0 {
            return 0.0;
        }
        1.0 - self.hit_rate()
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Record a prediction for the branch at 'pc' and its resolved outcome.
    pub fn update(&mut self, pc: u32, predicted: Outcome, outcome: Outcome) {
        let hit = predicted == outcome;
        self.global_brns += 1;
        if hit { self.global_hits += 1; }

        let data = self.data.entry(pc).or_default();
        data.occ += 1;
        if outcome.is_taken() { data.taken += 1; }
        if hit { data.hits += 1; }
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, pc: u32) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    /// Returns the number of unique observed branches.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns up to 'n' of the most frequent branches that were predicted
    /// correctly no more than half of the time.
    pub fn get_low_rate_branches(&self, n: usize) -> Vec<(u32, &BranchData)> {
        self.data.iter()
            .filter(|(_, s)| s.occ > 100 && s.hit_rate() <= 0.5)
            .sorted_by(|x, y| x.1.occ.cmp(&y.1.occ))
            .rev()
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

/// Container for per-branch statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Number of times this branch was taken.
    pub taken: usize,
}
impl BranchData {
    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        if self.occ == 0 {
            return 0.0;
        }
        self.hits as f64 / self.occ as f64
    }
}
