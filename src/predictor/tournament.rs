//! Implementation of a tournament (local/global hybrid) predictor.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Output from [`TournamentPredictor::predict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentPrediction {
    /// Slot in the local history table
    pub slot: usize,

    /// Index into the local pattern table
    pub local_idx: usize,

    /// Index into the global pattern table and the selector table
    pub global_idx: usize,

    /// Predicted direction from the local predictor
    pub local: Outcome,

    /// Predicted direction from the global predictor
    pub global: Outcome,

    /// The selected direction
    pub outcome: Outcome,
}
impl Prediction for TournamentPrediction {
    fn outcome(&self) -> Outcome { self.outcome }
}

/// A local predictor and a global predictor, with a table of selectors
/// learning which one to trust.
///
/// - The local predictor keeps a history for each branch (indexed by the
///   low bits of the program counter) and uses it to index a table of
///   counters.
/// - The global predictor indexes a table of counters with global history
///   alone (the program counter is *not* mixed in).
/// - The selector table shares the global predictor's index.
///
/// See "The Alpha 21264 Microprocessor" (Kessler, 1999).
#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    /// Global history register
    ghr: HistoryRegister,

    /// Global pattern table
    global: PatternTable,

    /// Selector table
    choice: PatternTable<Choice>,

    /// Per-branch local histories
    lht: LocalHistoryTable,

    /// Local pattern table
    local: PatternTable,

    /// Number of program counter bits used to select a local history
    pc_index_bits: usize,
}
impl TournamentPredictor {
    pub fn new(ghistory_bits: usize, lhistory_bits: usize, pc_index_bits: usize)
        -> Self
    {
        Self {
            ghr: HistoryRegister::new(ghistory_bits),
            global: PatternTable::new(ghistory_bits),
            choice: PatternTable::new(ghistory_bits),
            lht: LocalHistoryTable::new(1 << pc_index_bits, lhistory_bits),
            local: PatternTable::new(lhistory_bits),
            pc_index_bits,
        }
    }

    pub fn history(&self) -> &HistoryRegister { &self.ghr }
    pub fn local_histories(&self) -> &LocalHistoryTable { &self.lht }
    pub fn choice_table(&self) -> &PatternTable<Choice> { &self.choice }
    pub fn global_table(&self) -> &PatternTable { &self.global }
    pub fn local_table(&self) -> &PatternTable { &self.local }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.global.storage_bits()
            + self.choice.storage_bits()
            + self.local.storage_bits()
            + self.lht.size() * self.lht.width()
            + self.ghr.len()
    }

    fn slot(&self, pc: u32) -> usize {
        (pc as usize) & ((1 << self.pc_index_bits) - 1)
    }
}

impl BranchPredictor for TournamentPredictor {
    type Prediction = TournamentPrediction;

    fn name(&self) -> &'static str { "Tournament" }

    fn predict(&self, pc: u32) -> TournamentPrediction {
        let slot = self.slot(pc);
        let local_idx = self.local.get_index(self.lht.read(slot));
        let local = self.local.get_entry(local_idx).predict();

        let global_idx = self.global.get_index(self.ghr.low_bits(self.ghr.len()));
        let global = self.global.get_entry(global_idx).predict();

        let outcome = if self.choice.get_entry(global_idx).prefers_global() {
            global
        } else {
            local
        };

        TournamentPrediction { slot, local_idx, global_idx, local, global, outcome }
    }

    fn update(&mut self, _pc: u32, prediction: TournamentPrediction, outcome: Outcome) {
        self.ghr.push(outcome);
        self.lht.push(prediction.slot, outcome);

        self.local.get_entry_mut(prediction.local_idx).update(outcome);
        self.global.get_entry_mut(prediction.global_idx).update(outcome);

        // Only train the selector when exactly one of the two was right
        let local_hit = prediction.local == outcome;
        let global_hit = prediction.global == outcome;
        if local_hit != global_hit {
            self.choice.get_entry_mut(prediction.global_idx).bump(local_hit);
        }
    }
}
