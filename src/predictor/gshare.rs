//! Implementation of a "gshare" predictor.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Output from [`GsharePredictor::predict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GsharePrediction {
    /// Index of the counter used to make this prediction
    pub idx: usize,

    /// Predicted direction
    pub outcome: Outcome,
}
impl Prediction for GsharePrediction {
    fn outcome(&self) -> Outcome { self.outcome }
}

/// A single table of counters indexed by the program counter XOR'ed with
/// global history.
///
/// See "Combining Branch Predictors" (McFarling, 1993).
#[derive(Clone, Debug)]
pub struct GsharePredictor {
    /// Global history register
    ghr: HistoryRegister,

    /// Pattern history table
    pht: PatternTable,
}
impl GsharePredictor {
    /// Create a predictor using 'history_bits' bits of global history.
    /// The table has 2^'history_bits' entries.
    pub fn new(history_bits: usize) -> Self {
        Self {
            ghr: HistoryRegister::new(history_bits),
            pht: PatternTable::new(history_bits),
        }
    }

    pub fn history_bits(&self) -> usize { self.ghr.len() }
    pub fn history(&self) -> &HistoryRegister { &self.ghr }
    pub fn table(&self) -> &PatternTable { &self.pht }

    fn get_index(&self, pc: u32) -> usize {
        let ghist_bits = self.ghr.low_bits(self.history_bits());
        self.pht.get_index(ghist_bits ^ pc as usize)
    }
}

impl BranchPredictor for GsharePredictor {
    type Prediction = GsharePrediction;

    fn name(&self) -> &'static str { "Gshare" }

    fn predict(&self, pc: u32) -> GsharePrediction {
        let idx = self.get_index(pc);
        GsharePrediction {
            idx,
            outcome: self.pht.get_entry(idx).predict(),
        }
    }

    fn update(&mut self, _pc: u32, prediction: GsharePrediction, outcome: Outcome) {
        self.ghr.push(outcome);
        self.pht.get_entry_mut(prediction.idx).update(outcome);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(p: &mut GsharePredictor, pc: u32, outcome: Outcome) -> GsharePrediction {
        let prediction = p.predict(pc);
        p.update(pc, prediction, outcome);
        prediction
    }

    #[test]
    fn hand_traced_two_bit_history() {
        use Outcome::*;
        let mut p = GsharePredictor::new(2);

        // (index used, predicted outcome) for each branch.
        // pc 0x4 contributes nothing to a 2-bit index, so the index is
        // just the history before each branch: 00, 01, 11, 11, 10.
        let expect = [(0b00, N), (0b01, N), (0b11, N), (0b11, T), (0b10, N)];
        let outcomes = [T, T, T, N, T];
        for (outcome, (idx, predicted)) in outcomes.iter().zip(expect) {
            let prediction = run(&mut p, 0x4, *outcome);
            assert_eq!(prediction.idx, idx);
            assert_eq!(prediction.outcome, predicted);
        }

        let states: Vec<Direction> = (0..4)
            .map(|i| p.table().get_entry(i).state())
            .collect();
        assert_eq!(states, vec![
            Direction::WeakTaken,
            Direction::WeakTaken,
            Direction::WeakTaken,
            Direction::WeakNotTaken,
        ]);
        assert_eq!(p.history().low_bits(2), 0b01);
        assert_eq!(p.predict(0x4), GsharePrediction { idx: 0b01, outcome: T });
    }

    #[test]
    fn repeated_counter_reaches_strong_state() {
        // With one bit of history and an always-taken branch, the same
        // entry is used every time after the first branch.
        let mut p = GsharePredictor::new(1);
        run(&mut p, 0, Outcome::T);
        run(&mut p, 0, Outcome::T);
        assert_eq!(p.table().get_entry(1).state(), Direction::WeakTaken);
        run(&mut p, 0, Outcome::T);
        assert_eq!(p.table().get_entry(1).state(), Direction::StrongTaken);
    }

    #[test]
    fn converges_on_a_biased_branch() {
        for outcome in [Outcome::T, Outcome::N] {
            let mut p = GsharePredictor::new(10);
            for _ in 0..32 {
                run(&mut p, 0x4000_1234, outcome);
            }
            for _ in 0..32 {
                assert_eq!(run(&mut p, 0x4000_1234, outcome).outcome, outcome);
            }
        }
    }

    #[test]
    fn zero_history_bits_uses_one_counter() {
        let mut p = GsharePredictor::new(0);
        for pc in [0, 1, 2, 0xffff_ffff] {
            assert_eq!(run(&mut p, pc, Outcome::T).idx, 0);
        }
        assert!(p.predict(0x1234).outcome.is_taken());
    }

    #[test]
    fn deterministic_across_instances() {
        let mut a = GsharePredictor::new(6);
        let mut b = GsharePredictor::new(6);
        let mut x: u32 = 0x1234_5678;
        for _ in 0..2000 {
            // xorshift
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            let pc = (x & 0x3c) | 0x1000;
            let outcome = Outcome::from_bool(x & 0x100 != 0);
            assert_eq!(run(&mut a, pc, outcome), run(&mut b, pc, outcome));
        }
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn predict_is_idempotent() {
        let mut p = GsharePredictor::new(4);
        run(&mut p, 0x10, Outcome::T);
        let first = p.predict(0x10);
        let second = p.predict(0x10);
        assert_eq!(first, second);
        assert_eq!(p.history().low_bits(4), 0b1);
    }
}
