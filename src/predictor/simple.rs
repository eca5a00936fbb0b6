//! Predictors without any state.

use crate::Outcome;
use crate::predictor::BranchPredictor;

/// A simple predictor with no state: always predict 'taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakenPredictor;
impl BranchPredictor for TakenPredictor {
    type Prediction = Outcome;
    fn name(&self) -> &'static str { "Static" }
    fn predict(&self, _pc: u32) -> Outcome { Outcome::T }
    fn update(&mut self, _pc: u32, _prediction: Outcome, _outcome: Outcome) {}
}
