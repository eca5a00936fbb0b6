//! Implementations of different branch predictors.

pub mod table;
pub mod simple;
pub mod tage;
pub mod gshare;
pub mod tournament;
pub mod counter;

pub use table::*;
pub use simple::*;
pub use counter::*;
pub use gshare::*;
pub use tournament::*;
pub use tage::*;

use crate::Outcome;

/// Output from [`BranchPredictor::predict`].
///
/// Implementors carry whatever was derived while making the prediction
/// (indices, tags, sub-predictions) so that the matching update doesn't
/// have to recompute it.
pub trait Prediction: Clone + std::fmt::Debug {
    /// The predicted direction.
    fn outcome(&self) -> Outcome;
}

impl Prediction for Outcome {
    fn outcome(&self) -> Outcome { *self }
}

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
///
/// A prediction is a pure read of the predictor state. The caller is
/// expected to pass the prediction back along with the resolved outcome
/// before asking for the next prediction.
pub trait BranchPredictor {
    type Prediction: Prediction;

    fn name(&self) -> &'static str;

    /// Make a prediction for the branch at 'pc'.
    fn predict(&self, pc: u32) -> Self::Prediction;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, pc: u32, prediction: Self::Prediction, outcome: Outcome);

    /// Runtime statistics collected by the predictor (if any).
    fn stats(&self) -> Option<&dyn std::fmt::Display> { None }
}
