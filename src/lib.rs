//! A branch direction prediction engine.
//!
//! Predictors are driven one branch at a time: ask for a prediction with
//! the program counter, then train with the resolved outcome.

pub mod branch;
pub mod history;
pub mod predictor;
pub mod config;
pub mod engine;
pub mod error;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use history::*;
pub use predictor::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use stats::*;
pub use trace::*;
