//! The prediction engine: one predictor, selected once from configuration,
//! behind a `predict`/`train` interface.

use log::debug;

use crate::Outcome;
use crate::config::*;
use crate::error::ConfigError;
use crate::predictor::*;

/// Object-safe interface to a predictor that remembers its last prediction.
pub trait DirectionPredictor {
    fn name(&self) -> &'static str;

    /// Predict the direction of the branch at 'pc'.
    fn predict(&mut self, pc: u32) -> Outcome;

    /// Train with the resolved outcome of the branch at 'pc'.
    fn train(&mut self, pc: u32, outcome: Outcome);

    fn stats(&self) -> Option<&dyn std::fmt::Display>;
}

/// Wraps a [`BranchPredictor`] and keeps the most recent prediction so that
/// the following [`DirectionPredictor::train`] can reuse it.
pub struct Cached<P: BranchPredictor> {
    inner: P,
    last: Option<(u32, P::Prediction)>,
}
impl<P: BranchPredictor> Cached<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, last: None }
    }
}

impl<P: BranchPredictor> DirectionPredictor for Cached<P> {
    fn name(&self) -> &'static str { self.inner.name() }

    fn predict(&mut self, pc: u32) -> Outcome {
        let prediction = self.inner.predict(pc);
        let outcome = prediction.outcome();
        self.last = Some((pc, prediction));
        outcome
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        // Without a matching prediction, make one from the current state
        let prediction = match self.last.take() {
            Some((last_pc, prediction)) if last_pc == pc => prediction,
            _ => self.inner.predict(pc),
        };
        self.inner.update(pc, prediction, outcome);
    }

    fn stats(&self) -> Option<&dyn std::fmt::Display> { self.inner.stats() }
}

/// A branch direction prediction engine.
///
/// Callers are expected to alternate between [`Engine::predict`] and
/// [`Engine::train`] for each branch, in program order.
pub struct Engine {
    inner: Box<dyn DirectionPredictor>,
}
impl Engine {
    /// Validate the configuration and build the selected predictor.
    pub fn new(cfg: &EngineConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let inner: Box<dyn DirectionPredictor> = match cfg.kind {
            PredictorKind::Static => {
                Box::new(Cached::new(TakenPredictor))
            },
            PredictorKind::Gshare => {
                let p = GsharePredictor::new(cfg.ghistory_bits);
                debug!("gshare: {} history bits, {} storage bits",
                    p.history_bits(), p.table().storage_bits() + p.history_bits()
                );
                Box::new(Cached::new(p))
            },
            PredictorKind::Tournament => {
                let p = TournamentPredictor::new(
                    cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits
                );
                debug!("tournament: {}/{}/{} bits, {} storage bits",
                    cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits,
                    p.storage_bits()
                );
                Box::new(Cached::new(p))
            },
            PredictorKind::Tage => {
                let p = cfg.tage.build()?;
                debug!("tage: history lengths {:?}, {} storage bits",
                    cfg.tage.history_lengths(), cfg.tage.storage_bits()
                );
                Box::new(Cached::new(p))
            },
        };
        Ok(Self { inner })
    }

    /// Use some already-built predictor.
    pub fn from_predictor<P: BranchPredictor + 'static>(p: P) -> Self {
        Self { inner: Box::new(Cached::new(p)) }
    }

    pub fn name(&self) -> &'static str { self.inner.name() }

    /// Predict whether the branch at 'pc' is taken.
    ///
    /// This doesn't change the state of the predictor: predicting the same
    /// branch twice gives the same answer.
    pub fn predict(&mut self, pc: u32) -> bool {
        self.inner.predict(pc).is_taken()
    }

    /// Train the predictor with the resolved direction of the branch at 'pc'.
    pub fn train(&mut self, pc: u32, taken: bool) {
        self.inner.train(pc, Outcome::from_bool(taken))
    }

    /// Runtime statistics kept by the predictor (if any).
    pub fn stats(&self) -> Option<&dyn std::fmt::Display> {
        self.inner.stats()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn engine(s: &str) -> Engine {
        Engine::new(&s.parse().unwrap()).unwrap()
    }

    #[test]
    fn gshare_hand_trace() {
        let mut e = engine("gshare:2");
        let mut predictions = Vec::new();
        for taken in [true, true, true, false, true] {
            predictions.push(e.predict(0x4));
            e.train(0x4, taken);
        }
        assert_eq!(predictions, vec![false, false, false, true, false]);
        // History is now 0b01, which selects a counter trained by the
        // second branch.
        assert!(e.predict(0x4));
    }

    #[test]
    fn gshare_is_deterministic() {
        let mut a = engine("gshare:8");
        let mut b = engine("gshare:8");
        for i in 0u32..2000 {
            let pc = 0x1000 + 4 * (i % 7);
            let taken = (i * 7 + i / 3) % 5 < 2;
            assert_eq!(a.predict(pc), b.predict(pc));
            a.train(pc, taken);
            b.train(pc, taken);
        }
    }

    #[test]
    fn gshare_converges() {
        let mut e = engine("gshare:6");
        for _ in 0..16 {
            e.predict(0x40);
            e.train(0x40, true);
        }
        for _ in 0..16 {
            assert!(e.predict(0x40));
            e.train(0x40, true);
        }
    }

    #[test]
    fn predict_does_not_change_state() {
        for s in ["static", "gshare:4", "tournament:4:4:4", "tage"] {
            let mut e = engine(s);
            for i in 0u32..100 {
                let pc = 0x80 + 4 * (i % 3);
                e.predict(pc);
                e.train(pc, i % 3 != 1);
            }
            for pc in [0x80, 0x84, 0x88] {
                assert_eq!(e.predict(pc), e.predict(pc), "{}", s);
            }
        }
    }

    #[test]
    fn train_without_a_matching_prediction() {
        // Nothing cached: the counter at index 0 is trained
        let mut e = engine("gshare:2");
        e.train(0x0, true);
        assert!(e.predict(0x1));

        // A prediction for some other branch is ignored
        let mut e = engine("gshare:2");
        e.predict(0x4);
        e.train(0x5, true);
        assert!(e.predict(0x0));
    }

    #[test]
    fn static_predicts_taken() {
        let mut e = engine("static");
        assert_eq!(e.name(), "Static");
        for _ in 0..4 {
            assert!(e.predict(0x1234));
            e.train(0x1234, false);
        }
        assert!(e.stats().is_none());
    }

    #[test]
    fn rejects_bad_configurations() {
        let cfg: EngineConfig = "tournament:4:4:0".parse().unwrap();
        assert!(matches!(Engine::new(&cfg), Err(ConfigError::TableTooSmall { .. })));

        let cfg: EngineConfig = "gshare:40".parse().unwrap();
        assert!(matches!(Engine::new(&cfg), Err(ConfigError::TableTooLarge { .. })));

        let mut cfg: EngineConfig = "tage".parse().unwrap();
        cfg.tage.history_bits = 16;
        assert!(matches!(Engine::new(&cfg), Err(ConfigError::HistoryTooLong { .. })));
    }

    #[test]
    fn tage_reports_stats() {
        let mut e = engine("tage");
        assert_eq!(e.name(), "TAGE");
        for i in 0..10 {
            e.predict(0x100);
            e.train(0x100, i % 2 == 0);
        }
        let report = e.stats().map(|s| s.to_string()).unwrap_or_default();
        assert!(report.contains("TAGE allocations"));
        assert!(report.contains("Component[2]"));
    }

    #[test]
    fn wraps_any_predictor() {
        let tage = TageConfig { seed: 7, ..TageConfig::default() }.build().unwrap();
        let mut e = Engine::from_predictor(tage);
        assert!(!e.predict(0x10));
        e.train(0x10, true);
        assert_eq!(e.name(), "TAGE");
    }
}
