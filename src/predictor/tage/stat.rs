//! Runtime statistics for the TAGE predictor.

/// Container for [`TagePredictor`](super::TagePredictor) runtime stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TageStats {
    /// History length of each tagged component
    pub history_lengths: Vec<usize>,

    /// Successful allocations
    pub alcs: usize,

    /// Failed allocations (all candidate entries were aged instead)
    pub failed_alcs: usize,

    /// Correct predictions provided by the base component
    pub base_hits: usize,

    /// Mispredictions provided by the base component
    pub base_miss: usize,

    /// Correct predictions provided by each tagged component
    pub comp_hits: Vec<usize>,

    /// Mispredictions provided by each tagged component
    pub comp_miss: Vec<usize>,

    /// Number of updates
    pub clk: usize,
}
impl TageStats {
    pub fn new(history_lengths: Vec<usize>) -> Self {
        let num_comp = history_lengths.len();
        Self {
            history_lengths,
            comp_hits: vec![0; num_comp],
            comp_miss: vec![0; num_comp],
            ..Default::default()
        }
    }
}

impl std::fmt::Display for TageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "TAGE allocations: {} ({} failed)", self.alcs, self.failed_alcs)?;
        writeln!(f, "  Base component: {} hits, {} misses",
            self.base_hits, self.base_miss
        )?;
        let iter = self.history_lengths.iter()
            .zip(self.comp_hits.iter().zip(self.comp_miss.iter()))
            .enumerate();
        for (idx, (len, (hits, miss))) in iter {
            writeln!(f, "  Component[{}] (GHR[0..{:03}]): {} hits, {} misses",
                idx, len, hits, miss
            )?;
        }
        Ok(())
    }
}
