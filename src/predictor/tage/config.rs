
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

use crate::config::{MAX_HISTORY_BITS, MAX_INDEX_BITS};
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [`TagePredictor`].
///
/// History lengths form a geometric series: the first tagged component
/// uses 'min_history' bits, and each following component uses the previous
/// length multiplied by 'ratio' (rounded down).
#[derive(Clone, Debug, PartialEq)]
pub struct TageConfig {
    /// Number of tagged components
    pub num_tables: usize,

    /// History length for the first tagged component
    pub min_history: usize,

    /// Common ratio between successive history lengths
    pub ratio: f64,

    /// Number of index bits for each tagged component
    pub index_bits: Vec<usize>,

    /// Number of tag bits for each tagged component
    pub tag_bits: Vec<usize>,

    /// Number of index bits for the base component
    pub base_index_bits: usize,

    /// Length of the global history register [in bits]
    pub history_bits: usize,

    /// Seed for the random source used during allocation
    pub seed: u64,
}

impl Default for TageConfig {
    fn default() -> Self {
        Self {
            num_tables: 3,
            min_history: 11,
            ratio: 2.1,
            index_bits: vec![12; 3],
            tag_bits: vec![9; 3],
            base_index_bits: 13,
            history_bits: 64,
            seed: 0,
        }
    }
}

impl TageConfig {
    /// Returns the history length associated with each tagged component.
    pub fn history_lengths(&self) -> Vec<usize> {
        let mut res = Vec::with_capacity(self.num_tables);
        let mut len = self.min_history;
        for _ in 0..self.num_tables {
            res.push(len);
            len = (len as f64 * self.ratio).floor() as usize;
        }
        res
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let ctr_bits = DirectionCounter::storage_bits();
        let useful_bits = UsefulCounter::storage_bits();
        let c: usize = self.index_bits.iter().zip(self.tag_bits.iter())
            .map(|(idx, tag)| (ctr_bits + useful_bits + tag) << idx)
            .sum();
        c + (ctr_bits << self.base_index_bits) + self.history_bits
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_tables == 0 {
            return Err(ConfigError::NoTables);
        }
        if self.index_bits.len() != self.num_tables {
            return Err(ConfigError::TableCount {
                name: "TAGE index bits",
                expected: self.num_tables,
                got: self.index_bits.len(),
            });
        }
        if self.tag_bits.len() != self.num_tables {
            return Err(ConfigError::TableCount {
                name: "TAGE tag bits",
                expected: self.num_tables,
                got: self.tag_bits.len(),
            });
        }
        if self.history_bits > MAX_HISTORY_BITS {
            return Err(ConfigError::HistoryTooWide {
                bits: self.history_bits, max: MAX_HISTORY_BITS,
            });
        }
        if !self.ratio.is_finite() || self.ratio <= 1.0 {
            return Err(ConfigError::BadRatio(self.ratio));
        }
        if self.base_index_bits > MAX_INDEX_BITS {
            return Err(ConfigError::TableTooLarge {
                name: "TAGE base table",
                bits: self.base_index_bits,
                max: MAX_INDEX_BITS,
            });
        }
        for &bits in self.index_bits.iter() {
            // The tag hash folds history in chunks one bit narrower than
            // the index, so a component needs at least two index bits.
            if bits < 2 {
                return Err(ConfigError::TableTooSmall {
                    name: "TAGE tagged table", bits, min: 2,
                });
            }
            if bits > MAX_INDEX_BITS {
                return Err(ConfigError::TableTooLarge {
                    name: "TAGE tagged table", bits, max: MAX_INDEX_BITS,
                });
            }
        }
        if let Some(&bits) = self.tag_bits.iter().find(|&&b| b > 32) {
            return Err(ConfigError::TagTooWide(bits));
        }

        let lengths = self.history_lengths();
        if lengths[0] == 0 {
            return Err(ConfigError::HistoryNotIncreasing { table: 0, len: 0 });
        }
        for (table, pair) in lengths.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::HistoryNotIncreasing {
                    table: table + 1, len: pair[1],
                });
            }
        }
        let longest = lengths[lengths.len() - 1];
        if longest > self.history_bits {
            return Err(ConfigError::HistoryTooLong {
                len: longest, width: self.history_bits,
            });
        }
        Ok(())
    }

    /// Use this configuration to create a new [`TagePredictor`], drawing
    /// random bits from a generator seeded with [`TageConfig::seed`].
    pub fn build(&self) -> Result<TagePredictor<StdRng>, ConfigError> {
        self.build_with_rng(StdRng::seed_from_u64(self.seed))
    }

    /// Use this configuration to create a new [`TagePredictor`] with a
    /// user-provided random source.
    pub fn build_with_rng<R: RngCore>(&self, rng: R)
        -> Result<TagePredictor<R>, ConfigError>
    {
        self.validate()?;
        let lengths = self.history_lengths();
        let comp: Vec<TageComponent> = lengths.iter().enumerate()
            .map(|(num, &len)| {
                TageComponent::new(num, self.index_bits[num], self.tag_bits[num], len)
            })
            .collect();
        let stat = TageStats::new(lengths);
        Ok(TagePredictor {
            cfg: self.clone(),
            stat,
            base: PatternTable::new(self.base_index_bits),
            comp,
            ghr: HistoryRegister::new(self.history_bits),
            rng,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_lengths_are_geometric() {
        let cfg = TageConfig::default();
        assert_eq!(cfg.history_lengths(), vec![11, 23, 48]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_flat_histories() {
        let cfg = TageConfig { min_history: 1, ratio: 1.5, ..TageConfig::default() };
        assert_eq!(cfg.validate(),
            Err(ConfigError::HistoryNotIncreasing { table: 1, len: 1 }));

        let cfg = TageConfig { ratio: 1.0, ..TageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::BadRatio(1.0)));
    }

    #[test]
    fn rejects_histories_longer_than_the_register() {
        let cfg = TageConfig { history_bits: 32, ..TageConfig::default() };
        assert_eq!(cfg.validate(),
            Err(ConfigError::HistoryTooLong { len: 48, width: 32 }));

        // A wider register lifts the limit
        let cfg = TageConfig {
            num_tables: 4,
            index_bits: vec![10; 4],
            tag_bits: vec![8; 4],
            history_bits: 128,
            ..TageConfig::default()
        };
        assert_eq!(cfg.history_lengths(), vec![11, 23, 48, 100]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_oversized_history_registers() {
        let cfg = TageConfig { history_bits: usize::MAX / 2, ..TageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::HistoryTooWide {
            bits: usize::MAX / 2, max: MAX_HISTORY_BITS,
        }));
        assert!(cfg.build().is_err());

        let cfg = TageConfig { history_bits: MAX_HISTORY_BITS, ..TageConfig::default() };
        assert!(cfg.build().is_ok());
    }

    #[test]
    fn rejects_bad_table_geometry() {
        let cfg = TageConfig { index_bits: vec![12, 1, 12], ..TageConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::TableTooSmall { bits: 1, .. })));

        let cfg = TageConfig { index_bits: vec![12, 40, 12], ..TageConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::TableTooLarge { bits: 40, .. })));

        let cfg = TageConfig { tag_bits: vec![9, 9], ..TageConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::TableCount { got: 2, .. })));

        let cfg = TageConfig { tag_bits: vec![9, 33, 9], ..TageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::TagTooWide(33)));

        let cfg = TageConfig { num_tables: 0, ..TageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NoTables));
    }

    #[test]
    fn zero_width_tags_are_accepted() {
        let cfg = TageConfig { tag_bits: vec![0; 3], ..TageConfig::default() };
        assert!(cfg.build().is_ok());
    }
}
