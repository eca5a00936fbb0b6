//! Engine configuration.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::predictor::TageConfig;

/// The widest index (in bits) that any table may use.
pub const MAX_INDEX_BITS: usize = 28;

/// The widest global history register (in bits) that TAGE may use.
pub const MAX_HISTORY_BITS: usize = 1024;

/// The set of available predictors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictorKind {
    /// Always predict 'taken'
    Static,
    Gshare,
    Tournament,
    Tage,
}

/// Configuration used to create an [`Engine`](crate::Engine).
///
/// Only the fields relevant to the selected [`PredictorKind`] are used.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// The selected predictor
    pub kind: PredictorKind,

    /// Number of global history bits (Gshare and Tournament)
    pub ghistory_bits: usize,

    /// Number of local history bits (Tournament)
    pub lhistory_bits: usize,

    /// Number of program counter bits selecting a local history (Tournament)
    pub pc_index_bits: usize,

    /// TAGE parameters
    pub tage: TageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::Static,
            ghistory_bits: 13,
            lhistory_bits: 10,
            pc_index_bits: 10,
            tage: TageConfig::default(),
        }
    }
}

fn check_max(name: &'static str, bits: usize) -> Result<(), ConfigError> {
    if bits > MAX_INDEX_BITS {
        return Err(ConfigError::TableTooLarge { name, bits, max: MAX_INDEX_BITS });
    }
    Ok(())
}

impl EngineConfig {
    /// Check that this configuration describes a predictor we can build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            PredictorKind::Static => Ok(()),
            PredictorKind::Gshare => {
                check_max("gshare history", self.ghistory_bits)
            },
            PredictorKind::Tournament => {
                check_max("tournament global history", self.ghistory_bits)?;
                check_max("tournament local history", self.lhistory_bits)?;
                check_max("tournament pc index", self.pc_index_bits)?;
                if self.pc_index_bits == 0 {
                    return Err(ConfigError::TableTooSmall {
                        name: "tournament pc index", bits: 0, min: 1,
                    });
                }
                Ok(())
            },
            PredictorKind::Tage => self.tage.validate(),
        }
    }
}

fn parse_number(s: &str) -> Result<usize, ConfigError> {
    s.parse().map_err(|_| ConfigError::BadNumber(s.to_string()))
}

/// Parse a predictor description of the form `<name>[:<param>...]`,
/// optionally preceded by `--`:
///
/// - `static`
/// - `gshare[:<ghistory>]`
/// - `tournament[:<ghistory>:<lhistory>:<pcindex>]`
/// - `tage` (or `custom`)
///
/// The result is not validated until it is used to build an engine.
impl FromStr for EngineConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let s = s.strip_prefix("--").unwrap_or(s);
        let (name, params) = match s.split_once(':') {
            Some((name, rest)) => (name, rest.split(':').collect::<Vec<_>>()),
            None => (s, Vec::new()),
        };
        let bad_args = |expected: &'static str| ConfigError::BadArgs {
            name: name.to_string(), expected, got: params.len(),
        };

        let mut cfg = Self::default();
        match name {
            "static" => {
                if !params.is_empty() {
                    return Err(bad_args("0"));
                }
                cfg.kind = PredictorKind::Static;
            },
            "gshare" => {
                cfg.kind = PredictorKind::Gshare;
                match params.as_slice() {
                    [] => {},
                    [g] => cfg.ghistory_bits = parse_number(g)?,
                    _ => return Err(bad_args("0 or 1")),
                }
            },
            "tournament" => {
                cfg.kind = PredictorKind::Tournament;
                match params.as_slice() {
                    [] => {
                        cfg.ghistory_bits = 9;
                        cfg.lhistory_bits = 10;
                        cfg.pc_index_bits = 10;
                    },
                    [g, l, p] => {
                        cfg.ghistory_bits = parse_number(g)?;
                        cfg.lhistory_bits = parse_number(l)?;
                        cfg.pc_index_bits = parse_number(p)?;
                    },
                    _ => return Err(bad_args("0 or 3")),
                }
            },
            "tage" | "custom" => {
                if !params.is_empty() {
                    return Err(bad_args("0"));
                }
                cfg.kind = PredictorKind::Tage;
            },
            _ => return Err(ConfigError::UnknownPredictor(name.to_string())),
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_predictor_names() {
        let cfg: EngineConfig = "static".parse().unwrap();
        assert_eq!(cfg.kind, PredictorKind::Static);

        let cfg: EngineConfig = "--gshare".parse().unwrap();
        assert_eq!((cfg.kind, cfg.ghistory_bits), (PredictorKind::Gshare, 13));

        let cfg: EngineConfig = "gshare:4".parse().unwrap();
        assert_eq!(cfg.ghistory_bits, 4);

        let cfg: EngineConfig = "--tournament".parse().unwrap();
        assert_eq!(cfg.kind, PredictorKind::Tournament);
        assert_eq!((cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits), (9, 10, 10));

        let cfg: EngineConfig = "tournament:12:8:6".parse().unwrap();
        assert_eq!((cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits), (12, 8, 6));

        for s in ["tage", "--custom"] {
            let cfg: EngineConfig = s.parse().unwrap();
            assert_eq!(cfg.kind, PredictorKind::Tage);
            assert_eq!(cfg.tage, TageConfig::default());
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!("perceptron".parse::<EngineConfig>(),
            Err(ConfigError::UnknownPredictor("perceptron".to_string())));
        assert_eq!("".parse::<EngineConfig>(),
            Err(ConfigError::UnknownPredictor(String::new())));
        assert_eq!("gshare:x".parse::<EngineConfig>(),
            Err(ConfigError::BadNumber("x".to_string())));
        assert_eq!("gshare:-1".parse::<EngineConfig>(),
            Err(ConfigError::BadNumber("-1".to_string())));
        assert_eq!("tournament:1:2".parse::<EngineConfig>(),
            Err(ConfigError::BadArgs {
                name: "tournament".to_string(), expected: "0 or 3", got: 2,
            }));
        assert!(matches!("static:1".parse::<EngineConfig>(),
            Err(ConfigError::BadArgs { got: 1, .. })));
    }

    #[test]
    fn validates_table_widths() {
        let cfg: EngineConfig = "gshare:29".parse().unwrap();
        assert_eq!(cfg.validate(), Err(ConfigError::TableTooLarge {
            name: "gshare history", bits: 29, max: MAX_INDEX_BITS,
        }));
        let cfg: EngineConfig = "gshare:0".parse().unwrap();
        assert!(cfg.validate().is_ok());

        let cfg: EngineConfig = "tournament:4:4:0".parse().unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::TableTooSmall { bits: 0, .. })));
        let cfg: EngineConfig = "tournament:4:30:4".parse().unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::TableTooLarge { bits: 30, .. })));

        let mut cfg: EngineConfig = "tage".parse().unwrap();
        cfg.tage.history_bits = usize::MAX / 2;
        assert_eq!(cfg.validate(), Err(ConfigError::HistoryTooWide {
            bits: usize::MAX / 2, max: MAX_HISTORY_BITS,
        }));

        // Unused fields don't matter
        let cfg = EngineConfig { ghistory_bits: 64, ..EngineConfig::default() };
        assert!(cfg.validate().is_ok());
    }
}
