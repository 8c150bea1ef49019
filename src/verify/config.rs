//! Run parameters for the verification harness.
//!
//! Defaults are overridable from the environment, then from the CLI:
//! - `FERROUS_SELECT_SEED`: base seed, decimal or `0x` hex
//! - `FERROUS_SELECT_REPS`: randomized repetitions per configuration
//! - `FERROUS_SELECT_REP_SCALE`: percentage applied to the repetition count

use crate::simd_abstraction::{SimdEngineType, detect_optimal_simd_engine, engines_up_to};

pub const DEFAULT_REPS: usize = 200;
/// Lower bound after scaling, so every lane still sees both predicate states.
pub const MIN_REPS: usize = 16;
pub const DEFAULT_SEED: u64 = 0x853C_49E6_748F_EA9B;

#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub seed: u64,
    pub reps: usize,
    /// Unoptimized builds run half the repetitions by default.
    pub rep_scale_percent: usize,
    /// Engines to enumerate, narrowest first.
    pub engines: Vec<SimdEngineType>,
    pub parallel: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            reps: DEFAULT_REPS,
            rep_scale_percent: if cfg!(debug_assertions) { 50 } else { 100 },
            engines: engines_up_to(detect_optimal_simd_engine()),
            parallel: true,
        }
    }
}

impl VerifyConfig {
    /// Defaults with any environment overrides applied. Unparseable values
    /// are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(seed) = env_value("FERROUS_SELECT_SEED", parse_seed) {
            config.seed = seed;
        }
        if let Some(reps) = env_value("FERROUS_SELECT_REPS", parse_count) {
            config.reps = reps;
        }
        if let Some(scale) = env_value("FERROUS_SELECT_REP_SCALE", parse_count) {
            config.rep_scale_percent = scale;
        }
        config
    }

    /// Restrict enumeration to `engine` and everything narrower.
    pub fn with_engine(mut self, engine: SimdEngineType) -> Self {
        self.engines = engines_up_to(engine);
        self
    }

    /// Repetitions actually run per configuration.
    pub fn adjusted_reps(&self) -> usize {
        self.scaled_reps().max(MIN_REPS)
    }

    /// True when scaling alone would drop below `MIN_REPS`.
    pub fn reps_clamped(&self) -> bool {
        self.scaled_reps() < MIN_REPS
    }

    fn scaled_reps(&self) -> usize {
        self.reps.saturating_mul(self.rep_scale_percent) / 100
    }
}

/// Accepts decimal or `0x`-prefixed hex.
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid seed '{}': {}", s, e))
}

fn parse_count(s: &str) -> Result<usize, String> {
    s.trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid count '{}': {}", s, e))
}

fn env_value<T>(name: &str, parse: impl Fn(&str) -> Result<T, String>) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match parse(&raw) {
        Ok(value) => {
            log::debug!("{}={} from environment", name, raw.trim());
            Some(value)
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("0xff"), Ok(255));
        assert_eq!(parse_seed(" 0XDEAD_BEEF "), Ok(0xDEAD_BEEF));
        assert_eq!(parse_seed("1_000"), Ok(1000));
        assert!(parse_seed("seed").is_err());
        assert!(parse_seed("0x").is_err());
    }

    #[test]
    fn test_adjusted_reps_scales_and_clamps() {
        let mut config = VerifyConfig {
            reps: 200,
            rep_scale_percent: 50,
            ..VerifyConfig::default()
        };
        assert_eq!(config.adjusted_reps(), 100);

        config.rep_scale_percent = 100;
        assert_eq!(config.adjusted_reps(), 200);

        assert!(!config.reps_clamped());

        config.reps = 1;
        assert_eq!(config.adjusted_reps(), MIN_REPS);
        assert!(config.reps_clamped());

        config.reps = 0;
        assert_eq!(config.adjusted_reps(), MIN_REPS);
    }

    #[test]
    fn test_with_engine_restricts_enumeration() {
        let config = VerifyConfig::default().with_engine(SimdEngineType::Engine128);
        assert_eq!(
            config.engines,
            vec![SimdEngineType::Scalar, SimdEngineType::Engine128]
        );
        let scalar = VerifyConfig::default().with_engine(SimdEngineType::Scalar);
        assert_eq!(scalar.engines, vec![SimdEngineType::Scalar]);
    }
}
