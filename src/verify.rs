//! Differential verification of the selection primitives.
//!
//! For every (primitive, element type, engine, width) configuration the
//! harness draws lane values from a seeded generator, computes the expected
//! result lane by lane with scalar code, and requires a bit-exact match from
//! the vectorized primitive.
//!
//! ## Flow
//!
//! 1) `Primitive::configurations(engines)` enumerates independent jobs
//!    (`enumerate`), one per type x engine x partial width.
//! 2) Each job builds an `Oracle` with its own RNG stream derived from the
//!    base seed and the configuration identity, so order never matters.
//! 3) The job runs its scenario (`scenarios`): randomized repetitions plus
//!    fixed boundary cases.
//! 4) The comparator (`compare`) stops at the first differing lane and the
//!    resulting `Mismatch` carries everything needed to reproduce it.
//!
//! Jobs run on the rayon pool unless `VerifyConfig::parallel` is off. Either
//! way the first failure ends the run.

pub mod compare;
pub mod config;
pub mod enumerate;
pub mod oracle;
pub mod rng;
pub mod scenarios;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::simd_abstraction::{LaneType, SimdEngineType};

pub use compare::Mismatch;
pub use config::VerifyConfig;
pub use enumerate::Configuration;

/// The five test subjects. `Select` covers the three mask-driven forms
/// (`select`, `select_or_zero`, `zero_or_select`), which share inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Primitive {
    Select,
    SelectByFullBits,
    ClampNegativeToZero,
    SelectBySignBit,
    NegateIfSignBit,
}

const NON_SPECIAL: [LaneType; 11] = [
    LaneType::I8,
    LaneType::I16,
    LaneType::I32,
    LaneType::I64,
    LaneType::U8,
    LaneType::U16,
    LaneType::U32,
    LaneType::U64,
    LaneType::F16,
    LaneType::F32,
    LaneType::F64,
];

const FLOAT: [LaneType; 3] = [LaneType::F16, LaneType::F32, LaneType::F64];

const SIGNED_AND_FLOAT: [LaneType; 7] = [
    LaneType::I8,
    LaneType::I16,
    LaneType::I32,
    LaneType::I64,
    LaneType::F16,
    LaneType::F32,
    LaneType::F64,
];

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Select,
        Primitive::SelectByFullBits,
        Primitive::ClampNegativeToZero,
        Primitive::SelectBySignBit,
        Primitive::NegateIfSignBit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Select => "select",
            Primitive::SelectByFullBits => "select_by_full_bits",
            Primitive::ClampNegativeToZero => "clamp_negative_to_zero",
            Primitive::SelectBySignBit => "select_by_sign_bit",
            Primitive::NegateIfSignBit => "negate_if_sign_bit",
        }
    }

    /// Stable ordinal used when deriving per-configuration seeds.
    pub fn ordinal(self) -> u64 {
        match self {
            Primitive::Select => 0,
            Primitive::SelectByFullBits => 1,
            Primitive::ClampNegativeToZero => 2,
            Primitive::SelectBySignBit => 3,
            Primitive::NegateIfSignBit => 4,
        }
    }

    /// Element types this primitive is verified over.
    pub fn lane_types(self) -> &'static [LaneType] {
        match self {
            Primitive::Select => &LaneType::ALL,
            Primitive::SelectByFullBits => &NON_SPECIAL,
            Primitive::ClampNegativeToZero => &FLOAT,
            Primitive::SelectBySignBit | Primitive::NegateIfSignBit => &SIGNED_AND_FLOAT,
        }
    }

    /// Every configuration for this primitive on `engines`.
    pub fn configurations(self, engines: &[SimdEngineType]) -> Vec<Configuration> {
        use enumerate::*;
        use scenarios::*;

        match self {
            Primitive::Select => for_all_types_and_special(self, engines, MaskSelectScenario),
            Primitive::SelectByFullBits => for_all_types(self, engines, FullBitsScenario),
            Primitive::ClampNegativeToZero => for_float_types(self, engines, ClampScenario),
            Primitive::SelectBySignBit => {
                for_signed_and_float_types(self, engines, SignBitScenario)
            }
            Primitive::NegateIfSignBit => for_signed_and_float_types(self, engines, NegateScenario),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('-', "_");
        Primitive::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown primitive '{}'", s))
    }
}

/// Identity of one configuration; enough to reproduce a failure together
/// with the base seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigurationId {
    pub primitive: Primitive,
    pub engine: SimdEngineType,
    pub lane_type: LaneType,
    pub lanes: usize,
    /// Full width for `lane_type` on `engine`.
    pub max_lanes: usize,
}

impl ConfigurationId {
    pub fn is_partial(&self) -> bool {
        self.lanes < self.max_lanes
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} (max {}) on engine {}",
            self.primitive, self.lane_type, self.lanes, self.max_lanes, self.engine
        )
    }
}

/// Summary of a passing run for one primitive.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub primitive: Primitive,
    pub configurations: usize,
    pub partial_configurations: usize,
    pub reps_per_configuration: usize,
    pub elapsed: Duration,
}

/// Run a prepared set of configurations, stopping at the first mismatch.
///
/// In parallel mode the reported mismatch is the first one observed, which
/// need not be the first in enumeration order.
pub fn run_configurations(
    configurations: &[Configuration],
    config: &VerifyConfig,
) -> Result<(), Mismatch> {
    let run_one = |configuration: &Configuration| {
        log::debug!("Verifying {}", configuration.id());
        configuration.run(config).inspect_err(|e| log::error!("{}", e))
    };

    if config.parallel {
        configurations.par_iter().try_for_each(run_one)
    } else {
        configurations.iter().try_for_each(run_one)
    }
}

/// Verify every configuration of `primitive`.
pub fn run_primitive(
    primitive: Primitive,
    config: &VerifyConfig,
) -> Result<VerifyReport, Mismatch> {
    let start = Instant::now();
    if config.reps_clamped() {
        log::warn!(
            "{} reps at {}% is below the minimum; running {}",
            config.reps,
            config.rep_scale_percent,
            config::MIN_REPS
        );
    }
    let configurations = primitive.configurations(&config.engines);
    let partial = configurations
        .iter()
        .filter(|c| c.id().is_partial())
        .count();

    log::info!(
        "{}: {} configurations ({} partial) over {} engine(s)",
        primitive,
        configurations.len(),
        partial,
        config.engines.len()
    );

    run_configurations(&configurations, config)?;

    let report = VerifyReport {
        primitive,
        configurations: configurations.len(),
        partial_configurations: partial,
        reps_per_configuration: config.adjusted_reps(),
        elapsed: start.elapsed(),
    };
    log::info!(
        "{}: passed in {:.2} ms",
        primitive,
        report.elapsed.as_secs_f64() * 1000.0
    );
    Ok(report)
}

/// Verify every primitive, stopping at the first failing one.
pub fn run_all(config: &VerifyConfig) -> Result<Vec<VerifyReport>, Mismatch> {
    Primitive::ALL
        .iter()
        .map(|&primitive| run_primitive(primitive, config))
        .collect()
}
