//! Bit-exact lane comparison and failure reporting.

use std::fmt;

use crate::simd_abstraction::Lane;

use super::ConfigurationId;

/// First differing lane between an expected and an actual lane sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneMismatch {
    pub lane: usize,
    pub expected: String,
    pub actual: String,
}

/// Renders a lane as its value and raw bits, e.g. `-0.0 [0x80000000]`.
pub fn format_lane<T: Lane>(value: T) -> String {
    format!(
        "{:?} [0x{:0width$x}]",
        value,
        value.to_bits(),
        width = 2 * T::BYTES
    )
}

/// Compares bit patterns, so `-0.0` differs from `+0.0` and a NaN only
/// matches the identical NaN.
pub fn first_mismatch<T: Lane>(expected: &[T], actual: &[T]) -> Option<LaneMismatch> {
    if expected.len() != actual.len() {
        return Some(LaneMismatch {
            lane: expected.len().min(actual.len()),
            expected: format!("{} lanes", expected.len()),
            actual: format!("{} lanes", actual.len()),
        });
    }
    expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e.to_bits() != a.to_bits())
        .map(|lane| LaneMismatch {
            lane,
            expected: format_lane(expected[lane]),
            actual: format_lane(actual[lane]),
        })
}

/// A verification failure.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub configuration: ConfigurationId,
    /// Which check inside the scenario failed.
    pub scenario: &'static str,
    /// `None` for the fixed boundary checks.
    pub rep: Option<usize>,
    pub lane: usize,
    pub expected: String,
    pub actual: String,
    /// Base seed of the run; rerunning with it reproduces the failure.
    pub seed: u64,
}

impl Mismatch {
    pub fn new(
        configuration: ConfigurationId,
        scenario: &'static str,
        rep: Option<usize>,
        seed: u64,
        lane_mismatch: LaneMismatch,
    ) -> Self {
        Self {
            configuration,
            scenario,
            rep,
            lane: lane_mismatch.lane,
            expected: lane_mismatch.expected,
            actual: lane_mismatch.actual,
            seed,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for {}", self.scenario, self.configuration)?;
        if let Some(rep) = self.rep {
            write!(f, ", rep {}", rep)?;
        }
        write!(
            f,
            ": lane {} expected {} got {} (seed 0x{:x})",
            self.lane, self.expected, self.actual, self.seed
        )
    }
}

impl std::error::Error for Mismatch {}
