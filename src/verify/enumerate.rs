//! Configuration enumeration.
//!
//! Expands a scenario over its element types, every requested engine and
//! every partial width of that engine into a flat list of independent jobs.

use std::fmt;

use half::{bf16, f16};

use crate::simd_abstraction::{
    Descriptor, Lane, LaneDescriptor, SimdEngineType, partial_descriptors,
};

use super::compare::Mismatch;
use super::config::VerifyConfig;
use super::oracle::Oracle;
use super::scenarios::{FloatScenario, LaneScenario, SignedScenario};
use super::{ConfigurationId, Primitive};

type Check = Box<dyn Fn(&mut Oracle) -> Result<(), Mismatch> + Send + Sync>;

/// One (primitive, lane type, engine, width) job.
pub struct Configuration {
    id: ConfigurationId,
    check: Check,
}

impl Configuration {
    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    /// Run the scenario with a fresh oracle seeded for this configuration.
    pub fn run(&self, config: &VerifyConfig) -> Result<(), Mismatch> {
        let mut oracle = Oracle::new(self.id, config);
        (self.check)(&mut oracle)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration").field("id", &self.id).finish()
    }
}

/// Push one configuration per engine and per partial width of `T`.
pub fn push_partial_vectors<T, F>(
    out: &mut Vec<Configuration>,
    primitive: Primitive,
    engines: &[SimdEngineType],
    check: F,
) where
    T: Lane,
    F: Fn(Descriptor<T>, &mut Oracle) -> Result<(), Mismatch> + Copy + Send + Sync + 'static,
{
    for &engine in engines {
        let max_lanes = Descriptor::<T>::full(engine).lanes();
        for d in partial_descriptors::<T>(engine) {
            let id = ConfigurationId {
                primitive,
                engine,
                lane_type: d.lane_type(),
                lanes: d.lanes(),
                max_lanes,
            };
            out.push(Configuration {
                id,
                check: Box::new(move |oracle: &mut Oracle| check(d, oracle)),
            });
        }
    }
}

macro_rules! configurations_for {
    ($primitive:expr, $engines:expr, $scenario:expr; $($t:ty),+ $(,)?) => {{
        let scenario = $scenario;
        let mut out = Vec::new();
        $(
            push_partial_vectors::<$t, _>(&mut out, $primitive, $engines, move |d, oracle| {
                scenario.check(d, oracle)
            });
        )+
        out
    }};
}

/// Every integer width, the IEEE floats and `bf16`.
pub fn for_all_types_and_special<S: LaneScenario>(
    primitive: Primitive,
    engines: &[SimdEngineType],
    scenario: S,
) -> Vec<Configuration> {
    configurations_for!(primitive, engines, scenario;
        i8, i16, i32, i64, u8, u16, u32, u64, f16, f32, f64, bf16)
}

/// Every integer width and the IEEE floats.
pub fn for_all_types<S: LaneScenario>(
    primitive: Primitive,
    engines: &[SimdEngineType],
    scenario: S,
) -> Vec<Configuration> {
    configurations_for!(primitive, engines, scenario;
        i8, i16, i32, i64, u8, u16, u32, u64, f16, f32, f64)
}

pub fn for_float_types<S: FloatScenario>(
    primitive: Primitive,
    engines: &[SimdEngineType],
    scenario: S,
) -> Vec<Configuration> {
    configurations_for!(primitive, engines, scenario; f16, f32, f64)
}

pub fn for_signed_and_float_types<S: SignedScenario>(
    primitive: Primitive,
    engines: &[SimdEngineType],
    scenario: S,
) -> Vec<Configuration> {
    configurations_for!(primitive, engines, scenario; i8, i16, i32, i64, f16, f32, f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd_abstraction::LaneType;
    use crate::verify::scenarios::{ClampScenario, MaskSelectScenario};

    #[test]
    fn test_partial_widths_for_128() {
        let configs = for_float_types(
            Primitive::ClampNegativeToZero,
            &[SimdEngineType::Engine128],
            ClampScenario,
        );
        let f16_lanes: Vec<usize> = configs
            .iter()
            .filter(|c| c.id().lane_type == LaneType::F16)
            .map(|c| c.id().lanes)
            .collect();
        assert_eq!(f16_lanes, vec![8, 4, 2, 1]);

        let f64_lanes: Vec<usize> = configs
            .iter()
            .filter(|c| c.id().lane_type == LaneType::F64)
            .map(|c| c.id().lanes)
            .collect();
        assert_eq!(f64_lanes, vec![2, 1]);
        assert!(configs.iter().all(|c| c.id().lanes <= c.id().max_lanes));
    }

    #[test]
    fn test_scalar_engine_has_one_lane() {
        let configs = for_all_types_and_special(
            Primitive::Select,
            &[SimdEngineType::Scalar],
            MaskSelectScenario,
        );
        assert_eq!(configs.len(), 12);
        assert!(configs.iter().all(|c| c.id().lanes == 1 && !c.id().is_partial()));
    }

    #[test]
    fn test_configurations_run() {
        let config = VerifyConfig {
            reps: 16,
            rep_scale_percent: 100,
            ..VerifyConfig::default()
        };
        let configs = for_all_types_and_special(
            Primitive::Select,
            &[SimdEngineType::Scalar, SimdEngineType::Engine128],
            MaskSelectScenario,
        );
        for c in &configs {
            c.run(&config).unwrap();
        }
    }
}
