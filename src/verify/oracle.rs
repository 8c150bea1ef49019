//! Per-configuration random source and assertion helpers.

use crate::simd_abstraction::{Lane, Vector};

use super::ConfigurationId;
use super::compare::{Mismatch, first_mismatch};
use super::config::VerifyConfig;
use super::rng::RandomState;

pub struct Oracle {
    id: ConfigurationId,
    seed: u64,
    rng: RandomState,
    reps: usize,
    rep: Option<usize>,
}

impl Oracle {
    pub fn new(id: ConfigurationId, config: &VerifyConfig) -> Self {
        Self {
            id,
            seed: config.seed,
            rng: RandomState::for_configuration(config.seed, &id),
            reps: config.adjusted_reps(),
            rep: None,
        }
    }

    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    pub fn reps(&self) -> usize {
        self.reps
    }

    #[inline]
    pub fn random32(&mut self) -> u32 {
        self.rng.random32()
    }

    /// A 32-bit draw reduced to `T` (truncated or numerically converted).
    #[inline]
    pub fn random_lane<T: Lane>(&mut self) -> T {
        T::from_random32(self.random32())
    }

    /// Uniform over every bit pattern of `T`, so each sign bit is equally
    /// likely.
    #[inline]
    pub fn random_bits<T: Lane>(&mut self) -> T {
        let hi = self.random32() as u64;
        let lo = self.random32() as u64;
        T::from_bits((hi << 32) | lo)
    }

    /// Payload for the blend scenarios: a reduced draw or, on a coin flip, a
    /// raw bit pattern (NaN payloads, negative zero, full-width integers).
    #[inline]
    pub fn random_data<T: Lane>(&mut self) -> T {
        if self.coin() {
            self.random_bits()
        } else {
            self.random_lane()
        }
    }

    /// Fair coin taken from bit 4 of a draw.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.random32() & 16 != 0
    }

    /// Run `f` once per repetition, stopping at the first mismatch.
    /// Mismatches raised inside carry the repetition index.
    pub fn repeat<F>(&mut self, mut f: F) -> Result<(), Mismatch>
    where
        F: FnMut(&mut Self) -> Result<(), Mismatch>,
    {
        for rep in 0..self.reps {
            self.rep = Some(rep);
            if let Err(e) = f(self) {
                self.rep = None;
                return Err(e);
            }
        }
        self.rep = None;
        Ok(())
    }

    pub fn assert_lanes_eq<T: Lane>(
        &self,
        scenario: &'static str,
        expected: &[T],
        actual: Vector<T>,
    ) -> Result<(), Mismatch> {
        match first_mismatch(expected, &actual.to_vec()) {
            None => Ok(()),
            Some(lane_mismatch) => Err(Mismatch::new(
                self.id,
                scenario,
                self.rep,
                self.seed,
                lane_mismatch,
            )),
        }
    }

    pub fn assert_vec_eq<T: Lane>(
        &self,
        scenario: &'static str,
        expected: Vector<T>,
        actual: Vector<T>,
    ) -> Result<(), Mismatch> {
        self.assert_lanes_eq(scenario, &expected.to_vec(), actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd_abstraction::{Descriptor, LaneType, SimdEngineType};
    use crate::verify::Primitive;

    fn oracle(reps: usize) -> Oracle {
        let id = ConfigurationId {
            primitive: Primitive::Select,
            engine: SimdEngineType::Engine128,
            lane_type: LaneType::U32,
            lanes: 4,
            max_lanes: 4,
        };
        let config = VerifyConfig {
            seed: 1,
            reps,
            rep_scale_percent: 100,
            ..VerifyConfig::default()
        };
        Oracle::new(id, &config)
    }

    #[test]
    fn test_repeat_runs_every_rep() {
        let mut o = oracle(40);
        let mut count = 0;
        o.repeat(|_| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 40);
        assert_eq!(o.reps(), 40);
    }

    #[test]
    fn test_mismatch_carries_rep() {
        let mut o = oracle(20);
        let d = Descriptor::<u32>::new(4);
        let err = o
            .repeat(|o| {
                let v = Vector::load(d, &[1u32, 2, 3, 4]);
                if o.rep == Some(5) {
                    o.assert_lanes_eq("ramp", &[1u32, 2, 0, 4], v)
                } else {
                    o.assert_lanes_eq("ramp", &[1u32, 2, 3, 4], v)
                }
            })
            .unwrap_err();
        assert_eq!(err.rep, Some(5));
        assert_eq!(err.lane, 2);
        assert_eq!(err.seed, 1);

        // Fixed checks outside repeat have no rep
        let v = Vector::set(d, 7u32);
        let err = o.assert_vec_eq("fixed", Vector::zero(d), v).unwrap_err();
        assert_eq!(err.rep, None);
    }

    #[test]
    fn test_random_data_reaches_upper_bits() {
        let mut o = oracle(16);
        let draws: Vec<u64> = (0..256).map(|_| o.random_data::<u64>()).collect();
        assert!(draws.iter().any(|&x| x > u32::MAX as u64));
        assert!(draws.iter().any(|&x| x <= u32::MAX as u64));
    }

    #[test]
    fn test_coin_takes_both_values() {
        let mut o = oracle(16);
        let heads = (0..256).filter(|_| o.coin()).count();
        assert!(heads > 64 && heads < 192, "heads = {}", heads);
    }
}
