//! Seeded random source for the oracle.
//!
//! Each configuration gets its own stream keyed by the base seed and its
//! identity, so results do not depend on scheduling or enumeration order.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::ConfigurationId;

pub struct RandomState {
    rng: StdRng,
}

impl RandomState {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_configuration(seed: u64, id: &ConfigurationId) -> Self {
        Self::new(configuration_seed(seed, id))
    }

    #[inline]
    pub fn random32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// Stream seed for one configuration.
pub fn configuration_seed(seed: u64, id: &ConfigurationId) -> u64 {
    let key = (id.primitive.ordinal() << 56)
        ^ (id.engine.ordinal() << 48)
        ^ (id.lane_type.ordinal() << 40)
        ^ ((id.max_lanes as u64) << 8)
        ^ id.lanes as u64;
    seed ^ key
}
