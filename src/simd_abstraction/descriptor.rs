//! Lane descriptors: the (element type, lane count) pair every vector
//! operation is parameterized by.
//!
//! A descriptor never hard-codes a width. Full widths come from the engine
//! (`Descriptor::full`), and `partial_descriptors` walks down by halving to
//! one lane, which models callers that deliberately use sub-maximal vectors.

use std::fmt;
use std::marker::PhantomData;

use super::lane::{Lane, LaneType};
use super::simd::SimdEngineType;
use super::types::MAX_VECTOR_BYTES;

/// Interface the generic algorithms are written against.
pub trait LaneDescriptor: Copy {
    type Lane: Lane;

    fn lanes(&self) -> usize;

    fn lane_type(&self) -> LaneType {
        <Self::Lane as Lane>::TYPE
    }

    /// Bytes covered by a vector of this shape.
    #[cfg(test)]
    fn vector_bytes(&self) -> usize {
        self.lanes() * <Self::Lane as Lane>::BYTES
    }
}

/// Concrete descriptor: `lanes` lanes of `T`.
pub struct Descriptor<T: Lane> {
    lanes: usize,
    _lane: PhantomData<T>,
}

impl<T: Lane> Descriptor<T> {
    /// Panics unless `1 <= lanes` and the vector fits in the widest register.
    pub fn new(lanes: usize) -> Self {
        assert!(
            lanes >= 1 && lanes * T::BYTES <= MAX_VECTOR_BYTES,
            "descriptor of {} x {} does not fit a vector",
            lanes,
            T::TYPE
        );
        Self {
            lanes,
            _lane: PhantomData,
        }
    }

    /// Maximal width for `T` on `engine`.
    pub fn full(engine: SimdEngineType) -> Self {
        Self::new(engine.max_lanes(T::BYTES))
    }

    /// Same lane count, different element type.
    pub fn rebind<U: Lane>(self) -> Descriptor<U> {
        Descriptor::new(self.lanes)
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// True when this descriptor uses fewer lanes than `engine` allows.
    pub fn is_partial(&self, engine: SimdEngineType) -> bool {
        self.lanes < engine.max_lanes(T::BYTES)
    }
}

impl<T: Lane> LaneDescriptor for Descriptor<T> {
    type Lane = T;

    fn lanes(&self) -> usize {
        self.lanes
    }
}

impl<T: Lane> Clone for Descriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Lane> Copy for Descriptor<T> {}

impl<T: Lane> PartialEq for Descriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: Lane> Eq for Descriptor<T> {}

impl<T: Lane> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Descriptor<{} x {}>", T::TYPE, self.lanes)
    }
}

/// Every width for `T` on `engine`: the full vector, then halves down to a
/// single lane.
pub fn partial_descriptors<T: Lane>(engine: SimdEngineType) -> Vec<Descriptor<T>> {
    let mut out = Vec::new();
    let mut lanes = engine.max_lanes(T::BYTES);
    while lanes >= 1 {
        out.push(Descriptor::new(lanes));
        lanes /= 2;
    }
    out
}
