//! SIMD abstraction layer
//!
//! This module exposes a single, portable surface for the vector values the
//! selection primitives operate on. It hides ISA differences between x86_64
//! (SSE2), aarch64 (NEON) and everything else behind a handful of 128-bit chunk
//! helpers, while keeping lane counts a runtime property of a descriptor rather
//! than of a type.
//!
//! ## Engines and widths
//!
//! The engine decides how many lanes a descriptor of a given element type has:
//! - `Scalar`: one lane of anything
//! - `Engine128`: 16 lanes of u8 down to 2 lanes of f64 (SSE / NEON)
//! - `Engine256`: twice that (AVX2 on x86_64)
//! - `Engine512`: four times that (AVX-512, behind the `avx512` feature)
//!
//! `partial_descriptors(engine)` walks from the full width down to one lane.
//!
//! ## Runtime dispatch pattern
//!
//! 1) Detect features: `detect_optimal_simd_engine()`
//! 2) Enumerate engines: `engines_up_to(engine)`
//! 3) Size vectors: `Descriptor::<T>::full(engine)` / `partial_descriptors`
//!
//! ## Values
//!
//! `Vector<T>`, `Mask<T>` and `FullBitVector<T>` are `Copy` values. Lane count
//! mismatches between operands are caller contract violations and are only
//! checked with `debug_assert!`.

pub mod descriptor;
pub mod lane;
pub mod portable_intrinsics;
pub mod simd;
pub mod types;
pub mod vector;

#[cfg(test)]
mod tests;

pub use descriptor::{Descriptor, LaneDescriptor, partial_descriptors};
pub use lane::{FloatLane, Lane, LaneType, SignedLane};
pub use simd::{
    SimdEngineType, detect_optimal_simd_engine, engines_up_to, simd_engine_description,
};
pub use types::{MAX_LANES, MAX_VECTOR_BYTES};
pub use vector::{FullBitVector, Mask, Vector};
