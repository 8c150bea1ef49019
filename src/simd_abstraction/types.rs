//! SIMD type aliases and architecture bindings
//!
//! This module provides a tiny portability layer so the rest of the
//! `simd_abstraction` code can refer to `simd_arch` and `__m128i` uniformly on
//! x86_64, aarch64 and everything else.
//!
//! - On x86_64 we re-export `std::arch::x86_64` as `simd_arch` and use the
//!   native `__m128i` type.
//! - On aarch64 we re-export `std::arch::aarch64` as `simd_arch` and define a
//!   transparent wrapper `__m128i` backed by `uint8x16_t`.
//! - Elsewhere `__m128i` is a plain 16-byte array so the block helpers in
//!   `portable_intrinsics` still have a single chunk type to work with.
//!
//! The selection layer only ever treats a chunk as 128 untyped bits, so no
//! element-width reinterpretation helpers are needed here.

#[cfg(target_arch = "x86_64")]
pub use std::arch::x86_64 as simd_arch;

#[cfg(target_arch = "aarch64")]
pub use std::arch::aarch64 as simd_arch;

/// Bytes held by one 128-bit chunk.
pub const CHUNK_BYTES: usize = 16;

/// Widest vector any engine exposes (AVX-512).
pub const MAX_VECTOR_BYTES: usize = 64;

/// Upper bound on the lane count of any descriptor (64 lanes of 8-bit data).
pub const MAX_LANES: usize = MAX_VECTOR_BYTES;

/// Number of 128-bit chunks in a full block.
pub const CHUNKS: usize = MAX_VECTOR_BYTES / CHUNK_BYTES;

/// Type alias for `__m128i` on x86_64.
#[allow(non_camel_case_types)]
#[cfg(target_arch = "x86_64")]
pub type __m128i = simd_arch::__m128i;

/// Transparent `__m128i` wrapper on aarch64 (NEON), backed by `uint8x16_t`.
#[allow(non_camel_case_types)]
#[cfg(target_arch = "aarch64")]
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct __m128i(pub simd_arch::uint8x16_t);

/// Byte-array stand-in for `__m128i` on targets without a 128-bit ISA binding.
#[allow(non_camel_case_types)]
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[derive(Copy, Clone, Debug)]
#[repr(C, align(16))]
pub struct __m128i(pub [u8; CHUNK_BYTES]);

#[cfg(target_arch = "aarch64")]
impl std::fmt::Debug for __m128i {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes: [u8; 16] = unsafe { std::mem::transmute(self.0) };
        write!(f, "__m128i({:?})", bytes)
    }
}

/// Backing storage of every vector value: 64 bytes, little-endian lanes,
/// aligned so each 128-bit chunk starts on a 16-byte boundary.
///
/// Bytes past the active lane count are kept zero by every constructor, so
/// chunk-wise bitwise ops never observe stale data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, align(64))]
pub struct Block(pub [u8; MAX_VECTOR_BYTES]);

impl Block {
    #[inline]
    pub const fn zeroed() -> Self {
        Self([0; MAX_VECTOR_BYTES])
    }

    /// Byte range of one 128-bit chunk.
    #[inline]
    pub fn chunk(&self, index: usize) -> &[u8] {
        &self.0[index * CHUNK_BYTES..(index + 1) * CHUNK_BYTES]
    }

    #[inline]
    pub fn chunk_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.0[index * CHUNK_BYTES..(index + 1) * CHUNK_BYTES]
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::zeroed()
    }
}
