//! Portable helpers that mirror the handful of SSE2 bitwise intrinsics the
//! selection layer is built from.
//!
//! Every selection primitive bottoms out in a bitwise blend over 128-bit
//! chunks. The chunk helpers below keep x86 naming (`_mm_and_si128` and
//! friends) and map to NEON on aarch64 or a byte loop elsewhere, so all
//! targets run the same instruction-level recipe.
//!
//! Design notes
//! - Chunk intrinsics are `unsafe` for the same reasons as the underlying
//!   intrinsics (pointer validity, CPU features). SSE2 and NEON are baseline
//!   on their architectures, so no runtime feature check is needed.
//! - The `*_block` functions are the safe surface used by `Vector`. They take
//!   the number of active chunks so sub-128-bit vectors touch one chunk only.
//!   Bytes past the active range are left zero in the output.

use super::types::{Block, CHUNK_BYTES, CHUNKS, __m128i};

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use super::types::simd_arch;

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_loadu_si128(p: *const __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_loadu_si128(p) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { __m128i(simd_arch::vld1q_u8(p as *const u8)) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        unsafe { std::ptr::read_unaligned(p) }
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_storeu_si128(p: *mut __m128i, a: __m128i) {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_storeu_si128(p, a) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { simd_arch::vst1q_u8(p as *mut u8, a.0) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        unsafe { std::ptr::write_unaligned(p, a) }
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn, unused_unsafe)]
pub unsafe fn _mm_and_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_and_si128(a, b) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { __m128i(simd_arch::vandq_u8(a.0, b.0)) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        __m128i(std::array::from_fn(|i| a.0[i] & b.0[i]))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn, unused_unsafe)]
pub unsafe fn _mm_or_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_or_si128(a, b) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { __m128i(simd_arch::vorrq_u8(a.0, b.0)) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        __m128i(std::array::from_fn(|i| a.0[i] | b.0[i]))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn, unused_unsafe)]
pub unsafe fn _mm_xor_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_xor_si128(a, b) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { __m128i(simd_arch::veorq_u8(a.0, b.0)) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        __m128i(std::array::from_fn(|i| a.0[i] ^ b.0[i]))
    }
}

/// `!a & b` per bit, matching x86 operand order.
#[inline]
#[allow(unsafe_op_in_unsafe_fn, unused_unsafe)]
pub unsafe fn _mm_andnot_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        unsafe { simd_arch::_mm_andnot_si128(a, b) }
    }
    #[cfg(target_arch = "aarch64")]
    {
        // vbic computes first & !second
        unsafe { __m128i(simd_arch::vbicq_u8(b.0, a.0)) }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        __m128i(std::array::from_fn(|i| !a.0[i] & b.0[i]))
    }
}

/// Bitwise select: `(mask & yes) | (!mask & no)`.
#[inline]
#[allow(unsafe_op_in_unsafe_fn, unused_unsafe)]
pub unsafe fn _mm_blend_si128(mask: __m128i, yes: __m128i, no: __m128i) -> __m128i {
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { __m128i(simd_arch::vbslq_u8(mask.0, yes.0, no.0)) }
    }
    #[cfg(not(target_arch = "aarch64"))]
    {
        unsafe { _mm_or_si128(_mm_and_si128(mask, yes), _mm_andnot_si128(mask, no)) }
    }
}

/// Number of 128-bit chunks covering `bytes` bytes of a block.
#[inline]
pub fn active_chunks(bytes: usize) -> usize {
    bytes.div_ceil(CHUNK_BYTES).clamp(1, CHUNKS)
}

#[inline]
fn zip_block(
    a: &Block,
    b: &Block,
    chunks: usize,
    op: impl Fn(__m128i, __m128i) -> __m128i,
) -> Block {
    debug_assert!(chunks <= CHUNKS);
    let mut out = Block::zeroed();
    for c in 0..chunks {
        // SAFETY: every chunk is 16 in-bounds bytes and the helpers use unaligned access.
        unsafe {
            let x = _mm_loadu_si128(a.chunk(c).as_ptr() as *const __m128i);
            let y = _mm_loadu_si128(b.chunk(c).as_ptr() as *const __m128i);
            _mm_storeu_si128(out.chunk_mut(c).as_mut_ptr() as *mut __m128i, op(x, y));
        }
    }
    out
}

#[inline]
pub fn and_block(a: &Block, b: &Block, chunks: usize) -> Block {
    zip_block(a, b, chunks, |x, y| unsafe { _mm_and_si128(x, y) })
}

#[inline]
pub fn or_block(a: &Block, b: &Block, chunks: usize) -> Block {
    zip_block(a, b, chunks, |x, y| unsafe { _mm_or_si128(x, y) })
}

#[inline]
pub fn xor_block(a: &Block, b: &Block, chunks: usize) -> Block {
    zip_block(a, b, chunks, |x, y| unsafe { _mm_xor_si128(x, y) })
}

/// `!a & b` over the active chunks.
#[inline]
pub fn andnot_block(a: &Block, b: &Block, chunks: usize) -> Block {
    zip_block(a, b, chunks, |x, y| unsafe { _mm_andnot_si128(x, y) })
}

/// Bitwise blend of `yes` and `no` under `mask` over the active chunks.
#[inline]
pub fn blend_block(mask: &Block, yes: &Block, no: &Block, chunks: usize) -> Block {
    debug_assert!(chunks <= CHUNKS);
    let mut out = Block::zeroed();
    for c in 0..chunks {
        // SAFETY: see `zip_block`.
        unsafe {
            let m = _mm_loadu_si128(mask.chunk(c).as_ptr() as *const __m128i);
            let y = _mm_loadu_si128(yes.chunk(c).as_ptr() as *const __m128i);
            let n = _mm_loadu_si128(no.chunk(c).as_ptr() as *const __m128i);
            _mm_storeu_si128(
                out.chunk_mut(c).as_mut_ptr() as *mut __m128i,
                _mm_blend_si128(m, y, n),
            );
        }
    }
    out
}
