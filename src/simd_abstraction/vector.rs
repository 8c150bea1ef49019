//! Vector, mask and full-bit predicate values.
//!
//! All three are small `Copy` values; no operation mutates its inputs. A
//! `Vector<T>` keeps its lanes as little-endian bit patterns inside a 64-byte
//! `Block`, so bitwise ops and bit-casts are type agnostic and run through the
//! chunk helpers in `portable_intrinsics`.
//!
//! Predicates come in two deliberately separate shapes:
//! - `Mask<T>`: one logical bool per lane, no bit layout.
//! - `FullBitVector<T>`: a data-width vector whose lanes are all-ones or
//!   all-zeros. The only ways to get one are `Mask::to_full_bits`,
//!   `Vector::broadcast_sign_bit` and `FullBitVector::from_vector`, the last of
//!   which debug-asserts the saturation invariant.

use std::fmt;
use std::marker::PhantomData;

use super::descriptor::Descriptor;
use super::lane::{Lane, SignedLane};
use super::portable_intrinsics::{
    active_chunks, and_block, andnot_block, blend_block, or_block, xor_block,
};
use super::types::{Block, CHUNK_BYTES, MAX_LANES};

#[inline]
fn read_lane<T: Lane>(block: &Block, i: usize) -> T {
    let mut buf = [0u8; 8];
    buf[..T::BYTES].copy_from_slice(&block.0[i * T::BYTES..(i + 1) * T::BYTES]);
    T::from_bits(u64::from_le_bytes(buf))
}

#[inline]
fn write_lane<T: Lane>(block: &mut Block, i: usize, value: T) {
    let bytes = value.to_bits().to_le_bytes();
    block.0[i * T::BYTES..(i + 1) * T::BYTES].copy_from_slice(&bytes[..T::BYTES]);
}

/// `N` lanes of `T`, where `N` comes from the descriptor it was built with.
#[derive(Clone, Copy)]
pub struct Vector<T: Lane> {
    block: Block,
    lanes: usize,
    _lane: PhantomData<T>,
}

impl<T: Lane> Vector<T> {
    /// All lanes set to the additive identity.
    #[inline]
    pub fn zero(d: Descriptor<T>) -> Self {
        Self {
            block: Block::zeroed(),
            lanes: d.lanes(),
            _lane: PhantomData,
        }
    }

    pub fn from_fn(d: Descriptor<T>, mut f: impl FnMut(usize) -> T) -> Self {
        let mut v = Self::zero(d);
        for i in 0..v.lanes {
            write_lane(&mut v.block, i, f(i));
        }
        v
    }

    /// Broadcast `value` to every lane.
    pub fn set(d: Descriptor<T>, value: T) -> Self {
        Self::from_fn(d, |_| value)
    }

    /// Lane `i` holds `first + i`, converted to `T`.
    pub fn iota(d: Descriptor<T>, first: f64) -> Self {
        Self::from_fn(d, |i| T::from_f64(first + i as f64))
    }

    /// Load the first `d.lanes()` values of `lanes`.
    ///
    /// Panics if the slice is shorter than the descriptor.
    pub fn load(d: Descriptor<T>, lanes: &[T]) -> Self {
        assert!(
            lanes.len() >= d.lanes(),
            "load of {} lanes from a slice of {}",
            d.lanes(),
            lanes.len()
        );
        Self::from_fn(d, |i| lanes[i])
    }

    /// Store every lane into the front of `out`.
    ///
    /// Panics if `out` is shorter than the vector.
    pub fn store(&self, out: &mut [T]) {
        assert!(out.len() >= self.lanes, "store of {} lanes into {}", self.lanes, out.len());
        for (i, slot) in out.iter_mut().take(self.lanes).enumerate() {
            *slot = read_lane(&self.block, i);
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        (0..self.lanes).map(|i| read_lane(&self.block, i)).collect()
    }

    #[inline]
    pub fn lane(&self, i: usize) -> T {
        assert!(i < self.lanes, "lane {} out of range for {} lanes", i, self.lanes);
        read_lane(&self.block, i)
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    #[inline]
    pub fn descriptor(&self) -> Descriptor<T> {
        Descriptor::new(self.lanes)
    }

    #[inline]
    fn chunks(&self) -> usize {
        active_chunks(self.lanes * T::BYTES)
    }

    #[inline]
    fn with_block(&self, block: Block) -> Self {
        Self {
            block,
            lanes: self.lanes,
            _lane: PhantomData,
        }
    }

    #[inline]
    pub fn and(self, other: Self) -> Self {
        debug_assert_eq!(self.lanes, other.lanes);
        self.with_block(and_block(&self.block, &other.block, self.chunks()))
    }

    #[inline]
    pub fn or(self, other: Self) -> Self {
        debug_assert_eq!(self.lanes, other.lanes);
        self.with_block(or_block(&self.block, &other.block, self.chunks()))
    }

    #[inline]
    pub fn xor(self, other: Self) -> Self {
        debug_assert_eq!(self.lanes, other.lanes);
        self.with_block(xor_block(&self.block, &other.block, self.chunks()))
    }

    /// `!self & other`.
    #[inline]
    pub fn and_not(self, other: Self) -> Self {
        debug_assert_eq!(self.lanes, other.lanes);
        self.with_block(andnot_block(&self.block, &other.block, self.chunks()))
    }

    /// Per-bit `mask ? yes : no`. Callers outside this module go through
    /// `FullBitVector`, which carries the saturation invariant.
    #[inline]
    pub(crate) fn bitwise_if_then_else(mask: Self, yes: Self, no: Self) -> Self {
        debug_assert_eq!(mask.lanes, yes.lanes);
        debug_assert_eq!(mask.lanes, no.lanes);
        mask.with_block(blend_block(&mask.block, &yes.block, &no.block, mask.chunks()))
    }

    /// Reinterpret the lane bit patterns as a same-width type.
    #[inline]
    pub fn bitcast<U: Lane>(self) -> Vector<U> {
        assert_eq!(
            T::BYTES,
            U::BYTES,
            "bitcast between {} and {} changes lane width",
            T::TYPE,
            U::TYPE
        );
        Vector {
            block: self.block,
            lanes: self.lanes,
            _lane: PhantomData,
        }
    }

    /// Shift each lane's bit pattern left; bits past the lane width are lost.
    pub fn shift_left(self, amount: u32) -> Self {
        debug_assert!((amount as usize) < 8 * T::BYTES);
        Self::from_fn(self.descriptor(), |i| {
            T::from_bits((self.lane(i).to_bits() << amount) & T::all_ones_bits())
        })
    }

    /// Numeric per-lane `==`; `+0.0 == -0.0` and NaN is never equal.
    pub fn simd_eq(self, other: Self) -> Mask<T> {
        debug_assert_eq!(self.lanes, other.lanes);
        Mask::from_fn(self.descriptor(), |i| self.lane(i) == other.lane(i))
    }

    pub fn simd_gt(self, other: Self) -> Mask<T> {
        debug_assert_eq!(self.lanes, other.lanes);
        Mask::from_fn(self.descriptor(), |i| self.lane(i) > other.lane(i))
    }

    pub fn simd_lt(self, other: Self) -> Mask<T> {
        debug_assert_eq!(self.lanes, other.lanes);
        Mask::from_fn(self.descriptor(), |i| self.lane(i) < other.lane(i))
    }

    fn interleave(self, other: Self, upper: bool) -> Self {
        debug_assert_eq!(self.lanes, other.lanes);
        let block_lanes = (CHUNK_BYTES / T::BYTES).min(self.lanes);
        let half = block_lanes / 2;
        if half == 0 {
            return self;
        }
        let mut out = Self::zero(self.descriptor());
        for base in (0..self.lanes).step_by(block_lanes) {
            let src = if upper { base + half } else { base };
            for k in 0..half {
                write_lane(&mut out.block, base + 2 * k, self.lane(src + k));
                write_lane(&mut out.block, base + 2 * k + 1, other.lane(src + k));
            }
        }
        out
    }

    /// Interleave the lower halves of each 128-bit block:
    /// `[a0, b0, a1, b1, ...]`. A single-lane vector is returned unchanged.
    pub fn interleave_lower(self, other: Self) -> Self {
        self.interleave(other, false)
    }

    /// Interleave the upper halves of each 128-bit block.
    pub fn interleave_upper(self, other: Self) -> Self {
        self.interleave(other, true)
    }

    /// Lane-wise bit-pattern equality.
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
            && (0..self.lanes).all(|i| self.lane(i).to_bits() == other.lane(i).to_bits())
    }
}

impl<T: SignedLane> Vector<T> {
    /// Only the most significant bit of each lane set.
    pub fn sign_bit(d: Descriptor<T>) -> Self {
        Self::from_fn(d, |_| T::from_bits(T::sign_bit_mask()))
    }

    /// `1, 2, 3, ...`
    pub fn positive_iota(d: Descriptor<T>) -> Self {
        Self::iota(d, 1.0)
    }

    pub fn neg(self) -> Self {
        Self::from_fn(self.descriptor(), |i| self.lane(i).negate())
    }

    /// Replicate each lane's sign bit across the whole lane.
    pub fn broadcast_sign_bit(self) -> FullBitVector<T> {
        FullBitVector(Self::from_fn(self.descriptor(), |i| {
            if self.lane(i).has_sign_bit() {
                T::from_bits(T::all_ones_bits())
            } else {
                T::zero()
            }
        }))
    }
}

impl<T: Lane> PartialEq for Vector<T> {
    /// Bit-exact, so `-0.0 != +0.0` and identical NaNs compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.bits_eq(other)
    }
}

impl<T: Lane> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector<{} x {}>", T::TYPE, self.lanes)?;
        f.debug_list().entries(self.to_vec()).finish()
    }
}

/// Logical per-lane predicate.
#[derive(Clone, Copy)]
pub struct Mask<T: Lane> {
    bits: [bool; MAX_LANES],
    lanes: usize,
    _lane: PhantomData<T>,
}

impl<T: Lane> Mask<T> {
    pub fn from_fn(d: Descriptor<T>, mut f: impl FnMut(usize) -> bool) -> Self {
        let mut bits = [false; MAX_LANES];
        for (i, bit) in bits.iter_mut().take(d.lanes()).enumerate() {
            *bit = f(i);
        }
        Self {
            bits,
            lanes: d.lanes(),
            _lane: PhantomData,
        }
    }

    /// Panics if `bools` is shorter than the descriptor.
    pub fn from_bools(d: Descriptor<T>, bools: &[bool]) -> Self {
        assert!(bools.len() >= d.lanes());
        Self::from_fn(d, |i| bools[i])
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.lanes, "mask lane {} out of range for {} lanes", i, self.lanes);
        self.bits[i]
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    #[cfg(test)]
    pub fn count_true(&self) -> usize {
        self.bits[..self.lanes].iter().filter(|&&b| b).count()
    }

    pub fn not(self) -> Self {
        Self::from_fn(Descriptor::new(self.lanes), |i| !self.bits[i])
    }

    /// Reuse this predicate for a differently-typed vector with the same lane
    /// count, e.g. a mask computed on signed integers applied to floats.
    pub fn rebind<U: Lane>(self, d: Descriptor<U>) -> Mask<U> {
        debug_assert_eq!(self.lanes, d.lanes(), "rebind changes lane count");
        Mask {
            bits: self.bits,
            lanes: d.lanes(),
            _lane: PhantomData,
        }
    }

    /// The single explicit Mask -> FullBitVector conversion.
    pub fn to_full_bits(self) -> FullBitVector<T> {
        let d = Descriptor::new(self.lanes);
        FullBitVector(Vector::from_fn(d, |i| {
            if self.bits[i] {
                T::from_bits(T::all_ones_bits())
            } else {
                T::zero()
            }
        }))
    }
}

impl<T: Lane> PartialEq for Mask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes && self.bits[..self.lanes] == other.bits[..other.lanes]
    }
}

impl<T: Lane> fmt::Debug for Mask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask<{} x {}>", T::TYPE, self.lanes)?;
        f.debug_list().entries(&self.bits[..self.lanes]).finish()
    }
}

/// A vector whose lanes are each all-ones or all-zeros.
#[derive(Clone, Copy, PartialEq)]
pub struct FullBitVector<T: Lane>(Vector<T>);

impl<T: Lane> FullBitVector<T> {
    /// Wrap a vector the caller knows to be saturated. Any other lane pattern
    /// is a contract violation, checked in debug builds only.
    pub fn from_vector(v: Vector<T>) -> Self {
        debug_assert!(
            Self::is_saturated(&v),
            "full-bit predicate has a lane that is neither all-ones nor all-zeros: {:?}",
            v
        );
        Self(v)
    }

    /// True when every lane is all-ones or all-zeros.
    pub fn is_saturated(v: &Vector<T>) -> bool {
        (0..v.lanes()).all(|i| {
            let bits = v.lane(i).to_bits();
            bits == 0 || bits == T::all_ones_bits()
        })
    }

    #[inline]
    pub fn as_vector(&self) -> Vector<T> {
        self.0
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.0.lanes()
    }

    #[inline]
    pub fn is_set(&self, i: usize) -> bool {
        self.0.lane(i).to_bits() != 0
    }

    pub fn to_mask(self) -> Mask<T> {
        Mask::from_fn(self.0.descriptor(), |i| self.is_set(i))
    }
}

impl<T: Lane> fmt::Debug for FullBitVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FullBitVector<{} x {}>", T::TYPE, self.lanes())?;
        f.debug_list()
            .entries((0..self.lanes()).map(|i| self.is_set(i)))
            .finish()
    }
}
