//! Lane-wise conditional selection.
//!
//! Every primitive is total and pure: each lane is computed independently and
//! a new vector is returned. They all reduce to one bitwise blend, so their
//! results are bit-exact on every engine, including `-0.0` and NaN payloads.
//!
//! Predicate and data arguments must have the same lane count. That is a
//! caller contract and is only checked in debug builds.

use crate::simd_abstraction::{FloatLane, FullBitVector, Lane, Mask, SignedLane, Vector};

#[inline]
fn debug_assert_same_lanes(predicate: usize, data: usize) {
    debug_assert_eq!(
        predicate, data,
        "predicate has {} lanes but data has {}",
        predicate, data
    );
}

/// `mask[i] ? yes[i] : no[i]`
#[inline]
pub fn select<T: Lane>(mask: Mask<T>, yes: Vector<T>, no: Vector<T>) -> Vector<T> {
    debug_assert_same_lanes(mask.lanes(), yes.lanes());
    select_by_full_bits(mask.to_full_bits(), yes, no)
}

/// `mask[i] ? yes[i] : 0`
#[inline]
pub fn select_or_zero<T: Lane>(mask: Mask<T>, yes: Vector<T>) -> Vector<T> {
    debug_assert_same_lanes(mask.lanes(), yes.lanes());
    mask.to_full_bits().as_vector().and(yes)
}

/// `mask[i] ? 0 : no[i]`
///
/// A set mask lane still means "true"; it is the second operand that survives
/// where the mask is clear.
#[inline]
pub fn zero_or_select<T: Lane>(mask: Mask<T>, no: Vector<T>) -> Vector<T> {
    debug_assert_same_lanes(mask.lanes(), no.lanes());
    mask.to_full_bits().as_vector().and_not(no)
}

/// `(bits & yes) | (!bits & no)`
///
/// Every lane of `bits` must be all-ones or all-zeros; `FullBitVector`
/// construction enforces that in debug builds.
#[inline]
pub fn select_by_full_bits<T: Lane>(
    bits: FullBitVector<T>,
    yes: Vector<T>,
    no: Vector<T>,
) -> Vector<T> {
    debug_assert_same_lanes(bits.lanes(), yes.lanes());
    Vector::bitwise_if_then_else(bits.as_vector(), yes, no)
}

/// `v[i] < 0 ? +0.0 : v[i]`
///
/// Numeric comparison: `-0.0` and NaN are not less than zero and pass through
/// with their bits intact.
#[inline]
pub fn clamp_negative_to_zero<T: FloatLane>(v: Vector<T>) -> Vector<T> {
    let negative = v.simd_lt(Vector::zero(v.descriptor()));
    zero_or_select(negative, v)
}

/// `msb(v[i]) ? yes[i] : no[i]`
///
/// Decided by the sign bit alone, never by `< 0`: `-0.0` and negative NaNs
/// select `yes`, integer `MIN` selects `yes`, `MAX` selects `no`.
#[inline]
pub fn select_by_sign_bit<T: SignedLane>(
    v: Vector<T>,
    yes: Vector<T>,
    no: Vector<T>,
) -> Vector<T> {
    debug_assert_same_lanes(v.lanes(), yes.lanes());
    select_by_full_bits(v.broadcast_sign_bit(), yes, no)
}

/// `msb(v[i]) ? -x[i] : x[i]`, except that a zero `x[i]` (either sign) is
/// returned unchanged.
///
/// Integer `MIN` negates to itself (wrapping).
#[inline]
pub fn negate_if_sign_bit<T: SignedLane>(v: Vector<T>, x: Vector<T>) -> Vector<T> {
    debug_assert_same_lanes(v.lanes(), x.lanes());
    let is_zero = x.simd_eq(Vector::zero(x.descriptor())).to_full_bits();
    let negative = v.broadcast_sign_bit();
    // negative & !zero stays saturated
    let negate = FullBitVector::from_vector(is_zero.as_vector().and_not(negative.as_vector()));
    select_by_full_bits(negate, x.neg(), x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd_abstraction::Descriptor;
    use half::f16;

    #[test]
    fn test_select_picks_per_lane() {
        let d = Descriptor::<u32>::new(4);
        let mask = Mask::from_bools(d, &[true, false, true, false]);
        let a = Vector::load(d, &[1u32, 2, 3, 4]);
        let b = Vector::load(d, &[10u32, 20, 30, 40]);

        assert_eq!(select(mask, a, b).to_vec(), vec![1, 20, 3, 40]);
        assert_eq!(select_or_zero(mask, a).to_vec(), vec![1, 0, 3, 0]);
        assert_eq!(zero_or_select(mask, b).to_vec(), vec![0, 20, 0, 40]);
    }

    #[test]
    fn test_select_preserves_float_bits() {
        let d = Descriptor::<f32>::new(2);
        let nan = f32::from_bits(0xFFC0_1234);
        let mask = Mask::from_bools(d, &[true, false]);
        let a = Vector::load(d, &[nan, 1.0]);
        let b = Vector::load(d, &[2.0f32, -0.0]);
        let r = select(mask, a, b);
        assert_eq!(r.lane(0).to_bits(), 0xFFC0_1234);
        assert_eq!(r.lane(1).to_bits(), 0x8000_0000);
    }

    #[test]
    fn test_zero_fill_is_positive_zero() {
        let d = Descriptor::<f64>::new(2);
        let mask = Mask::from_bools(d, &[false, true]);
        let v = Vector::set(d, -3.0f64);
        assert_eq!(select_or_zero(mask, v).lane(0).to_bits(), 0);
        assert_eq!(zero_or_select(mask, v).lane(1).to_bits(), 0);
    }

    #[test]
    fn test_full_bits_matches_mask() {
        let d = Descriptor::<i16>::new(8);
        let mask = Mask::from_fn(d, |i| i % 3 == 0);
        let a = Vector::iota(d, 0.0);
        let b = Vector::iota(d, -100.0);
        assert_eq!(
            select_by_full_bits(mask.to_full_bits(), a, b),
            select(mask, a, b)
        );
    }

    #[test]
    fn test_clamp_negative_to_zero() {
        let d = Descriptor::<f32>::new(4);
        let v = Vector::load(d, &[-1.0f32, 2.0, -0.0, f32::NAN]);
        let r = clamp_negative_to_zero(v);
        assert_eq!(r.lane(0).to_bits(), 0);
        assert_eq!(r.lane(1), 2.0);
        assert_eq!(r.lane(2).to_bits(), 0x8000_0000);
        assert!(r.lane(3).is_nan());
    }

    #[test]
    fn test_select_by_sign_bit_concrete() {
        let d = Descriptor::<i32>::new(8);
        let v = Vector::load(d, &[5, -3, 0, 7, -1, 2, -8, 4]);
        let a = Vector::set(d, 10);
        let b = Vector::set(d, 20);
        assert_eq!(
            select_by_sign_bit(v, a, b).to_vec(),
            vec![20, 10, 20, 20, 10, 20, 10, 20]
        );
    }

    #[test]
    fn test_select_by_sign_bit_uses_bits_not_order() {
        let d = Descriptor::<f16>::new(4);
        let v = Vector::load(
            d,
            &[f16::NEG_ZERO, f16::ZERO, f16::from_bits(0xFE00), f16::NAN],
        );
        let yes = Vector::set(d, f16::ONE);
        let no = Vector::set(d, f16::ZERO);
        assert_eq!(
            select_by_sign_bit(v, yes, no).to_vec(),
            vec![f16::ONE, f16::ZERO, f16::ONE, f16::ZERO]
        );
    }

    #[test]
    fn test_negate_if_sign_bit() {
        let d = Descriptor::<i8>::new(4);
        let v = Vector::load(d, &[-1i8, 1, -1, i8::MIN]);
        let x = Vector::load(d, &[5i8, 5, 0, i8::MIN]);
        assert_eq!(negate_if_sign_bit(v, x).to_vec(), vec![-5, 5, 0, i8::MIN]);
    }

    #[test]
    fn test_negate_keeps_zero_bits() {
        let d = Descriptor::<f32>::new(3);
        let v = Vector::set(d, -1.0f32);
        let x = Vector::load(d, &[0.0f32, -0.0, 2.0]);
        let r = negate_if_sign_bit(v, x);
        assert_eq!(r.lane(0).to_bits(), 0);
        assert_eq!(r.lane(1).to_bits(), 0x8000_0000);
        assert_eq!(r.lane(2), -2.0);
    }
}
