//! Unit tests for the SIMD abstraction layer.

use super::{Descriptor, FullBitVector, Lane, Mask, SignedLane, Vector};
use half::{bf16, f16};

/// Test load/store and lane access
#[test]
fn test_load_store_round_trip() {
    let d = Descriptor::<i16>::new(8);
    let input = [1i16, -2, 3, -4, 5, -6, 7, i16::MIN];
    let v = Vector::load(d, &input);

    let mut out = [0i16; 8];
    v.store(&mut out);
    assert_eq!(out, input);
    assert_eq!(v.lane(7), i16::MIN);
    assert_eq!(v.to_vec(), input.to_vec());
}

/// Test constructors
#[test]
fn test_zero_set_iota() {
    let d = Descriptor::<f32>::new(4);
    assert_eq!(Vector::zero(d).to_vec(), vec![0.0; 4]);
    assert_eq!(Vector::set(d, 2.5f32).to_vec(), vec![2.5; 4]);
    assert_eq!(Vector::iota(d, -2.0).to_vec(), vec![-2.0, -1.0, 0.0, 1.0]);
    assert_eq!(
        Vector::<i8>::positive_iota(Descriptor::new(4)).to_vec(),
        vec![1, 2, 3, 4]
    );
}

/// Test bitwise operations on a partial vector
#[test]
fn test_bitwise_ops() {
    let d = Descriptor::<u8>::new(4);
    let a = Vector::load(d, &[0b1100, 0xFF, 0x0F, 0]);
    let b = Vector::load(d, &[0b1010, 0x0F, 0xF0, 0xFF]);

    assert_eq!(a.and(b).to_vec(), vec![0b1000, 0x0F, 0x00, 0]);
    assert_eq!(a.or(b).to_vec(), vec![0b1110, 0xFF, 0xFF, 0xFF]);
    assert_eq!(a.xor(b).to_vec(), vec![0b0110, 0xF0, 0xFF, 0xFF]);
    assert_eq!(a.and_not(b).to_vec(), vec![0b0010, 0x00, 0xF0, 0xFF]);
}

/// Bitwise ops must work on every lane of the widest vector
#[test]
fn test_bitwise_ops_span_all_chunks() {
    let d = Descriptor::<u64>::new(8);
    let a = Vector::from_fn(d, |i| u64::MAX - i as u64);
    let b = Vector::set(d, 0xFFFF_0000_FFFF_0000u64);
    let and = a.and(b);
    for i in 0..8 {
        assert_eq!(and.lane(i), (u64::MAX - i as u64) & 0xFFFF_0000_FFFF_0000);
    }
}

/// Test bitcast keeps bit patterns
#[test]
fn test_bitcast_preserves_bits() {
    let d = Descriptor::<f32>::new(4);
    let v = Vector::load(d, &[-0.0f32, 1.0, f32::NAN, -2.0]);
    let bits = v.bitcast::<u32>();
    assert_eq!(bits.lane(0), 0x8000_0000);
    assert_eq!(bits.lane(1), 0x3F80_0000);
    assert_eq!(bits.lane(2), f32::NAN.to_bits());
    assert!(bits.bitcast::<f32>().bits_eq(&v));
}

#[test]
#[should_panic]
fn test_bitcast_rejects_width_change() {
    let v = Vector::<u32>::zero(Descriptor::new(2));
    let _ = v.bitcast::<u16>();
}

/// Test the sign-bit constant and its broadcast
#[test]
fn test_sign_bit_and_broadcast() {
    let d = Descriptor::<i32>::new(4);
    let sign = Vector::<i32>::sign_bit(d);
    assert_eq!(sign.to_vec(), vec![i32::MIN; 4]);

    let v = Vector::load(d, &[-5, 0, i32::MIN, 7]);
    let broadcast = v.broadcast_sign_bit();
    assert_eq!(broadcast.as_vector().to_vec(), vec![-1, 0, -1, 0]);

    let df = Descriptor::<f64>::new(2);
    let vf = Vector::load(df, &[-0.0f64, 0.0]);
    let broadcast = vf.broadcast_sign_bit();
    assert!(broadcast.is_set(0));
    assert!(!broadcast.is_set(1));
    assert_eq!(broadcast.as_vector().lane(0).to_bits(), u64::MAX);
}

/// Test negation (wrapping for integers, sign flip for floats)
#[test]
fn test_neg() {
    let d = Descriptor::<i8>::new(4);
    let v = Vector::load(d, &[1i8, -1, 0, i8::MIN]);
    assert_eq!(v.neg().to_vec(), vec![-1, 1, 0, i8::MIN]);

    let d = Descriptor::<f16>::new(2);
    let v = Vector::load(d, &[f16::from_f32(1.5), f16::ZERO]);
    let n = v.neg();
    assert_eq!(n.lane(0), f16::from_f32(-1.5));
    assert_eq!(Lane::to_bits(n.lane(1)), 0x8000);
}

/// Test comparisons producing masks
#[test]
fn test_comparisons() {
    let d = Descriptor::<f32>::new(4);
    let v = Vector::load(d, &[-1.0f32, -0.0, 0.5, f32::NAN]);
    let zero = Vector::zero(d);

    let lt = v.simd_lt(zero);
    assert_eq!(
        (0..4).map(|i| lt.get(i)).collect::<Vec<_>>(),
        vec![true, false, false, false]
    );
    let eq = v.simd_eq(zero);
    assert_eq!(
        (0..4).map(|i| eq.get(i)).collect::<Vec<_>>(),
        vec![false, true, false, false]
    );
    assert_eq!(v.simd_gt(zero).count_true(), 1);
}

/// Interleave works per 128-bit block
#[test]
fn test_interleave_within_blocks() {
    let d = Descriptor::<i32>::new(4);
    let a = Vector::load(d, &[1, 2, 3, 4]);
    let b = Vector::load(d, &[-1, -2, -3, -4]);
    assert_eq!(a.interleave_lower(b).to_vec(), vec![1, -1, 2, -2]);
    assert_eq!(a.interleave_upper(b).to_vec(), vec![3, -3, 4, -4]);

    // Two 128-bit blocks: each block interleaves its own halves
    let d = Descriptor::<i32>::new(8);
    let a = Vector::iota(d, 0.0);
    let b = Vector::iota(d, 100.0);
    assert_eq!(
        a.interleave_lower(b).to_vec(),
        vec![0, 100, 1, 101, 4, 104, 5, 105]
    );
    assert_eq!(
        a.interleave_upper(b).to_vec(),
        vec![2, 102, 3, 103, 6, 106, 7, 107]
    );

    // Partial vectors narrower than a block use the whole vector
    let d = Descriptor::<u8>::new(2);
    let a = Vector::load(d, &[10u8, 11]);
    let b = Vector::load(d, &[20u8, 21]);
    assert_eq!(a.interleave_lower(b).to_vec(), vec![10, 20]);
    assert_eq!(a.interleave_upper(b).to_vec(), vec![11, 21]);
}

#[test]
fn test_shift_left_truncates() {
    let d = Descriptor::<u16>::new(3);
    let v = Vector::load(d, &[1u16, 2, 3]);
    assert_eq!(v.shift_left(15).to_vec(), vec![0x8000, 0, 0x8000]);
}

/// Mask to full-bit conversion and back
#[test]
fn test_mask_full_bits_round_trip() {
    let d = Descriptor::<bf16>::new(4);
    let mask = Mask::from_bools(d, &[true, false, false, true]);
    let bits = mask.to_full_bits();
    assert_eq!(
        bits.as_vector().bitcast::<u16>().to_vec(),
        vec![0xFFFF, 0, 0, 0xFFFF]
    );
    assert_eq!(bits.to_mask(), mask);
    assert_eq!(mask.not().count_true(), 2);
}

/// Masks computed on one type can be re-bound to another of equal lane count
#[test]
fn test_mask_rebind() {
    let di = Descriptor::<i64>::new(2);
    let mask = Vector::load(di, &[1i64, 0]).simd_gt(Vector::zero(di));
    let df = di.rebind::<f64>();
    let rebound = mask.rebind(df);
    assert!(rebound.get(0));
    assert!(!rebound.get(1));
    assert_eq!(rebound.lanes(), 2);
}

#[test]
fn test_full_bit_saturation_check() {
    let d = Descriptor::<u8>::new(3);
    assert!(FullBitVector::is_saturated(&Vector::load(d, &[0u8, 0xFF, 0])));
    assert!(!FullBitVector::is_saturated(&Vector::load(d, &[0u8, 0x7F, 0])));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn test_unsaturated_full_bits_rejected_in_debug() {
    let d = Descriptor::<u8>::new(2);
    let _ = FullBitVector::from_vector(Vector::load(d, &[0x80u8, 0]));
}

#[test]
fn test_vector_equality_is_bit_exact() {
    let d = Descriptor::<f32>::new(1);
    assert_ne!(Vector::set(d, 0.0f32), Vector::set(d, -0.0f32));
    assert_eq!(Vector::set(d, f32::NAN), Vector::set(d, f32::NAN));
    assert_eq!(<f32 as SignedLane>::highest(), f32::MAX);
}
