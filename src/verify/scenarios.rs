//! Scenario generators, one per primitive.
//!
//! A scenario is a zero-sized value that knows how to check its primitive on
//! one descriptor. The trait it implements decides which element types it
//! can be instantiated for, mirroring the type family of the primitive.

use crate::select::{
    clamp_negative_to_zero, negate_if_sign_bit, select, select_by_full_bits, select_by_sign_bit,
    select_or_zero, zero_or_select,
};
use crate::simd_abstraction::{
    Descriptor, FloatLane, FullBitVector, Lane, Mask, SignedLane, Vector,
};

use super::compare::Mismatch;
use super::oracle::Oracle;

/// Checks that hold for every lane type.
pub trait LaneScenario: Copy + Send + Sync + 'static {
    fn check<T: Lane>(self, d: Descriptor<T>, oracle: &mut Oracle) -> Result<(), Mismatch>;
}

/// Checks for types with a sign bit: signed integers and IEEE floats.
pub trait SignedScenario: Copy + Send + Sync + 'static {
    fn check<T: SignedLane>(self, d: Descriptor<T>, oracle: &mut Oracle)
    -> Result<(), Mismatch>;
}

/// Checks for IEEE floats only.
pub trait FloatScenario: Copy + Send + Sync + 'static {
    fn check<T: FloatLane>(self, d: Descriptor<T>, oracle: &mut Oracle) -> Result<(), Mismatch>;
}

/// Bit patterns a blend must carry untouched: for floats negative zero,
/// NaNs with payloads of either sign and the smallest negative subnormal;
/// for integers `MIN`, `-1`, `MAX` and `MIN + 1`. The second operand is the
/// first rotated by one, so the two never agree in a lane.
fn special_operands<T: Lane>(n: usize) -> (Vec<T>, Vec<T>) {
    let patterns = [
        T::sign_bit_mask(),
        T::all_ones_bits(),
        T::all_ones_bits() >> 1,
        T::sign_bit_mask() | 1,
    ];
    let lanes = |offset: usize| -> Vec<T> {
        (0..n)
            .map(|i| T::from_bits(patterns[(i + offset) % patterns.len()]))
            .collect()
    };
    (lanes(0), lanes(1))
}

/// `select`, `select_or_zero` and `zero_or_select` on random masks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskSelectScenario;

impl LaneScenario for MaskSelectScenario {
    fn check<T: Lane>(self, d: Descriptor<T>, oracle: &mut Oracle) -> Result<(), Mismatch> {
        let di = d.rebind::<T::Signed>();
        let n = d.lanes();
        let mut in1 = vec![T::zero(); n];
        let mut in2 = vec![T::zero(); n];
        let mut bool_lanes = vec![<T::Signed as Lane>::zero(); n];
        let mut expected = vec![T::zero(); n];

        let (special1, special2) = special_operands::<T>(n);
        let alternating = Mask::from_fn(d, |i| i % 2 == 0);
        let expected_special: Vec<T> = (0..n)
            .map(|i| if i % 2 == 0 { special1[i] } else { special2[i] })
            .collect();
        let s1 = Vector::load(d, &special1);
        let s2 = Vector::load(d, &special2);
        oracle.assert_lanes_eq("select special", &expected_special, select(alternating, s1, s2))?;
        oracle.assert_vec_eq(
            "select special inverted",
            select(alternating, s2, s1),
            select(alternating.not(), s1, s2),
        )?;

        // Each lane should have a chance of having mask=true.
        oracle.repeat(|oracle| {
            for i in 0..n {
                in1[i] = oracle.random_data();
                in2[i] = oracle.random_data();
                let truth = if oracle.coin() { 1.0 } else { 0.0 };
                bool_lanes[i] = <T::Signed as Lane>::from_f64(truth);
            }

            let v1 = Vector::load(d, &in1);
            let v2 = Vector::load(d, &in2);
            let mask = Vector::load(di, &bool_lanes)
                .simd_gt(Vector::zero(di))
                .rebind(d);

            for i in 0..n {
                expected[i] = if bool_lanes[i].is_zero() { in2[i] } else { in1[i] };
            }
            oracle.assert_lanes_eq("select", &expected, select(mask, v1, v2))?;

            for i in 0..n {
                expected[i] = if bool_lanes[i].is_zero() { T::zero() } else { in1[i] };
            }
            oracle.assert_lanes_eq("select_or_zero", &expected, select_or_zero(mask, v1))?;

            for i in 0..n {
                expected[i] = if bool_lanes[i].is_zero() { in2[i] } else { T::zero() };
            }
            oracle.assert_lanes_eq("zero_or_select", &expected, zero_or_select(mask, v2))
        })
    }
}

/// `select_by_full_bits` on random all-ones/all-zeros lanes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullBitsScenario;

impl LaneScenario for FullBitsScenario {
    fn check<T: Lane>(self, d: Descriptor<T>, oracle: &mut Oracle) -> Result<(), Mismatch> {
        let du = d.rebind::<T::Unsigned>();
        let n = d.lanes();
        let all_ones = <T::Unsigned as Lane>::from_bits(T::all_ones_bits());
        let mut in1 = vec![T::zero(); n];
        let mut in2 = vec![T::zero(); n];
        let mut vec_lanes = vec![<T::Unsigned as Lane>::zero(); n];
        let mut expected = vec![T::zero(); n];

        let (special1, special2) = special_operands::<T>(n);
        let alternating = Mask::from_fn(d, |i| i % 2 == 1).to_full_bits();
        let expected_special: Vec<T> = (0..n)
            .map(|i| if i % 2 == 1 { special1[i] } else { special2[i] })
            .collect();
        oracle.assert_lanes_eq(
            "select_by_full_bits special",
            &expected_special,
            select_by_full_bits(
                alternating,
                Vector::load(d, &special1),
                Vector::load(d, &special2),
            ),
        )?;

        oracle.repeat(|oracle| {
            for i in 0..n {
                in1[i] = oracle.random_data();
                in2[i] = oracle.random_data();
                vec_lanes[i] = if oracle.coin() {
                    all_ones
                } else {
                    <T::Unsigned as Lane>::zero()
                };
            }

            let v1 = Vector::load(d, &in1);
            let v2 = Vector::load(d, &in2);
            let bits = FullBitVector::from_vector(Vector::load(du, &vec_lanes).bitcast::<T>());

            for i in 0..n {
                expected[i] = if vec_lanes[i].is_zero() { in2[i] } else { in1[i] };
            }
            let actual = select_by_full_bits(bits, v1, v2);
            oracle.assert_lanes_eq("select_by_full_bits", &expected, actual)?;

            // The equivalent logical mask selects the same lanes
            oracle.assert_vec_eq(
                "select_by_full_bits vs select",
                select(bits.to_mask(), v1, v2),
                actual,
            )
        })
    }
}

/// `clamp_negative_to_zero` on fixed ramps, signed zero and random values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampScenario;

impl FloatScenario for ClampScenario {
    fn check<T: FloatLane>(self, d: Descriptor<T>, oracle: &mut Oracle) -> Result<(), Mismatch> {
        let v0 = Vector::zero(d);
        let vp = Vector::iota(d, 1.0);
        // assumes N < 10^4
        let vn = Vector::iota(d, -1e4);

        // Zero and positive remain unchanged
        oracle.assert_vec_eq("clamp zero", v0, clamp_negative_to_zero(v0))?;
        oracle.assert_vec_eq("clamp positive", vp, clamp_negative_to_zero(vp))?;

        // Negative are all replaced with zero
        oracle.assert_vec_eq("clamp negative", v0, clamp_negative_to_zero(vn))?;

        // -0.0 is not less than zero
        let negative_zero = Vector::set(d, T::zero().negate());
        oracle.assert_vec_eq(
            "clamp negative zero",
            negative_zero,
            clamp_negative_to_zero(negative_zero),
        )?;

        let n = d.lanes();
        let mut lanes = vec![T::zero(); n];
        let mut expected = vec![T::zero(); n];
        oracle.repeat(|oracle| {
            for i in 0..n {
                let value: T = oracle.random_lane();
                lanes[i] = if oracle.coin() { value.negate() } else { value };
                expected[i] = if lanes[i].is_less_than_zero() {
                    T::zero()
                } else {
                    lanes[i]
                };
            }
            let v = Vector::load(d, &lanes);
            let clamped = clamp_negative_to_zero(v);
            oracle.assert_lanes_eq("clamp random", &expected, clamped)?;
            oracle.assert_vec_eq("clamp idempotent", clamped, clamp_negative_to_zero(clamped))
        })
    }
}

/// `select_by_sign_bit` on every placement of zero/positive/negative
/// operands, XOR-built sign patterns, extreme values and random bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignBitScenario;

impl SignedScenario for SignBitScenario {
    fn check<T: SignedLane>(
        self,
        d: Descriptor<T>,
        oracle: &mut Oracle,
    ) -> Result<(), Mismatch> {
        let v0 = Vector::zero(d);
        let vp = Vector::iota(d, 1.0);
        let vsignbit = Vector::sign_bit(d);
        let vn = vp.or(vsignbit);

        // Zero and positive select the second operand
        oracle.assert_vec_eq("sign zero/neg/zero", v0, select_by_sign_bit(v0, vn, v0))?;
        oracle.assert_vec_eq("sign zero/zero/neg", vn, select_by_sign_bit(v0, v0, vn))?;
        oracle.assert_vec_eq("sign pos/neg/pos", vp, select_by_sign_bit(vp, vn, vp))?;
        oracle.assert_vec_eq("sign pos/pos/neg", vn, select_by_sign_bit(vp, vp, vn))?;

        // Negative select the first operand
        oracle.assert_vec_eq("sign neg/zero/pos", v0, select_by_sign_bit(vn, v0, vp))?;
        oracle.assert_vec_eq("sign neg/neg/zero", vn, select_by_sign_bit(vn, vn, v0))?;
        oracle.assert_vec_eq("sign neg/pos/neg", vp, select_by_sign_bit(vn, vp, vn))?;

        let du = d.rebind::<T::Unsigned>();
        let lane_bits = (8 * T::BYTES) as u32;
        let splat =
            |byte: u64| Vector::set(du, <T::Unsigned as Lane>::from_bits(byte)).bitcast::<T>();

        // Sign bit set on every other lane
        let s1 = Vector::<T::Unsigned>::iota(du, 1.0)
            .shift_left(lane_bits - 1)
            .bitcast::<T>();
        let m1 = vp.xor(s1).xor(splat(0x71));
        let x1 = vp.xor(splat(0x2B));
        let x2 = vp.xor(splat(0xE2));
        let m2 = m1.xor(vsignbit);

        let m1_s = FullBitVector::from_vector(
            m1.bitcast::<T::Signed>()
                .broadcast_sign_bit()
                .as_vector()
                .bitcast::<T>(),
        );
        let expected_1 = select_by_full_bits(m1_s, x1, x2);
        let expected_2 = select_by_full_bits(m1_s, x2, x1);
        oracle.assert_vec_eq("sign xor pattern", expected_1, select_by_sign_bit(m1, x1, x2))?;
        oracle.assert_vec_eq(
            "sign xor pattern flipped",
            expected_2,
            select_by_sign_bit(m2, x1, x2),
        )?;

        let scalar: Vec<T> = (0..d.lanes())
            .map(|i| {
                if m1.lane(i).has_sign_bit() {
                    x1.lane(i)
                } else {
                    x2.lane(i)
                }
            })
            .collect();
        oracle.assert_lanes_eq(
            "sign xor pattern (scalar)",
            &scalar,
            select_by_sign_bit(m1, x1, x2),
        )?;

        // Lowest is negative, highest is not
        let vmin = Vector::set(d, T::lowest());
        let vmax = Vector::set(d, T::highest());
        oracle.assert_vec_eq("sign lowest", vp, select_by_sign_bit(vmin, vp, v0))?;
        oracle.assert_vec_eq("sign highest", v0, select_by_sign_bit(vmax, vp, v0))?;

        let n = d.lanes();
        let mut signs = vec![T::zero(); n];
        let mut yes = vec![T::zero(); n];
        let mut no = vec![T::zero(); n];
        let mut expected = vec![T::zero(); n];
        oracle.repeat(|oracle| {
            for i in 0..n {
                signs[i] = oracle.random_bits();
                yes[i] = oracle.random_lane();
                no[i] = oracle.random_lane();
                expected[i] = if signs[i].has_sign_bit() { yes[i] } else { no[i] };
            }
            let v = Vector::load(d, &signs);
            let actual = select_by_sign_bit(v, Vector::load(d, &yes), Vector::load(d, &no));
            oracle.assert_lanes_eq("sign random", &expected, actual)?;
            oracle.assert_vec_eq("sign identity", v, select_by_sign_bit(v, v, v))
        })
    }
}

/// `negate_if_sign_bit` on ramps and their negation, zero operands, extreme
/// sign operands, interleaved patterns and random values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegateScenario;

impl NegateScenario {
    /// Interleaving catches lanes leaking into their neighbours. Needs at
    /// least two lanes.
    fn check_interleaved<T: SignedLane>(
        d: Descriptor<T>,
        v1: Vector<T>,
        v2: Vector<T>,
        oracle: &Oracle,
    ) -> Result<(), Mismatch> {
        if d.lanes() < 2 {
            return Ok(());
        }

        let v3 = v1.interleave_lower(v1);
        let v4 = v1.interleave_upper(v1);
        let v5 = v1.interleave_lower(v2);
        let v6 = v1.interleave_upper(v2);
        let v7 = v2.interleave_lower(v1);
        let v8 = v2.interleave_upper(v1);

        // Negating the negative lanes restores the positive interleave
        oracle.assert_vec_eq("negate v3 by v3", v3, negate_if_sign_bit(v3, v3))?;
        oracle.assert_vec_eq("negate v4 by v4", v4, negate_if_sign_bit(v4, v4))?;
        oracle.assert_vec_eq("negate v5 by v5", v3, negate_if_sign_bit(v5, v5))?;
        oracle.assert_vec_eq("negate v6 by v6", v4, negate_if_sign_bit(v6, v6))?;
        oracle.assert_vec_eq("negate v7 by v7", v3, negate_if_sign_bit(v7, v7))?;
        oracle.assert_vec_eq("negate v8 by v8", v4, negate_if_sign_bit(v8, v8))?;

        // Positive sign operands leave the interleave untouched
        oracle.assert_vec_eq("negate v5 by v3", v5, negate_if_sign_bit(v3, v5))?;
        oracle.assert_vec_eq("negate v6 by v4", v6, negate_if_sign_bit(v4, v6))?;
        oracle.assert_vec_eq("negate v7 by v3", v7, negate_if_sign_bit(v3, v7))?;
        oracle.assert_vec_eq("negate v8 by v4", v8, negate_if_sign_bit(v4, v8))?;

        let zero = Vector::zero(d);
        for (name, v) in [
            ("negate zero by v3", v3),
            ("negate zero by v4", v4),
            ("negate zero by v5", v5),
            ("negate zero by v6", v6),
            ("negate zero by v7", v7),
            ("negate zero by v8", v8),
        ] {
            oracle.assert_vec_eq(name, zero, negate_if_sign_bit(v, zero))?;
        }
        Ok(())
    }
}

impl SignedScenario for NegateScenario {
    fn check<T: SignedLane>(
        self,
        d: Descriptor<T>,
        oracle: &mut Oracle,
    ) -> Result<(), Mismatch> {
        let v1 = Vector::positive_iota(d);
        let v2 = v1.neg();

        oracle.assert_vec_eq("negate v1 by v1", v1, negate_if_sign_bit(v1, v1))?;
        oracle.assert_vec_eq("negate v2 by v1", v2, negate_if_sign_bit(v1, v2))?;
        oracle.assert_vec_eq("negate v1 by v2", v2, negate_if_sign_bit(v2, v1))?;
        oracle.assert_vec_eq("negate v2 by v2", v1, negate_if_sign_bit(v2, v2))?;

        let zero = Vector::zero(d);
        oracle.assert_vec_eq("negate zero by zero", zero, negate_if_sign_bit(zero, zero))?;
        oracle.assert_vec_eq("negate zero by v1", zero, negate_if_sign_bit(v1, zero))?;
        oracle.assert_vec_eq("negate zero by v2", zero, negate_if_sign_bit(v2, zero))?;

        let vmin = Vector::set(d, T::lowest());
        let vmax = Vector::set(d, T::highest());
        oracle.assert_vec_eq("negate v1 by lowest", v2, negate_if_sign_bit(vmin, v1))?;
        oracle.assert_vec_eq("negate v2 by lowest", v1, negate_if_sign_bit(vmin, v2))?;
        oracle.assert_vec_eq("negate v1 by highest", v1, negate_if_sign_bit(vmax, v1))?;
        oracle.assert_vec_eq("negate v2 by highest", v2, negate_if_sign_bit(vmax, v2))?;

        Self::check_interleaved(d, v1, v2, oracle)?;

        let n = d.lanes();
        let mut signs = vec![T::zero(); n];
        let mut values = vec![T::zero(); n];
        let mut expected = vec![T::zero(); n];
        oracle.repeat(|oracle| {
            for i in 0..n {
                signs[i] = oracle.random_bits();
                let value: T = oracle.random_lane();
                // Zero operands (either sign) must come back unchanged
                let value = if oracle.coin() && oracle.coin() {
                    T::zero()
                } else {
                    value
                };
                values[i] = if oracle.coin() { value.negate() } else { value };
                expected[i] = if signs[i].has_sign_bit() && !values[i].is_zero() {
                    values[i].negate()
                } else {
                    values[i]
                };
            }
            let actual = negate_if_sign_bit(Vector::load(d, &signs), Vector::load(d, &values));
            oracle.assert_lanes_eq("negate random", &expected, actual)
        })
    }
}
