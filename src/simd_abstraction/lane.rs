//! Element types a vector lane can hold.
//!
//! `Lane` is implemented for every signed and unsigned integer width, the IEEE
//! floats `f16`/`f32`/`f64` and the special `bf16` encoding. All lanes are
//! stored as raw little-endian bit patterns, so `to_bits`/`from_bits` are the
//! only conversions the vector model needs; everything else here exists for the
//! verification harness (random draws, constants, negation).

use half::{bf16, f16};
use std::fmt;

/// Runtime tag for a lane element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
    /// Brain float: 8-bit exponent, 7-bit mantissa. Treated as a special
    /// encoding and kept out of the float and sign-bit scenarios.
    BF16,
}

impl LaneType {
    pub const ALL: [LaneType; 12] = [
        LaneType::I8,
        LaneType::I16,
        LaneType::I32,
        LaneType::I64,
        LaneType::U8,
        LaneType::U16,
        LaneType::U32,
        LaneType::U64,
        LaneType::F16,
        LaneType::F32,
        LaneType::F64,
        LaneType::BF16,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LaneType::I8 => "i8",
            LaneType::I16 => "i16",
            LaneType::I32 => "i32",
            LaneType::I64 => "i64",
            LaneType::U8 => "u8",
            LaneType::U16 => "u16",
            LaneType::U32 => "u32",
            LaneType::U64 => "u64",
            LaneType::F16 => "f16",
            LaneType::F32 => "f32",
            LaneType::F64 => "f64",
            LaneType::BF16 => "bf16",
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            LaneType::I8 | LaneType::U8 => 1,
            LaneType::I16 | LaneType::U16 | LaneType::F16 | LaneType::BF16 => 2,
            LaneType::I32 | LaneType::U32 | LaneType::F32 => 4,
            LaneType::I64 | LaneType::U64 | LaneType::F64 => 8,
        }
    }

    #[cfg(test)]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            LaneType::F16 | LaneType::F32 | LaneType::F64 | LaneType::BF16
        )
    }

    #[cfg(test)]
    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            LaneType::I8 | LaneType::I16 | LaneType::I32 | LaneType::I64
        )
    }

    /// Encodings whose sign/ordering semantics are not plain IEEE.
    pub fn is_special(self) -> bool {
        matches!(self, LaneType::BF16)
    }

    /// Stable ordinal used when deriving per-configuration seeds.
    pub fn ordinal(self) -> u64 {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0) as u64
    }
}

impl fmt::Display for LaneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar element type that can occupy a vector lane.
pub trait Lane:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    const TYPE: LaneType;
    /// Width of one lane in bytes.
    const BYTES: usize;

    /// Same-width signed integer, used to derive masks by comparison.
    type Signed: SignedLane;
    /// Same-width unsigned integer, used for full-bit predicate patterns.
    type Unsigned: Lane;

    /// Raw bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;
    /// Inverse of `to_bits`; bits above the lane width are ignored.
    fn from_bits(bits: u64) -> Self;
    /// Reduces a raw 32-bit random draw to this type: integers truncate,
    /// floats convert numerically after folding into their finite range.
    fn from_random32(r: u32) -> Self;
    /// Numeric conversion used for iota ramps and small constants.
    fn from_f64(v: f64) -> Self;

    /// All bits of one lane set.
    #[inline]
    fn all_ones_bits() -> u64 {
        u64::MAX >> (64 - 8 * Self::BYTES)
    }

    /// The most significant bit of one lane.
    #[inline]
    fn sign_bit_mask() -> u64 {
        1u64 << (8 * Self::BYTES - 1)
    }

    #[inline]
    fn has_sign_bit(self) -> bool {
        self.to_bits() & Self::sign_bit_mask() != 0
    }

    /// Additive identity; all bits zero for every supported type.
    #[inline]
    fn zero() -> Self {
        Self::from_bits(0)
    }

    /// Numeric zero test, so both `+0.0` and `-0.0` count as zero.
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

/// Lanes with a sign: signed integers and IEEE floats.
pub trait SignedLane: Lane {
    /// Integer negation wraps, so `MIN` maps to itself. Float negation flips
    /// the sign bit, NaN payload included.
    fn negate(self) -> Self;
    /// Smallest finite value.
    fn lowest() -> Self;
    /// Largest finite value.
    fn highest() -> Self;
}

/// IEEE float lanes that support a numeric `< 0` test.
pub trait FloatLane: SignedLane {
    #[inline]
    fn is_less_than_zero(self) -> bool {
        self < Self::zero()
    }
}

macro_rules! impl_integer_lane {
    ($t:ty, $tag:ident, $signed:ty, $unsigned:ty) => {
        impl Lane for $t {
            const TYPE: LaneType = LaneType::$tag;
            const BYTES: usize = std::mem::size_of::<$t>();
            type Signed = $signed;
            type Unsigned = $unsigned;

            #[inline]
            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $t
            }

            #[inline]
            fn from_random32(r: u32) -> Self {
                r as $t
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

macro_rules! impl_signed_integer_lane {
    ($($t:ty),*) => {
        $(
            impl SignedLane for $t {
                #[inline]
                fn negate(self) -> Self {
                    self.wrapping_neg()
                }

                #[inline]
                fn lowest() -> Self {
                    <$t>::MIN
                }

                #[inline]
                fn highest() -> Self {
                    <$t>::MAX
                }
            }
        )*
    };
}

impl_integer_lane!(i8, I8, i8, u8);
impl_integer_lane!(i16, I16, i16, u16);
impl_integer_lane!(i32, I32, i32, u32);
impl_integer_lane!(i64, I64, i64, u64);
impl_integer_lane!(u8, U8, i8, u8);
impl_integer_lane!(u16, U16, i16, u16);
impl_integer_lane!(u32, U32, i32, u32);
impl_integer_lane!(u64, U64, i64, u64);

impl_signed_integer_lane!(i8, i16, i32, i64);

macro_rules! impl_float_lane {
    ($t:ty, $tag:ident, $signed:ty, $unsigned:ty, $from_random:expr, $from_f64:expr) => {
        impl Lane for $t {
            const TYPE: LaneType = LaneType::$tag;
            const BYTES: usize = std::mem::size_of::<$t>();
            type Signed = $signed;
            type Unsigned = $unsigned;

            #[inline]
            fn to_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $unsigned)
            }

            #[inline]
            fn from_random32(r: u32) -> Self {
                $from_random(r)
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                $from_f64(v)
            }
        }
    };
}

// f16 overflows above 65504, so fold the draw below that first
impl_float_lane!(
    f16,
    F16,
    i16,
    u16,
    |r: u32| f16::from_f32((r % 65504) as f32),
    f16::from_f64
);
impl_float_lane!(f32, F32, i32, u32, |r: u32| r as f32, |v: f64| v as f32);
impl_float_lane!(f64, F64, i64, u64, |r: u32| r as f64, |v: f64| v);
impl_float_lane!(bf16, BF16, i16, u16, |r: u32| bf16::from_f32(r as f32), bf16::from_f64);

macro_rules! impl_ieee_float_lane {
    ($($t:ty),*) => {
        $(
            impl SignedLane for $t {
                #[inline]
                fn negate(self) -> Self {
                    -self
                }

                #[inline]
                fn lowest() -> Self {
                    <$t>::MIN
                }

                #[inline]
                fn highest() -> Self {
                    <$t>::MAX
                }
            }

            impl FloatLane for $t {}
        )*
    };
}

impl_ieee_float_lane!(f16, f32, f64);
