pub mod select; // Lane-wise conditional selection primitives
pub mod simd_abstraction; // Lane types, descriptors, vectors, masks, engine detection
pub mod verify; // Differential verification harness

pub use select::{
    clamp_negative_to_zero, negate_if_sign_bit, select, select_by_full_bits, select_by_sign_bit,
    select_or_zero, zero_or_select,
};
