use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

/// Number of bits needed to represent `x`, or 0 if `x` is 0.
pub fn bit_length(x: &BigInt) -> i64 {
    x.bits() as i64
}

/// Arithmetic right shift where a negative `by` shifts left instead.
pub fn shift_right(x: &BigInt, by: i64) -> BigInt {
    if by >= 0 {
        x >> (by as u64)
    } else {
        x << by.unsigned_abs()
    }
}

/// Left shift where a negative `by` shifts right instead.
pub fn shift_left(x: &BigInt, by: i64) -> BigInt {
    shift_right(x, -by)
}

/// The lowest `count` bits of a non-negative `x`.
pub fn low_bits(x: &BigInt, count: i64) -> BigInt {
    if count <= 0 {
        return BigInt::ZERO;
    }
    let mask = (BigInt::one() << (count as u64)) - 1u32;
    x & &mask
}

/// Length of the run of identical bits (all 0s or all 1s) at the bottom of `x`,
/// or `None` when the run never ends (x is 0 or -1).
pub fn trailing_run_length(x: &BigInt) -> Option<u64> {
    if x.bit(0) {
        (x + 1u32).trailing_zeros()
    } else {
        x.trailing_zeros()
    }
}

/// Closest `f64` to `x`; infinities for values past the double range.
pub fn to_f64_saturating<T: ToPrimitive>(x: &T) -> f64 {
    x.to_f64().unwrap_or(f64::INFINITY)
}
