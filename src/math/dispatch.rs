use super::bit_math::to_f64_saturating;
use super::constants::*;
use super::newton_plus::newton_plus_sqrt;
use super::rounding::{Truncated, finalize, finalize_native};
use super::seed::{double_root, native_root};
use crate::errors::SqrtError;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

/// The cheapest strategy able to take the root of an operand, carrying the
/// operand in the form that strategy works on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tier {
    /// Below ~1.448e17: hardware sqrt on the `u64` value.
    Native(u64),
    /// Below ~8.5e37: double seed plus one Newton step in `u128`.
    SingleNewton(u128),
    /// Below ~4.33e127: double seed plus one or two big-integer Newton steps.
    DoubleNewton(f64),
    /// Everything larger.
    NewtonPlus,
}

/// Picks the tier for an operand's magnitude.
pub fn select_tier(x: &BigUint) -> Tier {
    if let Some(x) = x.to_u64().filter(|x| *x < NATIVE_LIMIT) {
        return Tier::Native(x);
    }

    let x_as_f64 = to_f64_saturating(x);
    if x_as_f64 < SINGLE_NEWTON_LIMIT {
        if let Some(x) = x.to_u128() {
            return Tier::SingleNewton(x);
        }
    }
    if x_as_f64 < DOUBLE_NEWTON_LIMIT {
        return Tier::DoubleNewton(x_as_f64);
    }
    Tier::NewtonPlus
}

/// Computes floor(sqrt(x)).
///
/// Returns [`SqrtError::DomainError`] for negative input.
///
/// # Examples
///
/// ```
/// use newton_plus::isqrt;
/// use num_bigint::BigInt;
///
/// assert_eq!(isqrt(&BigInt::from(17)).unwrap(), BigInt::from(4));
/// assert!(isqrt(&BigInt::from(-1)).is_err());
/// ```
pub fn isqrt(x: &BigInt) -> Result<BigInt, SqrtError> {
    if x.is_negative() {
        return Err(SqrtError::DomainError(x.clone()));
    }
    Ok(sqrt_non_negative(x))
}

/// [`isqrt`] for operands that cannot be negative.
pub fn isqrt_unsigned(x: &BigUint) -> BigUint {
    let x = BigInt::from_biguint(Sign::Plus, x.clone());
    sqrt_non_negative(&x).into_parts().1
}

fn sqrt_non_negative(x: &BigInt) -> BigInt {
    if x.is_zero() {
        return BigInt::ZERO;
    }

    let tier = select_tier(x.magnitude());
    tracing::trace!(bits = x.bits(), ?tier, "isqrt dispatch");

    match tier {
        Tier::Native(x) => BigInt::from(finalize_native(x as u128, native_root(x) as u128)),
        Tier::SingleNewton(x) => BigInt::from(single_newton(x)),
        Tier::DoubleNewton(x_as_f64) => double_newton(x, x_as_f64),
        Tier::NewtonPlus => newton_plus_sqrt(x),
    }
}

/// True when `root^2 <= x < (root + 1)^2`.
pub fn is_sqrt(x: &BigInt, root: &BigInt) -> bool {
    if root.is_negative() {
        return false;
    }
    let lower_bound = root * root;
    let upper_bound = &lower_bound + root + root + 1u32;
    *x >= lower_bound && *x < upper_bound
}

fn single_newton(x: u128) -> u128 {
    let seed = double_root(x as f64);
    let val = (seed + x / seed) >> 1;
    finalize_native(x, val)
}

fn double_newton(x: &BigInt, x_as_f64: f64) -> BigInt {
    let mut val = BigInt::from_f64(x_as_f64.sqrt())
        .unwrap_or_else(|| BigInt::one() << (x.bits() / 2));

    val = (&val + x / &val) >> 1u32;
    if x_as_f64 > SECOND_NEWTON_STEP_ABOVE {
        val = (&val + x / &val) >> 1u32;
    }
    finalize(x, Truncated::at_most_one_high(val))
}
