use super::bit_math::{low_bits, shift_right};
use super::constants::ROUND_UP_CHECK_BITS;
use num_bigint::BigInt;
use num_traits::Zero;

/// A root estimate cut down to its wanted precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub value: BigInt,
    /// True when the inspected part of the discarded bits was all zeros,
    /// the only case in which the truncation may have rounded up.
    pub dropped_is_zero: bool,
    /// True when the estimate may also sit one below the root.
    pub may_fall_short: bool,
}

impl Truncated {
    /// An estimate known to be the root or one above it.
    pub fn at_most_one_high(value: BigInt) -> Self {
        Self {
            value,
            dropped_is_zero: true,
            may_fall_short: false,
        }
    }

    /// Marks the estimate as possibly one below the root as well.
    pub fn allowing_shortfall(self) -> Self {
        Self {
            may_fall_short: true,
            ..self
        }
    }
}

/// Drops the `oversized_by` low bits of `val`, keeping the high part of the
/// discarded bits as the round-up check.
pub fn shrink_keeping_dropped(val: &BigInt, oversized_by: i64) -> Truncated {
    let dropped = low_bits(val, oversized_by);
    let down_by = if oversized_by < 64 {
        (oversized_by >> 2) + 1
    } else {
        oversized_by - 32
    };

    Truncated {
        value: shift_right(val, oversized_by),
        dropped_is_zero: shift_right(&dropped, down_by).is_zero(),
        may_fall_short: false,
    }
}

/// Drops the `oversized_by` low bits of `val`, probing only the byte that
/// sits just below the cut.
pub fn shrink_checking_low_byte(val: &BigInt, oversized_by: i64) -> Truncated {
    let checked = low_bits(
        &shift_right(val, oversized_by - ROUND_UP_CHECK_BITS),
        ROUND_UP_CHECK_BITS,
    );

    Truncated {
        value: shift_right(val, oversized_by),
        dropped_is_zero: checked.is_zero(),
        may_fall_short: false,
    }
}

/// Outcome of [`settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub root: BigInt,
    /// Steps the estimate's declared error bounds did not account for.
    pub unexpected_steps: u32,
}

/// Moves a truncated estimate onto floor(sqrt(x)).
///
/// The candidate is squared once. A round-up is only expected when the
/// dropped bits were zero, a shortfall only when the estimate allows one; any
/// other step is counted. The same square backs the definitive check, so
/// `root^2 <= x < (root + 1)^2` holds on return whatever the dropped bits said.
pub fn settle(x: &BigInt, estimate: Truncated) -> Settled {
    let Truncated { value: mut val, dropped_is_zero, may_fall_short } = estimate;
    let mut square = &val * &val;
    let mut unexpected_steps = 0;

    let mut expect_step_down = dropped_is_zero;
    while square > *x {
        if !std::mem::take(&mut expect_step_down) {
            unexpected_steps += 1;
        }
        square -= (&val << 1u32) - 1u32;
        val -= 1u32;
    }

    let mut expect_step_up = may_fall_short;
    loop {
        let next_square = &square + (&val << 1u32) + 1u32;
        if next_square > *x {
            break;
        }
        if !std::mem::take(&mut expect_step_up) {
            unexpected_steps += 1;
        }
        square = next_square;
        val += 1u32;
    }

    Settled { root: val, unexpected_steps }
}

/// [`settle`], reporting corrections the estimate's bounds did not predict.
pub fn finalize(x: &BigInt, estimate: Truncated) -> BigInt {
    let settled = settle(x, estimate);
    if settled.unexpected_steps > 0 {
        tracing::warn!(
            bits = x.bits(),
            steps = settled.unexpected_steps,
            "Root estimate was outside its error bounds after rounding."
        );
    }
    settled.root
}

/// [`finalize`] for operands that fit in native integers.
pub fn finalize_native(x: u128, mut val: u128) -> u128 {
    while val.checked_mul(val).is_none_or(|square| square > x) {
        val -= 1;
    }
    while (val + 1).checked_mul(val + 1).is_some_and(|square| square <= x) {
        val += 1;
    }
    val
}
