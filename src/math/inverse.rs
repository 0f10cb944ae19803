use super::bit_math::{low_bits, shift_right, trailing_run_length};
use super::constants::*;
use num_bigint::BigInt;
use num_traits::One;

/// Computes `2^(x_len + final_size) / x` truncated to roughly `final_size + 1`
/// significant bits, for operands far past the division-friendly range.
///
/// Starts from a native-width quotient of a short top window of `x`, grows it
/// with divide-based reciprocal Newton steps `y <- y(2 - xy)` until the width
/// passes [`NEWTON_CUTOFF`], then continues with multiply-only doublings. After
/// each growth step the trailing run of equal bits is trimmed off; if the
/// first trim finds an unusually long run the exact quotient is returned
/// instead.
pub fn inverse_for_large_numbers(x: &BigInt, x_len: i64, final_size: i64) -> BigInt {
    let mut desired_start_size = final_size + 1 + (EXTRA_START * 2);
    while desired_start_size > START_CUTOFF {
        desired_start_size = ((desired_start_size + 1) >> 1) + BOOST_LARGER_NUMS;
    }
    let mut cur_size = desired_start_size;

    let scaled_one = BigInt::one() << ((cur_size << 1) + (EXTRA_START * 2)) as u64;
    let mut result = scaled_one / shift_right(x, x_len - cur_size - 1 - EXTRA_START);
    cur_size += EXTRA_START;

    // Divide-seeded Newton inverse
    loop {
        let double_cur_size = cur_size << 1;

        let scaling_factor = BigInt::one() << (double_cur_size + 1) as u64;
        let x_times_y = shift_right(
            &(shift_right(x, x_len - double_cur_size) * &result),
            cur_size - 1,
        );
        let two_minus_xy = scaling_factor - x_times_y;
        result = shift_right(&(&result * two_minus_xy), cur_size + EXTRA_TO_REMOVE1);
        cur_size = double_cur_size - EXTRA_TO_REMOVE1;

        if cur_size > NEWTON_CUTOFF {
            break;
        }
    }

    match trailing_run_length(&result) {
        Some(run) if run + 1 < DIVIDE_PHASE_RUN_LIMIT => {
            let reduce_by = (run + 1) as i64;
            result = shift_right(&result, reduce_by);
            cur_size -= reduce_by;
        }
        _ => {
            tracing::debug!(
                x_len,
                final_size,
                "Reciprocal ended on a long run of equal bits, using exact division."
            );
            return exact_inverse(x, x_len, final_size);
        }
    }

    // Multiply-only Newton inverse
    loop {
        let double_cur_size = cur_size << 1;

        // Inserts the "1" between the halves.
        result += 1u32;
        let x_times_y = shift_right(
            &(shift_right(x, x_len - double_cur_size) * &result),
            cur_size - 1,
        );
        let correction = &result * low_bits(&x_times_y, cur_size + 1);

        if double_cur_size - EXTRA_TO_REMOVE2 > final_size + 1 {
            let widened = shift_right(&result, -(2 * cur_size));
            return shift_right(&(widened - correction), 3 * cur_size - final_size - 1);
        }

        let widened = shift_right(&result, -double_cur_size);
        result = shift_right(&(widened - correction), cur_size + EXTRA_TO_REMOVE2);
        cur_size = double_cur_size - EXTRA_TO_REMOVE2;

        if let Some(run) = trailing_run_length(&result) {
            if run + 1 < MULTIPLY_PHASE_RUN_LIMIT {
                let reduce_by = (run + 1) as i64;
                result = shift_right(&result, reduce_by);
                cur_size -= reduce_by;
            }
        }
    }
}

/// The reciprocal by plain big-integer division. Slow but always exact.
pub fn exact_inverse(x: &BigInt, x_len: i64, final_size: i64) -> BigInt {
    let scale = if final_size + 1 == 0 { x_len } else { final_size + 1 };
    (BigInt::one() << (x_len + scale - 1) as u64) / x
}
