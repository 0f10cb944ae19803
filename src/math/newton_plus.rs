use super::bit_math::{bit_length, shift_left, shift_right, to_f64_saturating};
use super::constants::*;
use super::inverse::inverse_for_large_numbers;
use super::rounding::{Truncated, finalize, shrink_checking_low_byte, shrink_keeping_dropped};
use super::seed::hardware_seed;
use num_bigint::BigInt;

/// Which refinement the engine uses once the classic doublings are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineBranch {
    /// The 424 bits from the classic doublings already cover the root.
    Classic,
    /// Divide-based Newton-Plus doublings.
    DivideBased,
    /// Division-free doublings against a precomputed reciprocal.
    Reciprocal,
}

impl EngineBranch {
    pub fn select(x_as_f64: f64, x_len: i64) -> Self {
        if x_as_f64 < SHORT_ENGINE_LIMIT {
            EngineBranch::Classic
        } else if x_len > RECIPROCAL_MIN_BITS {
            EngineBranch::Reciprocal
        } else {
            EngineBranch::DivideBased
        }
    }
}

/// A root estimate together with the number of its bits that are meaningful.
///
/// `val` is a fixed-point significand: it stands for `sqrt(x)` scaled so that
/// its top `size` bits line up with the top of the true root.
#[derive(Debug, Clone)]
struct Significand {
    val: BigInt,
    size: i64,
}

/// Layout of the operand that every step aligns against.
#[derive(Debug, Clone, Copy)]
struct Operand<'a> {
    x: &'a BigInt,
    x_len: i64,
    /// Bit length rounded up to even, plus one.
    x_len_mod: i64,
    wanted_precision: i64,
}

impl<'a> Operand<'a> {
    fn new(x: &'a BigInt) -> Self {
        let x_len = bit_length(x);
        Self {
            x,
            x_len,
            x_len_mod: x_len + (x_len & 1) + 1,
            wanted_precision: (x_len + 1) / 2,
        }
    }

    /// The top `3 * size` bits of `x`, aligned against the current estimate.
    fn window(&self, size: i64) -> BigInt {
        shift_right(self.x, self.x_len_mod - 3 * size)
    }
}

/// floor(sqrt(x)) for operands past every native fast path (x >= ~4.33e127).
pub fn newton_plus_sqrt(x: &BigInt) -> BigInt {
    let (_, truncated) = truncated_estimate(x);
    finalize(x, truncated)
}

/// The engine's estimate cut down to the root's width, before rounding.
///
/// The classic and divide-based branches land on the root or one above it,
/// the latter only with `dropped_is_zero` set. The reciprocal branch trims
/// bits on every doubling and may also land one below.
fn truncated_estimate(x: &BigInt) -> (EngineBranch, Truncated) {
    let op = Operand::new(x);
    let branch = EngineBranch::select(to_f64_saturating(x), op.x_len);
    tracing::trace!(x_len = op.x_len, ?branch, "Newton-Plus engine");

    let mut est = seeded_estimate(&op);
    // 106 -> 212 -> 424
    classic_newton_step(&op, &mut est);
    classic_newton_step(&op, &mut est);

    let truncated = match branch {
        EngineBranch::Classic => {
            shrink_checking_low_byte(&est.val, est.size - op.wanted_precision)
        }
        EngineBranch::DivideBased => {
            divide_based_doublings(&op, &mut est);
            shrink_keeping_dropped(&est.val, est.size - op.wanted_precision)
        }
        EngineBranch::Reciprocal => {
            classic_newton_step(&op, &mut est);
            reciprocal_doublings(&op, &mut est);
            shrink_keeping_dropped(&est.val, est.size - op.wanted_precision).allowing_shortfall()
        }
    };

    (branch, truncated)
}

/// The hardware seed refined by one classic step, 106 bits wide.
fn seeded_estimate(op: &Operand) -> Significand {
    let seed = hardware_seed(op.x, op.x_len_mod);
    let seed_big = BigInt::from(seed);
    let val = (&seed_big << (SEED_BITS - 1) as u64) + op.window(SEED_BITS) / &seed_big;
    Significand { val, size: SEED_BITS << 1 }
}

/// `val <- val * 2^(size-1) + window / val`, doubling `size`.
fn classic_newton_step(op: &Operand, est: &mut Significand) {
    let quotient = op.window(est.size) / &est.val;
    est.val = shift_left(&est.val, est.size - 1) + quotient;
    est.size <<= 1;
}

/// One divide-based Newton-Plus doubling: the correction term is
/// `(window - val^2) / val`, which may be negative.
fn newton_plus_step(op: &Operand, est: &mut Significand) {
    let val_sqrd = shift_left(&(&est.val * &est.val), est.size - 1);
    let val_su = op.window(est.size) - val_sqrd;
    est.val = shift_left(&est.val, est.size) + val_su / &est.val;
    est.size <<= 1;
}

fn divide_based_doublings(op: &Operand, est: &mut Significand) {
    let ratio = (op.wanted_precision / est.size).max(1) as u64;
    let num_of_newton_steps = ratio.ilog2() as i64 + 2;

    let starting_size = (op.wanted_precision >> num_of_newton_steps) + 2;
    est.val = shift_right(&est.val, est.size - starting_size);
    est.size = starting_size;

    loop {
        newton_plus_step(op, est);
        if est.size >= op.wanted_precision {
            break;
        }
    }
}

/// Division-free doublings using `x_inv ~ 2^k / x`:
/// `val <- val * (3 - x_inv * val^2) / 2`, each trimmed by
/// [`EXTRA_BITS_TO_REMOVE`].
fn reciprocal_doublings(op: &Operand, est: &mut Significand) {
    // Work backward from the wanted precision to where the loop should start.
    let mut starting_size = op.wanted_precision;
    let mut num_of_newton_steps = 0;
    while starting_size > est.size {
        starting_size = (starting_size >> 1) + EXTRA_BITS_TO_REMOVE;
        num_of_newton_steps += 1;
    }

    est.val = shift_right(&est.val, est.size - starting_size);
    est.size = starting_size;

    let final_size = op.wanted_precision + (4 << num_of_newton_steps) + 4;
    let x_inv_shift = final_size - op.x_len % 2 - 64;
    let x_inv = inverse_for_large_numbers(op.x, op.x_len, final_size - 64);
    let three = BigInt::from(3u32);

    loop {
        est.size <<= 1;
        let x_inv_window = shift_right(&x_inv, x_inv_shift - est.size);
        let val_sqrd = &est.val * &est.val;
        let right_side =
            shift_left(&three, est.size) - shift_right(&(x_inv_window * val_sqrd), est.size);
        est.val = shift_right(
            &(&est.val * right_side),
            (est.size >> 1) + 1 + EXTRA_BITS_TO_REMOVE,
        );
        est.size -= EXTRA_BITS_TO_REMOVE;

        if est.size >= op.wanted_precision {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dispatch::is_sqrt;
    use crate::math::rounding::settle;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn pattern(bits: u64, step: u64) -> BigInt {
        // Dense but irregular bit pattern of exactly `bits` bits.
        let mut x = BigInt::one();
        for i in 1..bits {
            x <<= 1u32;
            if (i * step) % 7 < 3 {
                x += 1u32;
            }
        }
        x
    }

    fn random_root(rng: &mut StdRng, bits: u64) -> BigInt {
        let mut bytes = vec![0u8; bits.div_ceil(8) as usize];
        rng.fill_bytes(&mut bytes);
        BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes) | (BigInt::one() << (bits - 1))
    }

    /// Checks the pre-rounding estimate against the exact root and returns
    /// how far off it was.
    fn check_truncated(x: &BigInt, expected_branch: EngineBranch) -> i64 {
        let (branch, truncated) = truncated_estimate(x);
        assert_eq!(branch, expected_branch, "branch for {} bits", x.bits());

        let root = x.sqrt();
        let offset = &truncated.value - &root;
        let lowest = if truncated.may_fall_short { -1 } else { 0 };
        let offset = i64::try_from(offset).unwrap();
        assert!(
            (lowest..=1).contains(&offset),
            "{:?} estimate off by {} at {} bits",
            branch,
            offset,
            x.bits()
        );
        if offset == 1 {
            assert!(truncated.dropped_is_zero, "unflagged round-up at {} bits", x.bits());
        }

        let settled = settle(x, truncated);
        assert_eq!(settled.root, root);
        assert_eq!(settled.unexpected_steps, 0);
        offset
    }

    #[test]
    fn test_branch_selection() {
        assert_eq!(EngineBranch::select(1e200, 665), EngineBranch::Classic);
        assert_eq!(EngineBranch::select(f64::INFINITY, 2_000), EngineBranch::DivideBased);
        assert_eq!(EngineBranch::select(f64::INFINITY, 1 << 15), EngineBranch::DivideBased);
        assert_eq!(
            EngineBranch::select(f64::INFINITY, (1 << 15) + 1),
            EngineBranch::Reciprocal
        );
    }

    #[test]
    fn test_classic_branch() {
        for bits in [425u64, 426, 500, 700, 845] {
            let x = pattern(bits, 3);
            let root = newton_plus_sqrt(&x);
            assert!(is_sqrt(&x, &root), "failed at {} bits", bits);
        }
    }

    #[test]
    fn test_divide_based_branch() {
        for bits in [847u64, 848, 1_000, 4_097, 10_000, 32_768] {
            let x = pattern(bits, 5);
            let root = newton_plus_sqrt(&x);
            assert!(is_sqrt(&x, &root), "failed at {} bits", bits);
        }
    }

    #[test]
    fn test_reciprocal_branch() {
        for bits in [32_769u64, 40_000, 65_537] {
            let x = pattern(bits, 2);
            let root = newton_plus_sqrt(&x);
            assert!(is_sqrt(&x, &root), "failed at {} bits", bits);
        }
    }

    #[test]
    fn test_perfect_squares_in_every_branch() {
        for bits in [300u64, 600, 5_000, 20_000] {
            let n = pattern(bits, 4);
            let square = &n * &n;
            assert_eq!(newton_plus_sqrt(&square), n);
            assert_eq!(newton_plus_sqrt(&(&square - 1u32)), &n - 1u32);
        }
    }

    #[test]
    fn test_truncated_estimate_within_bounds() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0005);
        let cases = [
            (EngineBranch::Classic, [214u64, 300, 422]),
            (EngineBranch::DivideBased, [500, 3_000, 16_000]),
            (EngineBranch::Reciprocal, [16_385, 17_000, 20_001]),
        ];

        for (branch, root_bits) in cases {
            for bits in root_bits {
                for _ in 0..3 {
                    let n = random_root(&mut rng, bits);
                    let square = &n * &n;
                    check_truncated(&square, branch);
                    check_truncated(&(&square - 1u32), branch);
                    check_truncated(&(&square + &n + &n), branch);
                }
                check_truncated(&pattern(2 * bits, 3), branch);
            }
        }
    }

    #[test]
    fn test_reciprocal_shortfall_is_expected() {
        // Large perfect squares are where the division-free doublings
        // come in one short.
        for bits in [16_400u64, 18_000] {
            let n = pattern(bits, 6);
            let square = &n * &n;
            let (_, truncated) = truncated_estimate(&square);
            assert!(truncated.may_fall_short);
            assert_eq!(settle(&square, truncated).unexpected_steps, 0);
            assert_eq!(newton_plus_sqrt(&square), n);
        }
    }
}
