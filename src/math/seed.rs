use super::bit_math::shift_right;
use super::constants::SEED_MANTISSA_MASK;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Hardware square root of a value that fits in 57 bits.
/// May be one too high near perfect squares above 2^52; callers correct it.
pub fn native_root(x: u64) -> u64 {
    (x as f64).sqrt() as u64
}

/// Hardware square root of the double approximation of an operand,
/// saturating at `u128::MAX` and truncating the fraction.
pub fn double_root(x_as_f64: f64) -> u128 {
    x_as_f64.sqrt() as u128
}

/// Returns a 53-bit estimate of the square root of the top window of `x`.
///
/// The window is `x >> (x_len_mod - 63)`, which always holds 61 or 62 bits
/// because `x_len_mod` is the bit length rounded up to the next even number
/// plus one. Its square root therefore lies in `[2^30, 2^31)`, so the double's
/// biased exponent is odd and the low 53 bits of the IEEE-754 pattern are the
/// significand with its leading one: the root scaled by `2^22`. A root that
/// rounds up to exactly `2^31` yields an all-zero pattern and is replaced by
/// `2^53`.
pub fn hardware_seed(x: &BigInt, x_len_mod: i64) -> u64 {
    let window = shift_right(x, x_len_mod - 63)
        .to_u64()
        .unwrap_or(u64::MAX >> 1);
    let root = (window as f64).sqrt();

    match root.to_bits() & SEED_MANTISSA_MASK {
        0 => 1 << 53,
        significand => significand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn x_len_mod(x: &BigInt) -> i64 {
        let x_len = x.bits() as i64;
        x_len + (x_len & 1) + 1
    }

    #[test]
    fn test_native_root() {
        assert_eq!(native_root(0), 0);
        assert_eq!(native_root(1), 1);
        assert_eq!(native_root(15), 3);
        assert_eq!(native_root(16), 4);
        assert_eq!(native_root(1 << 52), 1 << 26);
    }

    #[test]
    fn test_double_root_saturates() {
        assert_eq!(double_root(1e300), u128::MAX);
        assert_eq!(double_root(81.0), 9);
    }

    #[test]
    fn test_hardware_seed_tracks_window_root() {
        let samples = [
            BigInt::one() << 500u32,
            (BigInt::one() << 501u32) - 1,
            (BigInt::from(3) << 700u32) + 12345,
            BigInt::from(u128::MAX) << 1000u32,
        ];

        for x in samples {
            let shift = x_len_mod(&x) - 63;
            let window = (&x >> (shift as u64)).to_u128().unwrap();
            let expected = (window << 44).isqrt();
            let seed = hardware_seed(&x, x_len_mod(&x)) as u128;

            assert!(seed.abs_diff(expected) <= 1, "seed {} vs {}", seed, expected);
            assert!(seed >= 1 << 52 && seed <= 1 << 53);
        }
    }
}
