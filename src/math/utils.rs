use super::dispatch::isqrt_unsigned;
use crate::errors::SqrtError;
use alloy_primitives::U256;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Num, Signed};

pub fn to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

pub fn to_u256(value: BigInt) -> Result<U256, SqrtError> {
    if value.is_negative() || value.bits() > 256 {
        return Err(SqrtError::U256Overflow(value));
    }
    let (_, bytes) = value.to_bytes_be();
    let mut padded_bytes = [0u8; 32];
    padded_bytes[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(U256::from_be_bytes(padded_bytes))
}

/// Integer square root of a U256. The root always fits in 128 bits.
pub fn isqrt_u256(x: U256) -> U256 {
    let x = BigUint::from_bytes_be(&x.to_be_bytes::<32>());
    let root = isqrt_unsigned(&x).to_bytes_be();
    let mut padded_bytes = [0u8; 32];
    padded_bytes[32 - root.len()..].copy_from_slice(&root);
    U256::from_be_bytes(padded_bytes)
}

/// Parses a decimal, `0x` hexadecimal or `0b` binary operand, with an optional sign.
pub fn parse_operand(input: &str) -> Result<BigInt, SqrtError> {
    let trimmed = input.trim().replace('_', "");
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed.as_str())),
    };

    let (radix, digits) = if let Some(hex) = unsigned.strip_prefix("0x").or(unsigned.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(bin) = unsigned.strip_prefix("0b").or(unsigned.strip_prefix("0B")) {
        (2, bin)
    } else {
        (10, unsigned)
    };

    if digits.starts_with(['+', '-']) {
        return Err(SqrtError::ParseError(format!("'{}' has a misplaced sign", input.trim())));
    }

    let value = BigInt::from_str_radix(digits, radix)
        .map_err(|e| SqrtError::ParseError(format!("'{}': {}", input.trim(), e)))?;
    Ok(if negative { -value } else { value })
}
