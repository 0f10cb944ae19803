use num_bigint::BigInt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqrtError {
    #[error("Domain error: cannot take the square root of negative value {0}")]
    DomainError(BigInt),

    #[error("Could not parse operand: {0}")]
    ParseError(String),

    #[error("Value does not fit in a U256: {0}")]
    U256Overflow(BigInt),
}
