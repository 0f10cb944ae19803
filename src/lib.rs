pub mod errors;
pub mod math;

pub use errors::SqrtError;

pub use math::dispatch::{Tier, is_sqrt, isqrt, isqrt_unsigned, select_tier};
pub use math::utils::{isqrt_u256, parse_operand, to_bigint, to_u256};
