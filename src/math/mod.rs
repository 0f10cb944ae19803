pub mod bit_math;
pub mod constants;
pub mod dispatch;
pub mod inverse;
pub mod newton_plus;
pub mod rounding;
pub mod seed;
pub mod utils;
