// Dispatcher tier cut-offs
pub const NATIVE_LIMIT: u64 = 144_838_757_784_765_629; // ~1.448e17, just under 2^57
pub const SINGLE_NEWTON_LIMIT: f64 = 8.5e37; // ~u64::MAX squared
pub const DOUBLE_NEWTON_LIMIT: f64 = 4.3322e127;
pub const SECOND_NEWTON_STEP_ABOVE: f64 = 2e63;

// Newton-Plus engine
pub const SEED_BITS: i64 = 53;
pub const SEED_MANTISSA_MASK: u64 = 0x1f_ffff_ffff_ffff; // 52 mantissa bits + lowest exponent bit
pub const CLASSIC_NEWTON_SIZE: i64 = 424; // size after the three fixed classic doublings
pub const SHORT_ENGINE_LIMIT: f64 = 4e254; // ~2^845.77
pub const RECIPROCAL_MIN_BITS: i64 = 1 << 15;
pub const EXTRA_BITS_TO_REMOVE: i64 = 2; // 0 fails, 1 is slow
pub const ROUND_UP_CHECK_BITS: i64 = 8;

// Large-number reciprocal
pub const EXTRA_START: i64 = 2;
pub const START_CUTOFF: i64 = 400;
pub const NEWTON_CUTOFF: i64 = 800;
pub const EXTRA_TO_REMOVE1: i64 = 2; // sqrt errors if 0
pub const EXTRA_TO_REMOVE2: i64 = 1; // large-number errors if 0
pub const BOOST_LARGER_NUMS: i64 = 2;
pub const DIVIDE_PHASE_RUN_LIMIT: u64 = 32;
pub const MULTIPLY_PHASE_RUN_LIMIT: u64 = 100;
