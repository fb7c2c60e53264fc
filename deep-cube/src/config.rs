// search
pub const EXPLORATION: f32 = 1.0;
pub const VIRTUAL_LOSS: f32 = 0.0;
pub const WORKERS: usize = 1;
pub const MAX_DEPTH: usize = 1_000;

// a*
pub const G_WEIGHT: f32 = 1.0;
pub const A_STAR_BATCH: usize = 1;

// budget
pub const TIME_LIMIT_SECS: f64 = 1.0;
pub const MAX_STATES: usize = 100_000;

// oracle
/// How many times a capacity error may halve the oracle batch before giving up.
pub const MAX_BATCH_SPLITS: u32 = 16;
