pub const DEFAULT_GRID_SIZE: usize = 5;
pub const MIN_GRID_SIZE: usize = 2;
pub const DEFAULT_SHUFFLE_STEPS: usize = 7;

pub const AUTO_SOLVE_STEP_MS: u64 = 300;
