// src/defaults.rs

// Encoding Constants
pub const FEATURE_LEN: usize = 4000;

// Training Constants
pub const EPOCHS: usize = 200;
pub const LEARNING_RATE: f32 = 0.01;
pub const TOLERANCE: f32 = 1e-6;
pub const HIDDEN_SIZE: usize = 32;
pub const BATCH_SIZE: usize = 32;
pub const SEED: u64 = 11;

// Other Constants
pub const VERBOSITY: i32 = 3;
