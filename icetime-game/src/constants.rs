//! Tuning constants shared across the simulation.

// Clock
pub const PERIOD_LENGTH: u32 = 30;
pub const TICK_SIZE: u32 = 1;
pub const REGULATION_PERIODS: u32 = 3;
/// Ceiling on ticks per match before the match is treated as stalled.
pub const MAX_TICKS: u64 = 200_000;

// Shot resolution
pub const TIP_CHANCE: f64 = 0.25;
pub const TIP_BONUS: f64 = 0.15;
pub const BLOCK_CHANCE: f64 = 0.25;
pub const SCREEN_BONUS: f64 = 0.5;

// Pass resolution
pub const INTERCEPT_CHANCE: f64 = 0.25;

// Faceoffs
pub const FACEOFF_BASE: f64 = 0.5;

// Standings
pub const POINTS_PER_WIN: u32 = 2;
pub const POINTS_PER_OVERTIME_LOSS: u32 = 1;

// Roster generation
pub const MAX_JERSEY_NUMBER: u8 = 99;
