//! Error types for the payout engine

use thiserror::Error;

use crate::free_spins::SessionState;
use crate::symbols::Symbol;

/// Configuration errors. Always fatal: a model is never built from a config
/// that fails validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Config I/O error: {0}")]
    Io(String),

    #[error("Invalid grid: {rows} rows x {reels} reels (rows 1..={max_rows}, reels 3..={max_reels})")]
    GridDimensions {
        rows: u8,
        reels: u8,
        max_rows: u8,
        max_reels: u8,
    },

    #[error("Probability for {symbol} must be finite and in [0, 1], got {value}")]
    ProbabilityOutOfRange { symbol: Symbol, value: f64 },

    #[error("Missing probability for symbol {0}")]
    MissingProbability(Symbol),

    #[error("Duplicate probability for symbol {0}")]
    DuplicateProbability(Symbol),

    #[error("Paying symbol probabilities must sum to 1 (±1e-9), got {0}")]
    ProbabilitySum(f64),

    #[error("Scatter acceptance probability {acceptance:.6} is too low; grid rejection sampling would stall")]
    ScatterRejection { acceptance: f64 },

    #[error("Pay table entry for {symbol} uses count {count}; counts must be in 3..=6")]
    PayTableCount { symbol: Symbol, count: u8 },

    #[error("Pay table entry references the scatter, which never pays ways")]
    PayTableScatter,

    #[error("Pay table entry ({symbol}, {count}) has invalid payout {pay}")]
    PayTableValue { symbol: Symbol, count: u8, pay: f64 },

    #[error("Duplicate pay table entry ({symbol}, {count})")]
    PayTableDuplicate { symbol: Symbol, count: u8 },

    #[error("Invalid distribution '{name}': {reason}")]
    Distribution { name: &'static str, reason: String },

    #[error("Invalid free spins setting: {0}")]
    FreeSpins(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Operations on a free-spins session in the wrong state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Free spins session is not running (state: {0:?})")]
    NotRunning(SessionState),

    #[error("Free spins session already started (state: {0:?})")]
    AlreadyStarted(SessionState),
}

/// Malformed hand-built grids
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(char),
}
