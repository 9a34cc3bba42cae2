//! Simulator errors

use mw_slot_lab::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Invalid simulation parameter: {0}")]
    InvalidParameter(String),
}

pub type SimResult<T> = Result<T, SimError>;
