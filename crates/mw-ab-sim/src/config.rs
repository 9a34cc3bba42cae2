//! Simulation run configuration

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default spins / rounds per worker chunk
pub const DEFAULT_CHUNK_SIZE: u64 = 10_000;

/// Monte-Carlo run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Base spins (or bonus rounds) to simulate
    pub spins: u64,
    pub bet: f64,
    /// Master seed; drawn from the OS when absent
    pub seed: Option<u64>,
    /// Worker threads; 0 uses every core
    pub threads: usize,
    /// Play triggered free-spins rounds
    pub include_bonus: bool,
    /// Work unit size; each chunk owns its own RNG stream
    pub chunk_size: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 100_000,
            bet: 1.0,
            seed: None,
            threads: 0,
            include_bonus: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spins(mut self, spins: u64) -> Self {
        self.spins = spins;
        self
    }

    pub fn with_bet(mut self, bet: f64) -> Self {
        self.bet = bet;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_bonus(mut self, include_bonus: bool) -> Self {
        self.include_bonus = include_bonus;
        self
    }

    /// Base game only
    pub fn base_only(self) -> Self {
        self.with_bonus(false)
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Worker count after resolving 0 to the core count
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_run(self.spins, self.bet)?;
        if self.chunk_size == 0 {
            return Err(SimError::InvalidParameter("chunk_size must be at least 1".into()));
        }
        Ok(())
    }
}

pub(crate) fn validate_run(count: u64, bet: f64) -> SimResult<()> {
    if count == 0 {
        return Err(SimError::InvalidParameter("at least one spin is required".into()));
    }
    if !bet.is_finite() || bet <= 0.0 {
        return Err(SimError::InvalidParameter(format!("bet must be positive, got {bet}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SimConfig::new()
            .with_spins(500)
            .with_bet(2.0)
            .with_seed(9)
            .with_threads(3)
            .base_only()
            .with_chunk_size(64);

        assert_eq!(config.spins, 500);
        assert_eq!(config.bet, 2.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.worker_threads(), 3);
        assert!(!config.include_bonus);
        assert_eq!(config.chunk_size, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auto_threads() {
        assert!(SimConfig::new().worker_threads() >= 1);
    }

    #[test]
    fn test_validation() {
        assert!(SimConfig::new().with_spins(0).validate().is_err());
        assert!(SimConfig::new().with_bet(0.0).validate().is_err());
        assert!(SimConfig::new().with_bet(f64::NAN).validate().is_err());
        assert!(SimConfig::new().with_chunk_size(0).validate().is_err());
    }
}
