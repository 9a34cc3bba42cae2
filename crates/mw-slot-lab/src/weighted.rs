//! Discrete weighted distributions used for game-design tables

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A discrete distribution as written in config: parallel value / weight lists.
/// Weights are relative and need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    pub values: Vec<T>,
    pub weights: Vec<f64>,
}

impl<T: Clone> WeightedTable<T> {
    pub fn new(values: Vec<T>, weights: Vec<f64>) -> Self {
        Self { values, weights }
    }

    /// Compile into a sampler, rejecting empty, mismatched, negative or
    /// all-zero weight lists.
    pub fn compile(&self, name: &'static str) -> Result<WeightedChoice<T>, ConfigError> {
        if self.values.is_empty() {
            return Err(ConfigError::Distribution {
                name,
                reason: "no values".into(),
            });
        }
        if self.values.len() != self.weights.len() {
            return Err(ConfigError::Distribution {
                name,
                reason: format!(
                    "{} values but {} weights",
                    self.values.len(),
                    self.weights.len()
                ),
            });
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ConfigError::Distribution {
                name,
                reason: format!("invalid weight {w}"),
            });
        }

        let index = WeightedIndex::new(self.weights.iter().copied()).map_err(|e| {
            ConfigError::Distribution {
                name,
                reason: e.to_string(),
            }
        })?;

        Ok(WeightedChoice {
            values: self.values.clone(),
            weights: self.weights.clone(),
            index,
        })
    }
}

/// Compiled, immutable sampler over a [`WeightedTable`]
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    values: Vec<T>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedChoice<T> {
    /// Draw one value
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }

    /// Values with their normalised probabilities
    pub fn probabilities(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        let total: f64 = self.weights.iter().sum();
        self.values
            .iter()
            .zip(&self.weights)
            .map(move |(&v, &w)| (v, w / total))
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}
