//! Game configuration
//!
//! Every balancing input of the game lives in [`GameConfig`]: grid size,
//! symbol probabilities, pay table, free spins, bonus buy and win tiers.
//! Configs are plain serde data; [`GameConfig::validate`] compiles one into
//! an immutable [`GameModel`] or fails fast.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::binomial_cdf;
use crate::error::ConfigError;
use crate::free_spins::FreeSpinsConfig;
use crate::grid::GridGenerator;
use crate::model::GameModel;
use crate::paytable::{PayEntry, PayTable, standard_pay_entries};
use crate::symbols::{Symbol, SymbolModel};
use crate::win_tiers::WinTierThresholds;

/// Tallest supported grid
pub const MAX_ROWS: u8 = 8;
/// Fewest reels that can still form a 3-of-a-kind
pub const MIN_REELS: u8 = 3;
/// Widest supported grid
pub const MAX_REELS: u8 = 6;

/// Allowed deviation of the paying probabilities from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Below this P(scatters ≤ max) the rejection loop is considered stalled
const MIN_SCATTER_ACCEPTANCE: f64 = 0.01;
const WARN_SCATTER_ACCEPTANCE: f64 = 0.9;

// ═══════════════════════════════════════════════════════════════════════════════
// GRID
// ═══════════════════════════════════════════════════════════════════════════════

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// The shipped 5 reels × 4 rows layout
    pub fn megaways_5x4() -> Self {
        Self { reels: 5, rows: 4 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ROWS).contains(&self.rows) || !(MIN_REELS..=MAX_REELS).contains(&self.reels) {
            return Err(ConfigError::GridDimensions {
                rows: self.rows,
                reels: self.reels,
                max_rows: MAX_ROWS,
                max_reels: MAX_REELS,
            });
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::megaways_5x4()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYMBOLS
// ═══════════════════════════════════════════════════════════════════════════════

/// Relative frequency of one paying symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolWeight {
    pub symbol: Symbol,
    pub probability: f64,
}

/// Symbol distribution as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    /// Relative frequencies of the nine paying symbols, summing to 1.
    /// A cell shows a paying symbol with this probability scaled by
    /// `1 - scatter_probability`.
    pub base_probabilities: Vec<SymbolWeight>,
    /// Per-cell scatter probability
    pub scatter_probability: f64,
    /// Grids with more scatters than this are redrawn
    pub max_scatters: u8,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        use Symbol::*;
        let base = [
            (A, 0.01),
            (B, 0.02),
            (C, 0.05),
            (D, 0.10),
            (E, 0.12),
            (F, 0.17),
            (G, 0.17),
            (H, 0.18),
            (I, 0.18),
        ];

        Self {
            base_probabilities: base
                .into_iter()
                .map(|(symbol, probability)| SymbolWeight { symbol, probability })
                .collect(),
            scatter_probability: 0.013,
            max_scatters: 3,
        }
    }
}

impl SymbolConfig {
    fn compile(&self) -> Result<SymbolModel, ConfigError> {
        let scatter = self.scatter_probability;
        if !scatter.is_finite() || !(0.0..1.0).contains(&scatter) {
            return Err(ConfigError::ProbabilityOutOfRange {
                symbol: Symbol::Scatter,
                value: scatter,
            });
        }

        let mut base = [None; Symbol::PAYING_COUNT];
        for weight in &self.base_probabilities {
            if weight.symbol.is_scatter() {
                return Err(ConfigError::InvalidValue(
                    "scatter belongs in scatter_probability, not base_probabilities".into(),
                ));
            }
            if !weight.probability.is_finite() || !(0.0..=1.0).contains(&weight.probability) {
                return Err(ConfigError::ProbabilityOutOfRange {
                    symbol: weight.symbol,
                    value: weight.probability,
                });
            }
            let slot = &mut base[weight.symbol.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateProbability(weight.symbol));
            }
            *slot = Some(weight.probability);
        }

        let mut probabilities = [0.0; Symbol::COUNT];
        let mut sum = 0.0;
        for symbol in Symbol::PAYING {
            let p = base[symbol.index()].ok_or(ConfigError::MissingProbability(symbol))?;
            sum += p;
            probabilities[symbol.index()] = p * (1.0 - scatter);
        }
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitySum(sum));
        }
        probabilities[Symbol::Scatter.index()] = scatter;

        Ok(SymbolModel::new(probabilities))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GAME
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub grid: GridSpec,
    pub symbols: SymbolConfig,
    pub paytable: Vec<PayEntry>,
    pub free_spins: FreeSpinsConfig,
    /// Bonus buy price as a bet multiplier
    pub buy_cost_multiplier: f64,
    pub win_tiers: WinTierThresholds,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Mixtape Megaways".into(),
            grid: GridSpec::default(),
            symbols: SymbolConfig::default(),
            paytable: standard_pay_entries(),
            free_spins: FreeSpinsConfig::default(),
            buy_cost_multiplier: 130.0,
            win_tiers: WinTierThresholds::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::Parse(format!(
                "unsupported config format '{}' ({})",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every invariant and compile the lookup tables
    pub fn validate(&self) -> Result<GameModel, ConfigError> {
        self.grid.validate()?;
        let rows = self.grid.rows as usize;
        let reels = self.grid.reels as usize;

        let symbols = self.symbols.compile()?;

        let paytable = PayTable::from_entries(&self.paytable)?;
        if let Some(longest) = paytable.longest_count() {
            if longest > self.grid.reels {
                log::warn!(
                    "pay table has {longest}-of-a-kind entries but the grid has only {reels} reels"
                );
            }
        }

        let max_scatters = self.symbols.max_scatters as usize;
        let acceptance = binomial_cdf(
            self.grid.total_positions(),
            max_scatters,
            symbols.scatter_probability(),
        );
        if acceptance < MIN_SCATTER_ACCEPTANCE {
            return Err(ConfigError::ScatterRejection { acceptance });
        }
        if acceptance < WARN_SCATTER_ACCEPTANCE {
            log::warn!(
                "only {:.1}% of drawn grids satisfy the {max_scatters}-scatter cap",
                acceptance * 100.0
            );
        }

        let free_spins = self.free_spins.compile(self.grid, max_scatters)?;

        if !self.buy_cost_multiplier.is_finite() || self.buy_cost_multiplier <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "buy_cost_multiplier must be positive, got {}",
                self.buy_cost_multiplier
            )));
        }
        self.win_tiers.validate()?;

        let generator = GridGenerator::new(&symbols, rows, reels, max_scatters)?;

        log::debug!(
            "validated '{}': {rows}x{reels} grid, scatter acceptance {acceptance:.6}",
            self.name
        );

        Ok(GameModel::new(
            self.clone(),
            symbols,
            paytable,
            generator,
            free_spins,
        ))
    }
}
