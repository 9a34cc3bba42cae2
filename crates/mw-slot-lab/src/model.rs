//! Validated, immutable game model

use crate::config::GameConfig;
use crate::evaluator::evaluate_ways;
use crate::free_spins::FreeSpinsRules;
use crate::grid::{Grid, GridGenerator};
use crate::paytable::PayTable;
use crate::symbols::SymbolModel;
use crate::wild::WildReels;
use crate::win_tiers::WinTierThresholds;

/// Compiled form of a [`GameConfig`].
///
/// Only [`GameConfig::validate`] builds one, so every table inside is known
/// to be consistent. Read-only after construction and shareable across
/// threads.
#[derive(Debug, Clone)]
pub struct GameModel {
    config: GameConfig,
    symbols: SymbolModel,
    paytable: PayTable,
    generator: GridGenerator,
    free_spins: FreeSpinsRules,
}

impl GameModel {
    pub(crate) fn new(
        config: GameConfig,
        symbols: SymbolModel,
        paytable: PayTable,
        generator: GridGenerator,
        free_spins: FreeSpinsRules,
    ) -> Self {
        Self {
            config,
            symbols,
            paytable,
            generator,
            free_spins,
        }
    }

    /// The config this model was built from
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbols(&self) -> &SymbolModel {
        &self.symbols
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn generator(&self) -> &GridGenerator {
        &self.generator
    }

    pub fn free_spins(&self) -> &FreeSpinsRules {
        &self.free_spins
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.generator.rows()
    }

    #[inline]
    pub fn reels(&self) -> usize {
        self.generator.reels()
    }

    pub fn buy_cost_multiplier(&self) -> f64 {
        self.config.buy_cost_multiplier
    }

    pub fn win_tiers(&self) -> &WinTierThresholds {
        &self.config.win_tiers
    }

    /// Ways win of `grid` against this model's pay table
    pub fn evaluate(&self, grid: &Grid, wild_reels: WildReels) -> f64 {
        evaluate_ways(grid, &self.paytable, wild_reels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_model_is_shareable() {
        assert_send_sync::<GameModel>();
    }

    #[test]
    fn test_model_accessors() {
        let model = GameConfig::default().validate().unwrap();
        assert_eq!(model.name(), "Mixtape Megaways");
        assert_eq!(model.buy_cost_multiplier(), 130.0);
        assert_eq!(model.win_tiers().big_win, 30.0);
        assert_eq!(model.free_spins().starting_spins(), 10);
        assert_eq!(model.generator().max_scatters(), 3);

        let grid: Grid = "CCCDE/CFGHI/DEFGH/IHGFE".parse().unwrap();
        assert_eq!(model.evaluate(&grid, WildReels::NONE), 2.0);
    }
}
