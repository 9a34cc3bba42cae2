//! Slot Engine — the callable surface for game clients
//!
//! Wraps a [`GameModel`] with an owned, seedable RNG and running session
//! statistics. Clients call [`SlotEngine::spin`] once per base spin and drive
//! [`SlotEngine::advance_free_spins`] until the round reports `finished`.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::analysis;
use crate::buy::{self, BuyOutcome};
use crate::config::GameConfig;
use crate::error::{ConfigError, SessionError};
use crate::evaluator;
use crate::free_spins::{FreeSpinsSession, IterationOutcome};
use crate::grid::Grid;
use crate::model::GameModel;
use crate::wild::WildReels;
use crate::win_tiers::WinTier;

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub base_win: f64,
    pub free_spins_win: f64,
    pub wins: u64,
    pub big_wins: u64,
    pub features_triggered: u64,
    pub bonuses_bought: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return to player as a ratio of total bet
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            self.total_win / self.total_bet
        } else {
            0.0
        }
    }

    /// Fraction of base spins that paid
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.wins as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }

    fn record_ratio(&mut self, ratio: f64) {
        if ratio > self.max_win_ratio {
            self.max_win_ratio = ratio;
        }
    }
}

/// Result of one base spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub bet: f64,
    /// Ways win as a bet multiple
    pub win_multiplier: f64,
    pub win_amount: f64,
    pub scatter_count: usize,
    pub triggers_free_spins: bool,
    pub win_tier: WinTier,
}

/// Megaways payout engine
pub struct SlotEngine {
    model: GameModel,
    rng: ChaCha8Rng,
    stats: SessionStats,
}

impl SlotEngine {
    /// Engine seeded from the OS
    pub fn new(model: GameModel) -> Self {
        Self {
            model,
            rng: ChaCha8Rng::from_os_rng(),
            stats: SessionStats::default(),
        }
    }

    /// Engine with a reproducible RNG stream
    pub fn with_seed(model: GameModel, seed: u64) -> Self {
        Self {
            model,
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: SessionStats::default(),
        }
    }

    /// Validate `config` and build an engine from it
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.validate()?))
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn model(&self) -> &GameModel {
        &self.model
    }

    /// Get session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset session stats
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE GAME
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn generate_grid(&mut self) -> Grid {
        self.model.generator().generate(&mut self.rng)
    }

    pub fn evaluate(&self, grid: &Grid, wild_reels: WildReels) -> f64 {
        self.model.evaluate(grid, wild_reels)
    }

    /// Cells to highlight for a win
    pub fn winning_positions(&self, grid: &Grid, wild_reels: WildReels) -> BTreeSet<(usize, usize)> {
        evaluator::winning_positions(grid, self.model.paytable(), wild_reels)
    }

    /// Play one base spin
    pub fn spin(&mut self, bet: f64) -> SpinOutcome {
        let grid = self.generate_grid();
        let win_multiplier = self.evaluate(&grid, WildReels::NONE);
        let scatter_count = grid.scatter_count();
        let triggers_free_spins = scatter_count == self.model.free_spins().trigger_scatters();
        let win_tier = self.model.win_tiers().classify(win_multiplier);
        let win_amount = win_multiplier * bet;

        self.stats.total_spins += 1;
        self.stats.total_bet += bet;
        self.stats.total_win += win_amount;
        self.stats.base_win += win_amount;
        if win_multiplier > 0.0 {
            self.stats.wins += 1;
        }
        if win_tier == WinTier::BigWin {
            self.stats.big_wins += 1;
        }
        if triggers_free_spins {
            self.stats.features_triggered += 1;
        }
        self.stats.record_ratio(win_multiplier);

        SpinOutcome {
            grid,
            bet,
            win_multiplier,
            win_amount,
            scatter_count,
            triggers_free_spins,
            win_tier,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FREE SPINS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A running free-spins round at `bet`
    pub fn start_free_spins(&self, bet: f64) -> FreeSpinsSession {
        FreeSpinsSession::running(self.model.free_spins(), bet)
    }

    /// Play the next free spin of `session`
    pub fn advance_free_spins(
        &mut self,
        session: &mut FreeSpinsSession,
    ) -> Result<IterationOutcome, SessionError> {
        let outcome = session.advance(&mut self.rng, &self.model)?;

        self.stats.total_win += outcome.win_this_spin;
        self.stats.free_spins_win += outcome.win_this_spin;
        if outcome.finished {
            self.record_round(session);
        }

        Ok(outcome)
    }

    /// Play a whole round; returns the finished session
    pub fn play_free_spins(&mut self, bet: f64) -> FreeSpinsSession {
        let mut session = self.start_free_spins(bet);
        let win = session.run_to_completion(&mut self.rng, &self.model);
        self.stats.total_win += win;
        self.stats.free_spins_win += win;
        self.record_round(&session);
        session
    }

    fn record_round(&mut self, session: &FreeSpinsSession) {
        let ratio = session.accumulated_multiplier();
        if self.model.win_tiers().classify(ratio) == WinTier::BigWin {
            self.stats.big_wins += 1;
        }
        self.stats.record_ratio(ratio);
    }

    /// Buy a round; the cost counts as bet
    pub fn buy_free_spins(&mut self, bet: f64) -> BuyOutcome {
        let bought = buy::buy_free_spins(&mut self.rng, &self.model, bet);
        self.stats.total_bet += bought.cost;
        self.stats.bonuses_bought += 1;
        bought
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANALYSIS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn theoretical_rtp(&self) -> f64 {
        analysis::theoretical_rtp(&self.model)
    }

    /// `(variance, standard deviation)` of the base game
    pub fn theoretical_variance(&self) -> (f64, f64) {
        analysis::theoretical_variance(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::free_spins::SessionState;

    fn engine(seed: u64) -> SlotEngine {
        SlotEngine::with_seed(GameConfig::default().validate().unwrap(), seed)
    }

    #[test]
    fn test_spin_updates_stats() {
        let mut engine = engine(12345);
        for _ in 0..1_000 {
            let outcome = engine.spin(1.0);
            assert!(outcome.scatter_count <= 3);
            assert_eq!(outcome.triggers_free_spins, outcome.scatter_count == 3);
            assert_eq!(outcome.win_amount, outcome.win_multiplier);
        }

        let stats = engine.stats();
        assert_eq!(stats.total_spins, 1_000);
        assert_eq!(stats.total_bet, 1_000.0);
        assert!(stats.wins > 0);
        assert!(stats.hit_rate() > 0.0 && stats.hit_rate() < 1.0);
        assert!(stats.rtp() > 0.0);

        engine.reset_stats();
        assert_eq!(engine.stats().total_spins, 0);
        assert_eq!(engine.stats().rtp(), 0.0);
    }

    #[test]
    fn test_seed_reproducible() {
        let mut a = engine(42);
        let mut b = engine(7);
        b.seed(42);
        for _ in 0..100 {
            assert_eq!(a.spin(1.0), b.spin(1.0));
        }
    }

    #[test]
    fn test_free_spins_through_engine() {
        let mut engine = engine(9);
        let mut session = engine.start_free_spins(1.0);
        assert_eq!(session.state(), SessionState::Running);

        let mut total = 0.0;
        loop {
            let outcome = engine.advance_free_spins(&mut session).unwrap();
            total += outcome.win_this_spin;
            if outcome.finished {
                break;
            }
        }

        assert!(engine.advance_free_spins(&mut session).is_err());
        assert!((total - session.total_win()).abs() < 1e-9);
        assert!((engine.stats().free_spins_win - total).abs() < 1e-9);
    }

    #[test]
    fn test_buy_counts_cost_as_bet() {
        let mut engine = engine(3);
        let bought = engine.buy_free_spins(1.0);
        assert_eq!(bought.cost, 130.0);
        assert_eq!(engine.stats().total_bet, 130.0);
        assert_eq!(engine.stats().bonuses_bought, 1);
    }

    #[test]
    fn test_theory_passthrough() {
        let engine = engine(0);
        let (variance, std_dev) = engine.theoretical_variance();
        assert!(engine.theoretical_rtp() > 0.7 && engine.theoretical_rtp() < 0.75);
        assert!((std_dev * std_dev - variance).abs() < 1e-9);
    }
}
