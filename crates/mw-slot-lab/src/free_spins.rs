//! Free Spins bonus round
//!
//! A session runs `NotStarted → Running → Finished`. Every iteration samples
//! wild reels (each with its own multiplier), draws a grid, credits the
//! evaluated win times the summed wild multipliers, and grants extra spins
//! for scatters landing outside the wild reels. The accumulated win never
//! exceeds the max-win cap; reaching it ends the round at once.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{ConfigError, SessionError};
use crate::evaluator::evaluate_ways;
use crate::grid::Grid;
use crate::model::GameModel;
use crate::weighted::WeightedTable;
use crate::wild::{WildMultipliers, WildReels, WildSampler};
use crate::win_tiers::WinTier;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Extra spins for an exact number of non-wild scatters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetriggerAward {
    pub scatters: u8,
    pub extra_spins: u32,
}

/// Free Spins configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeSpinsConfig {
    /// Spins awarded on trigger
    pub starting_spins: u32,
    /// Scatters on a base spin that trigger the round
    pub trigger_scatters: u8,
    /// Retrigger table; counts not listed grant nothing
    pub retrigger_awards: Vec<RetriggerAward>,
    /// Round win cap as a bet multiple
    pub max_win_multiplier: f64,
    /// Number of wild reels per free spin
    pub wild_reel_counts: WeightedTable<u8>,
    /// Multiplier drawn for each wild reel
    pub wild_multipliers: WeightedTable<u32>,
}

impl Default for FreeSpinsConfig {
    fn default() -> Self {
        Self {
            starting_spins: 10,
            trigger_scatters: 3,
            retrigger_awards: vec![
                RetriggerAward { scatters: 2, extra_spins: 1 },
                RetriggerAward { scatters: 3, extra_spins: 3 },
            ],
            max_win_multiplier: 5000.0,
            wild_reel_counts: WeightedTable::new(
                vec![0, 1, 2, 3, 4, 5],
                vec![64.0, 30.0, 5.0, 0.89, 0.1, 0.01],
            ),
            wild_multipliers: WeightedTable::new(vec![1, 2, 5, 8], vec![66.0, 28.0, 4.0, 2.0]),
        }
    }
}

impl FreeSpinsConfig {
    pub(crate) fn compile(
        &self,
        grid: GridSpec,
        max_scatters: usize,
    ) -> Result<FreeSpinsRules, ConfigError> {
        if self.starting_spins == 0 {
            return Err(ConfigError::FreeSpins("starting_spins must be at least 1".into()));
        }

        let trigger = self.trigger_scatters as usize;
        if trigger == 0 || trigger > max_scatters || trigger > grid.total_positions() {
            return Err(ConfigError::FreeSpins(format!(
                "trigger_scatters {trigger} can never land (grids hold at most {max_scatters} scatters)"
            )));
        }

        if !self.max_win_multiplier.is_finite() || self.max_win_multiplier <= 0.0 {
            return Err(ConfigError::FreeSpins(format!(
                "max_win_multiplier must be positive, got {}",
                self.max_win_multiplier
            )));
        }

        let mut awards = self.retrigger_awards.clone();
        awards.sort_by_key(|a| a.scatters);
        for pair in awards.windows(2) {
            if pair[0].scatters == pair[1].scatters {
                return Err(ConfigError::FreeSpins(format!(
                    "duplicate retrigger award for {} scatters",
                    pair[0].scatters
                )));
            }
        }
        if awards.iter().any(|a| a.scatters == 0 && a.extra_spins > 0) {
            return Err(ConfigError::FreeSpins(
                "a retrigger on 0 scatters would never let the round end".into(),
            ));
        }

        let wilds = WildSampler::new(
            grid.reels as usize,
            &self.wild_reel_counts,
            &self.wild_multipliers,
        )?;

        Ok(FreeSpinsRules {
            starting_spins: self.starting_spins,
            trigger_scatters: trigger,
            retrigger_awards: awards,
            max_win_multiplier: self.max_win_multiplier,
            wilds,
        })
    }
}

/// Validated free-spins rules
#[derive(Debug, Clone)]
pub struct FreeSpinsRules {
    starting_spins: u32,
    trigger_scatters: usize,
    retrigger_awards: Vec<RetriggerAward>,
    max_win_multiplier: f64,
    wilds: WildSampler,
}

impl FreeSpinsRules {
    pub fn starting_spins(&self) -> u32 {
        self.starting_spins
    }

    pub fn trigger_scatters(&self) -> usize {
        self.trigger_scatters
    }

    pub fn max_win_multiplier(&self) -> f64 {
        self.max_win_multiplier
    }

    pub fn retrigger_awards(&self) -> &[RetriggerAward] {
        &self.retrigger_awards
    }

    pub fn wilds(&self) -> &WildSampler {
        &self.wilds
    }

    /// Extra spins for exactly `scatters` non-wild scatters
    pub fn extra_spins(&self, scatters: usize) -> u32 {
        self.retrigger_awards
            .iter()
            .find(|a| a.scatters as usize == scatters)
            .map_or(0, |a| a.extra_spins)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    SpinsExhausted,
    MaxWin,
}

/// Extra spins granted during the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retrigger {
    /// 1-based free spin that granted them
    pub spin_index: u32,
    pub scatters: usize,
    pub extra_spins: u32,
}

/// Random inputs of one free spin
#[derive(Debug, Clone, PartialEq)]
pub struct FreeSpinDraw {
    pub grid: Grid,
    pub wild_reels: WildReels,
    pub wild_multipliers: WildMultipliers,
}

impl FreeSpinDraw {
    /// Wild reels and multipliers first, then the grid
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, model: &GameModel) -> Self {
        let (wild_reels, wild_multipliers) = model.free_spins().wilds().sample(rng);
        let grid = model.generator().generate(rng);
        Self {
            grid,
            wild_reels,
            wild_multipliers,
        }
    }

    /// A draw without wild reels
    pub fn plain(grid: Grid) -> Self {
        Self {
            grid,
            wild_reels: WildReels::NONE,
            wild_multipliers: WildMultipliers::default(),
        }
    }
}

/// Result of one free spin
#[derive(Debug, Clone, PartialEq)]
pub struct IterationOutcome {
    /// 1-based index within the round
    pub spin_index: u32,
    pub grid: Grid,
    pub wild_reels: WildReels,
    pub wild_multipliers: WildMultipliers,
    /// Ways win before the wild multiplier
    pub base_multiplier: f64,
    /// Sum of the wild multipliers, 1 without wilds
    pub multiplier_factor: u32,
    /// Credited bet multiple after the cap
    pub win_multiplier: f64,
    /// `win_multiplier × bet`
    pub win_this_spin: f64,
    /// Scatters outside wild reels
    pub scatter_count: usize,
    /// Extra spins granted by this spin
    pub retrigger_spins: u32,
    pub spins_remaining: u32,
    pub accumulated_multiplier: f64,
    pub finished: bool,
    pub win_tier: WinTier,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

/// One free-spins round, owned by whoever drives it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeSpinsSession {
    state: SessionState,
    bet: f64,
    spins_remaining: u32,
    spins_played: u32,
    accumulated_multiplier: f64,
    max_win_multiplier: f64,
    retriggers: Vec<Retrigger>,
    finish_reason: Option<FinishReason>,
}

impl FreeSpinsSession {
    /// A session waiting to be started
    pub fn new(rules: &FreeSpinsRules, bet: f64) -> Self {
        Self {
            state: SessionState::NotStarted,
            bet,
            spins_remaining: rules.starting_spins(),
            spins_played: 0,
            accumulated_multiplier: 0.0,
            max_win_multiplier: rules.max_win_multiplier(),
            retriggers: Vec::new(),
            finish_reason: None,
        }
    }

    /// A session already in `Running`
    pub fn running(rules: &FreeSpinsRules, bet: f64) -> Self {
        let mut session = Self::new(rules, bet);
        session.begin();
        session
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted(self.state));
        }
        self.begin();
        Ok(())
    }

    fn begin(&mut self) {
        self.state = SessionState::Running;
        log::debug!(
            "free spins started: {} spins at bet {}",
            self.spins_remaining,
            self.bet
        );
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Running {
            Ok(())
        } else {
            Err(SessionError::NotRunning(self.state))
        }
    }

    /// Sample one free spin and apply it
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &GameModel,
    ) -> Result<IterationOutcome, SessionError> {
        self.ensure_running()?;
        let draw = FreeSpinDraw::sample(rng, model);
        Ok(self.step(draw, model))
    }

    /// Apply a pre-sampled free spin
    pub fn apply(
        &mut self,
        draw: FreeSpinDraw,
        model: &GameModel,
    ) -> Result<IterationOutcome, SessionError> {
        self.ensure_running()?;
        Ok(self.step(draw, model))
    }

    /// Start if needed and play until finished; returns the total win
    pub fn run_to_completion<R: Rng + ?Sized>(&mut self, rng: &mut R, model: &GameModel) -> f64 {
        if self.state == SessionState::NotStarted {
            self.begin();
        }
        while self.state == SessionState::Running {
            let draw = FreeSpinDraw::sample(rng, model);
            self.step(draw, model);
        }
        self.total_win()
    }

    fn step(&mut self, draw: FreeSpinDraw, model: &GameModel) -> IterationOutcome {
        let FreeSpinDraw {
            grid,
            wild_reels,
            wild_multipliers,
        } = draw;

        self.spins_played += 1;
        let spin_index = self.spins_played;

        let base_multiplier = evaluate_ways(&grid, model.paytable(), wild_reels);
        let factor = wild_multipliers.factor();
        let raw = base_multiplier * factor as f64;

        // Clamp the increment so the total lands exactly on the cap
        let headroom = (self.max_win_multiplier - self.accumulated_multiplier).max(0.0);
        let credited = if raw >= headroom {
            self.accumulated_multiplier = self.max_win_multiplier;
            headroom
        } else {
            self.accumulated_multiplier += raw;
            raw
        };

        let scatter_count = grid.scatter_count_outside(wild_reels);
        let extra = model.free_spins().extra_spins(scatter_count);
        self.spins_remaining = self.spins_remaining.saturating_sub(1) + extra;

        if extra > 0 {
            self.retriggers.push(Retrigger {
                spin_index,
                scatters: scatter_count,
                extra_spins: extra,
            });
            log::debug!("free spin {spin_index}: {scatter_count} scatters, +{extra} spins");
        }

        log::trace!(
            "free spin {spin_index}: wilds {:?} x{factor}, win {credited:.2}x, total {:.2}x",
            wild_reels.iter().collect::<Vec<_>>(),
            self.accumulated_multiplier
        );

        if self.accumulated_multiplier >= self.max_win_multiplier {
            self.finish(FinishReason::MaxWin);
        } else if self.spins_remaining == 0 {
            self.finish(FinishReason::SpinsExhausted);
        }

        IterationOutcome {
            spin_index,
            grid,
            wild_reels,
            wild_multipliers,
            base_multiplier,
            multiplier_factor: factor,
            win_multiplier: credited,
            win_this_spin: credited * self.bet,
            scatter_count,
            retrigger_spins: extra,
            spins_remaining: self.spins_remaining,
            accumulated_multiplier: self.accumulated_multiplier,
            finished: self.is_finished(),
            win_tier: model.win_tiers().classify(credited),
        }
    }

    fn finish(&mut self, reason: FinishReason) {
        self.state = SessionState::Finished;
        self.finish_reason = Some(reason);
        log::debug!(
            "free spins finished ({reason:?}) after {} spins: {:.2}x bet",
            self.spins_played,
            self.accumulated_multiplier
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn spins_played(&self) -> u32 {
        self.spins_played
    }

    /// Round win so far as a bet multiple
    pub fn accumulated_multiplier(&self) -> f64 {
        self.accumulated_multiplier
    }

    pub fn max_win_multiplier(&self) -> f64 {
        self.max_win_multiplier
    }

    pub fn retriggers(&self) -> &[Retrigger] {
        &self.retriggers
    }

    /// Total extra spins granted so far
    pub fn extra_spins_awarded(&self) -> u32 {
        self.retriggers.iter().map(|r| r.extra_spins).sum()
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    /// `accumulated_multiplier × bet`
    pub fn total_win(&self) -> f64 {
        self.accumulated_multiplier * self.bet
    }
}
