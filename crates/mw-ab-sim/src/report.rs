//! Simulation reports
//!
//! All win figures are bet multiples unless the field name says amount.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate result of a Monte-Carlo RTP run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub spins: u64,
    pub bet: f64,
    pub seed: u64,
    pub include_bonus: bool,
    /// Mean total win per spin / bet
    pub rtp: f64,
    /// Base-game part of `rtp`
    pub base_rtp: f64,
    /// Free-spins part of `rtp`
    pub bonus_rtp: f64,
    /// Spins with a positive total win
    pub hit_frequency: f64,
    /// Spins landing exactly the trigger count of scatters
    pub trigger_frequency: f64,
    /// Per-spin win variance, in bet units
    pub variance: f64,
    pub std_dev: f64,
    /// Standard error of `rtp`
    pub standard_error: f64,
    /// Largest single-spin win (base + bonus)
    pub max_win_multiplier: f64,
    pub total_bet: f64,
    pub total_win: f64,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spins:              {}", self.spins)?;
        writeln!(f, "Bet:                {}", self.bet)?;
        writeln!(f, "Seed:               {}", self.seed)?;
        writeln!(
            f,
            "RTP:                {:.6} (± {:.6})",
            self.rtp, self.standard_error
        )?;
        writeln!(f, "  base game:        {:.6}", self.base_rtp)?;
        if self.include_bonus {
            writeln!(f, "  free spins:       {:.6}", self.bonus_rtp)?;
        }
        writeln!(f, "Hit frequency:      {:.6}", self.hit_frequency)?;
        writeln!(f, "Trigger frequency:  {:.6}", self.trigger_frequency)?;
        writeln!(f, "Variance:           {:.6}", self.variance)?;
        writeln!(f, "Std deviation:      {:.6}", self.std_dev)?;
        write!(f, "Max win:            {:.2}x", self.max_win_multiplier)
    }
}

/// Simulated payout of complete free-spins rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsEstimate {
    pub rounds: u64,
    pub bet: f64,
    pub seed: u64,
    /// Mean round win amount
    pub mean_win: f64,
    /// Mean round win as a bet multiple
    pub mean_multiplier: f64,
    pub std_dev: f64,
    pub standard_error: f64,
    pub max_win_multiplier: f64,
    /// Rounds that ended on the max-win cap
    pub capped_rounds: u64,
    pub mean_spins_played: f64,
    /// Rounds with at least one retrigger
    pub retrigger_rate: f64,
}

impl fmt::Display for FreeSpinsEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rounds:             {}", self.rounds)?;
        writeln!(f, "Seed:               {}", self.seed)?;
        writeln!(
            f,
            "Round EV:           {:.4}x (± {:.4}), {:.4} at bet {}",
            self.mean_multiplier, self.standard_error, self.mean_win, self.bet
        )?;
        writeln!(f, "Std deviation:      {:.4}x", self.std_dev)?;
        writeln!(f, "Mean spins played:  {:.3}", self.mean_spins_played)?;
        writeln!(f, "Retrigger rate:     {:.4}", self.retrigger_rate)?;
        writeln!(f, "Capped rounds:      {}", self.capped_rounds)?;
        write!(f, "Max win:            {:.2}x", self.max_win_multiplier)
    }
}

/// Analytic base RTP plus the simulated free-spins contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRtpEstimate {
    pub base_rtp: f64,
    pub trigger_probability: f64,
    /// Mean round win as a bet multiple
    pub free_spins_ev: f64,
    /// `trigger_probability × free_spins_ev`
    pub bonus_rtp: f64,
    pub total_rtp: f64,
    pub free_spins: FreeSpinsEstimate,
}

impl fmt::Display for TotalRtpEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Base RTP (analytic):     {:.6}", self.base_rtp)?;
        writeln!(f, "Trigger probability:     {:.6}", self.trigger_probability)?;
        writeln!(f, "Free spins round EV:     {:.4}x", self.free_spins_ev)?;
        writeln!(f, "Free spins RTP:          {:.6}", self.bonus_rtp)?;
        write!(f, "Total RTP:               {:.6}", self.total_rtp)
    }
}
