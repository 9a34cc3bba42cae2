//! Simulator Integration Tests
//!
//! Runs the Monte-Carlo estimators end to end against the shipped game and
//! checks them against the closed-form analysis.
//! Verifies:
//! - Base-game simulation converges to the analytic RTP
//! - Free spins add a positive contribution at the expected trigger rate
//! - Seeded runs are identical on any number of threads
//! - Free-spins rounds without retriggers last exactly the starting spins
//!
//! Tolerances are about five standard errors of the estimate in question.

use approx::assert_abs_diff_eq;
use mw_ab_sim::{SimConfig, Simulator};
use mw_slot_lab::{GameConfig, GameModel, theoretical_rtp, trigger_probability};

fn shipped_model() -> GameModel {
    GameConfig::default().validate().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// BASE GAME
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_base_game_matches_analytic_rtp() {
    let model = shipped_model();
    let theory = theoretical_rtp(&model);
    let sim = Simulator::new(model, SimConfig::new().with_seed(42).base_only()).unwrap();

    let result = sim.estimate_rtp(100_000, 1.0).unwrap();

    assert_eq!(result.spins, 100_000);
    assert_eq!(result.seed, 42);
    assert_eq!(result.bonus_rtp, 0.0);
    assert_eq!(result.rtp, result.base_rtp);
    assert_abs_diff_eq!(result.rtp, theory, epsilon = 0.03);
    assert_abs_diff_eq!(result.hit_frequency, 0.48, epsilon = 0.02);
    assert!(result.std_dev > 1.2 && result.std_dev < 2.3);
    assert!(result.standard_error < 0.01);
}

#[test]
fn test_rtp_independent_of_bet() {
    let sim = Simulator::new(shipped_model(), SimConfig::new().with_seed(3).base_only()).unwrap();

    let unit = sim.estimate_rtp(20_000, 1.0).unwrap();
    let double = sim.estimate_rtp(20_000, 2.0).unwrap();

    assert_eq!(unit.rtp, double.rtp);
    assert_eq!(unit.variance, double.variance);
    assert_abs_diff_eq!(double.total_win, 2.0 * unit.total_win, epsilon = 1e-6);
    assert_eq!(double.total_bet, 40_000.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FULL GAME
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bonus_contribution_end_to_end() {
    let model = shipped_model();
    let theory = theoretical_rtp(&model);
    let q = trigger_probability(&model);
    let sim = Simulator::new(model, SimConfig::new().with_seed(42)).unwrap();

    let result = sim.estimate_rtp(100_000, 1.0).unwrap();

    assert!(result.include_bonus);
    assert!(result.bonus_rtp > 0.0);
    assert!(result.rtp > result.base_rtp);
    assert_abs_diff_eq!(result.rtp, result.base_rtp + result.bonus_rtp, epsilon = 1e-9);
    assert_abs_diff_eq!(result.trigger_frequency, q, epsilon = 0.0007);

    // Monte-Carlo total agrees with analytic base plus simulated bonus
    assert_abs_diff_eq!(result.rtp, theory + result.bonus_rtp, epsilon = 0.03);
}

#[test]
fn test_seeded_runs_independent_of_thread_count() {
    let run = |threads| {
        let config = SimConfig::new()
            .with_seed(7)
            .with_threads(threads)
            .with_chunk_size(1_000);
        Simulator::new(shipped_model(), config)
            .unwrap()
            .estimate_rtp(20_000, 1.0)
            .unwrap()
    };

    assert_eq!(run(1), run(4));
}

// ═══════════════════════════════════════════════════════════════════════════════
// FREE SPINS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_free_spins_ev() {
    let sim = Simulator::new(shipped_model(), SimConfig::new().with_seed(11)).unwrap();
    let estimate = sim.estimate_free_spins_ev(4_000, 1.0).unwrap();

    assert_eq!(estimate.rounds, 4_000);
    assert!(estimate.mean_multiplier > 170.0 && estimate.mean_multiplier < 300.0);
    assert!(estimate.mean_spins_played >= 10.0);
    assert!(estimate.max_win_multiplier <= 5_000.0);
    assert!(estimate.retrigger_rate > 0.0);
}

#[test]
fn test_rounds_without_scatters_last_starting_spins() {
    let mut game = GameConfig::default();
    game.symbols.scatter_probability = 0.0;
    game.free_spins.max_win_multiplier = 1e9;
    let sim = Simulator::from_game_config(&game, SimConfig::new().with_seed(5)).unwrap();

    let estimate = sim.estimate_free_spins_ev(500, 1.0).unwrap();

    assert_eq!(estimate.mean_spins_played, 10.0);
    assert_eq!(estimate.retrigger_rate, 0.0);
    assert_eq!(estimate.capped_rounds, 0);
}

#[test]
fn test_theoretical_total_rtp() {
    let model = shipped_model();
    let theory = theoretical_rtp(&model);
    let q = trigger_probability(&model);
    let sim = Simulator::new(model, SimConfig::new().with_seed(21)).unwrap();

    let total = sim.theoretical_total_rtp(2_000).unwrap();

    assert_eq!(total.base_rtp, theory);
    assert_eq!(total.trigger_probability, q);
    assert_eq!(total.free_spins_ev, total.free_spins.mean_multiplier);
    assert_abs_diff_eq!(total.bonus_rtp, q * total.free_spins_ev, epsilon = 1e-12);
    assert_abs_diff_eq!(total.total_rtp, theory + total.bonus_rtp, epsilon = 1e-12);
    assert!(total.total_rtp > 1.0);
}
