//! Parallel Monte-Carlo estimators
//!
//! Work is split into fixed-size chunks. Chunk `i` owns a ChaCha8 stream
//! seeded with the master seed on stream `i`, keeps private accumulators,
//! and chunk results are merged in index order, so a seeded run gives the
//! same numbers on any number of threads.

use std::time::Instant;

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::ThreadPool;
use rayon::prelude::*;

use mw_slot_lab::{
    FinishReason, FreeSpinsSession, GameConfig, GameModel, WildReels, theoretical_rtp,
    trigger_probability,
};

use crate::config::{SimConfig, validate_run};
use crate::error::{SimError, SimResult};
use crate::report::{FreeSpinsEstimate, SimulationResult, TotalRtpEstimate};

// ═══════════════════════════════════════════════════════════════════════════════
// ACCUMULATORS
// ═══════════════════════════════════════════════════════════════════════════════

trait Accumulator: Default + Send {
    fn merge(&mut self, other: Self);
}

/// Running sums over base spins, in bet multiples
#[derive(Debug, Clone, Default)]
struct SpinAccumulator {
    spins: u64,
    sum: f64,
    sum_sq: f64,
    base_sum: f64,
    bonus_sum: f64,
    hits: u64,
    triggers: u64,
    max_win: f64,
}

impl SpinAccumulator {
    fn record(&mut self, base: f64, bonus: f64, triggered: bool) {
        let win = base + bonus;
        self.spins += 1;
        self.sum += win;
        self.sum_sq += win * win;
        self.base_sum += base;
        self.bonus_sum += bonus;
        if win > 0.0 {
            self.hits += 1;
        }
        if triggered {
            self.triggers += 1;
        }
        self.max_win = self.max_win.max(win);
    }
}

impl Accumulator for SpinAccumulator {
    fn merge(&mut self, other: Self) {
        self.spins += other.spins;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.base_sum += other.base_sum;
        self.bonus_sum += other.bonus_sum;
        self.hits += other.hits;
        self.triggers += other.triggers;
        self.max_win = self.max_win.max(other.max_win);
    }
}

/// Running sums over complete free-spins rounds
#[derive(Debug, Clone, Default)]
struct RoundAccumulator {
    rounds: u64,
    sum: f64,
    sum_sq: f64,
    max_win: f64,
    capped: u64,
    spins_played: u64,
    retriggered: u64,
}

impl RoundAccumulator {
    fn record(&mut self, session: &FreeSpinsSession) {
        let win = session.accumulated_multiplier();
        self.rounds += 1;
        self.sum += win;
        self.sum_sq += win * win;
        self.max_win = self.max_win.max(win);
        self.spins_played += u64::from(session.spins_played());
        if session.finish_reason() == Some(FinishReason::MaxWin) {
            self.capped += 1;
        }
        if !session.retriggers().is_empty() {
            self.retriggered += 1;
        }
    }
}

impl Accumulator for RoundAccumulator {
    fn merge(&mut self, other: Self) {
        self.rounds += other.rounds;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.max_win = self.max_win.max(other.max_win);
        self.capped += other.capped;
        self.spins_played += other.spins_played;
        self.retriggered += other.retriggered;
    }
}

/// Sample moments from running sums
#[derive(Debug, Clone, Copy, PartialEq)]
struct Moments {
    mean: f64,
    variance: f64,
    std_dev: f64,
    standard_error: f64,
}

impl Moments {
    fn from_sums(n: u64, sum: f64, sum_sq: f64) -> Self {
        if n == 0 {
            return Self {
                mean: 0.0,
                variance: 0.0,
                std_dev: 0.0,
                standard_error: 0.0,
            };
        }
        let n = n as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let std_dev = variance.sqrt();
        Self {
            mean,
            variance,
            std_dev,
            standard_error: std_dev / n.sqrt(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Monte-Carlo analyzer over one game model.
///
/// Never mutates the model; all randomness comes from per-chunk streams.
pub struct Simulator {
    model: GameModel,
    config: SimConfig,
    pool: ThreadPool,
}

impl Simulator {
    pub fn new(model: GameModel, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads())
            .thread_name(|i| format!("mw-sim-{i}"))
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;

        Ok(Self {
            model,
            config,
            pool,
        })
    }

    /// Validate `game` and build a simulator for it
    pub fn from_game_config(game: &GameConfig, config: SimConfig) -> SimResult<Self> {
        Self::new(game.validate()?, config)
    }

    pub fn model(&self) -> &GameModel {
        &self.model
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn resolve_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| rand::rng().random())
    }

    fn run_chunks<A, F>(&self, total: u64, seed: u64, work: F) -> A
    where
        A: Accumulator,
        F: Fn(&mut ChaCha8Rng, u64) -> A + Sync,
    {
        let chunk_size = self.config.chunk_size;
        let chunks = total.div_ceil(chunk_size) as usize;

        let parts: Vec<A> = self.pool.install(|| {
            (0..chunks)
                .into_par_iter()
                .map(|i| {
                    let start = i as u64 * chunk_size;
                    let count = chunk_size.min(total - start);
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    rng.set_stream(i as u64);
                    work(&mut rng, count)
                })
                .collect()
        });

        parts.into_iter().fold(A::default(), |mut acc, part| {
            acc.merge(part);
            acc
        })
    }

    /// Run with the configured spin count and bet
    pub fn run(&self) -> SimulationResult {
        self.simulate(self.config.spins, self.config.bet)
    }

    /// Simulate `spins` base spins at `bet`, playing every triggered
    /// free-spins round unless the config is base-only
    pub fn estimate_rtp(&self, spins: u64, bet: f64) -> SimResult<SimulationResult> {
        validate_run(spins, bet)?;
        Ok(self.simulate(spins, bet))
    }

    fn simulate(&self, spins: u64, bet: f64) -> SimulationResult {
        let seed = self.resolve_seed();
        let include_bonus = self.config.include_bonus;
        let model = &self.model;
        let trigger = model.free_spins().trigger_scatters();

        info!(
            "simulating {spins} spins at bet {bet} (seed {seed}, bonus {}, {} threads)",
            if include_bonus { "on" } else { "off" },
            self.pool.current_num_threads()
        );
        let started = Instant::now();

        let acc: SpinAccumulator = self.run_chunks(spins, seed, |rng, count| {
            let mut acc = SpinAccumulator::default();
            for _ in 0..count {
                let grid = model.generator().generate(rng);
                let base = model.evaluate(&grid, WildReels::NONE);
                let triggered = grid.scatter_count() == trigger;
                let bonus = if triggered && include_bonus {
                    let mut session = FreeSpinsSession::running(model.free_spins(), 1.0);
                    session.run_to_completion(rng, model)
                } else {
                    0.0
                };
                acc.record(base, bonus, triggered);
            }
            acc
        });

        let moments = Moments::from_sums(acc.spins, acc.sum, acc.sum_sq);
        let n = acc.spins as f64;
        let result = SimulationResult {
            spins: acc.spins,
            bet,
            seed,
            include_bonus,
            rtp: moments.mean,
            base_rtp: acc.base_sum / n,
            bonus_rtp: acc.bonus_sum / n,
            hit_frequency: acc.hits as f64 / n,
            trigger_frequency: acc.triggers as f64 / n,
            variance: moments.variance,
            std_dev: moments.std_dev,
            standard_error: moments.standard_error,
            max_win_multiplier: acc.max_win,
            total_bet: n * bet,
            total_win: acc.sum * bet,
        };

        info!(
            "simulation finished in {:.2?}: RTP {:.6} ± {:.6}",
            started.elapsed(),
            result.rtp,
            result.standard_error
        );
        result
    }

    /// Mean payout of `rounds` complete free-spins rounds at `bet`
    pub fn estimate_free_spins_ev(&self, rounds: u64, bet: f64) -> SimResult<FreeSpinsEstimate> {
        validate_run(rounds, bet)?;
        let seed = self.resolve_seed();
        let model = &self.model;

        info!("simulating {rounds} free-spins rounds (seed {seed})");
        let started = Instant::now();

        let acc: RoundAccumulator = self.run_chunks(rounds, seed, |rng, count| {
            let mut acc = RoundAccumulator::default();
            for _ in 0..count {
                let mut session = FreeSpinsSession::running(model.free_spins(), 1.0);
                session.run_to_completion(rng, model);
                acc.record(&session);
            }
            acc
        });

        let moments = Moments::from_sums(acc.rounds, acc.sum, acc.sum_sq);
        let n = acc.rounds as f64;
        let estimate = FreeSpinsEstimate {
            rounds: acc.rounds,
            bet,
            seed,
            mean_win: moments.mean * bet,
            mean_multiplier: moments.mean,
            std_dev: moments.std_dev,
            standard_error: moments.standard_error,
            max_win_multiplier: acc.max_win,
            capped_rounds: acc.capped,
            mean_spins_played: acc.spins_played as f64 / n,
            retrigger_rate: acc.retriggered as f64 / n,
        };

        info!(
            "free spins finished in {:.2?}: EV {:.4}x",
            started.elapsed(),
            estimate.mean_multiplier
        );
        Ok(estimate)
    }

    /// Analytic base RTP plus trigger probability × simulated round EV
    pub fn theoretical_total_rtp(&self, rounds: u64) -> SimResult<TotalRtpEstimate> {
        let free_spins = self.estimate_free_spins_ev(rounds, 1.0)?;
        let base_rtp = theoretical_rtp(&self.model);
        let trigger_probability = trigger_probability(&self.model);
        let bonus_rtp = trigger_probability * free_spins.mean_multiplier;

        Ok(TotalRtpEstimate {
            base_rtp,
            trigger_probability,
            free_spins_ev: free_spins.mean_multiplier,
            bonus_rtp,
            total_rtp: base_rtp + bonus_rtp,
            free_spins,
        })
    }
}
