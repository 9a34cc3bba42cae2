//! Megaways balancing and QA tool
//!
//! Usage:
//!   megaways theory              - Analytic base RTP, variance, trigger odds
//!   megaways simulate            - Monte-Carlo RTP of the full game
//!   megaways fs-ev               - Expected value of a free-spins round
//!   megaways total               - Analytic base RTP plus simulated bonus
//!   megaways spin                - Play and print one base spin
//!   megaways buy                 - Buy and play one free-spins round
//!
//! Every command accepts `--config <file.json|file.yaml>`; without it the
//! shipped game is used. Log level comes from `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use mw_ab_sim::{SimConfig, Simulator};
use mw_slot_lab::{GameConfig, GameModel, SlotEngine, TheoreticalSummary, WildReels, WinTier};

#[derive(Parser)]
#[command(name = "megaways", about = "Megaways payout engine balancing tool")]
struct Cli {
    /// Game config (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analytic base-game RTP, variance and trigger probability
    Theory {
        #[arg(long)]
        json: bool,
    },
    /// Monte-Carlo RTP estimate
    Simulate {
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,
        /// Skip free-spins rounds
        #[arg(long)]
        base_only: bool,
        #[arg(long)]
        json: bool,
    },
    /// Expected value of one free-spins round
    FsEv {
        #[arg(short = 'n', long, default_value_t = 20_000)]
        rounds: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value_t = 0)]
        threads: usize,
        #[arg(long)]
        json: bool,
    },
    /// Analytic base RTP plus trigger probability × simulated round EV
    Total {
        #[arg(short = 'n', long, default_value_t = 20_000)]
        rounds: u64,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value_t = 0)]
        threads: usize,
        #[arg(long)]
        json: bool,
    },
    /// Play one base spin and print the grid
    Spin {
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Buy a free-spins round and print every spin
    Buy {
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let model = load_model(cli.config.as_ref())?;

    match cli.command {
        Commands::Theory { json } => theory(&model, json),
        Commands::Simulate {
            spins,
            bet,
            seed,
            threads,
            base_only,
            json,
        } => {
            let config = sim_config(seed, threads)
                .with_spins(spins)
                .with_bet(bet)
                .with_bonus(!base_only);
            let sim = Simulator::new(model, config).context("failed to set up simulator")?;
            let result = sim.estimate_rtp(spins, bet)?;
            print_report(&result, json)
        }
        Commands::FsEv {
            rounds,
            bet,
            seed,
            threads,
            json,
        } => {
            let sim = Simulator::new(model, sim_config(seed, threads))
                .context("failed to set up simulator")?;
            let estimate = sim.estimate_free_spins_ev(rounds, bet)?;
            print_report(&estimate, json)
        }
        Commands::Total {
            rounds,
            seed,
            threads,
            json,
        } => {
            let sim = Simulator::new(model, sim_config(seed, threads))
                .context("failed to set up simulator")?;
            let total = sim.theoretical_total_rtp(rounds)?;
            print_report(&total, json)
        }
        Commands::Spin { bet, seed } => {
            spin(engine(model, seed), bet);
            Ok(())
        }
        Commands::Buy { bet, seed } => buy(engine(model, seed), bet),
    }
}

fn load_model(path: Option<&PathBuf>) -> Result<GameModel> {
    let config = match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    info!("game: {} ({}x{})", config.name, config.grid.reels, config.grid.rows);
    config.validate().context("invalid game config")
}

fn sim_config(seed: Option<u64>, threads: usize) -> SimConfig {
    let config = SimConfig::new().with_threads(threads);
    match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

fn engine(model: GameModel, seed: Option<u64>) -> SlotEngine {
    match seed {
        Some(seed) => SlotEngine::with_seed(model, seed),
        None => SlotEngine::new(model),
    }
}

fn print_report<T: Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn theory(model: &GameModel, json: bool) -> Result<()> {
    let summary = TheoreticalSummary::compute(model);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Base RTP (analytic):  {:.6}", summary.rtp);
    println!("Variance:             {:.6}", summary.variance);
    println!("Std deviation:        {:.6}", summary.std_dev);
    println!("Trigger probability:  {:.6}", summary.trigger_probability);
    println!();
    println!("Symbol  p(cell)    RTP");
    for s in &summary.symbols {
        println!("{:<6}  {:.6}  {:.6}", s.symbol.to_string(), s.probability, s.rtp);
    }
    Ok(())
}

fn spin(mut engine: SlotEngine, bet: f64) {
    let outcome = engine.spin(bet);
    let positions = engine.winning_positions(&outcome.grid, WildReels::NONE);

    println!("{}", outcome.grid);
    println!();
    println!(
        "Win: {:.2} ({:.2}x bet) [{}]",
        outcome.win_amount, outcome.win_multiplier, outcome.win_tier
    );
    if !positions.is_empty() {
        println!("Winning cells: {positions:?}");
    }
    println!("Scatters: {}", outcome.scatter_count);
    if outcome.triggers_free_spins {
        println!("FREE SPINS TRIGGERED");
    }
}

fn buy(mut engine: SlotEngine, bet: f64) -> Result<()> {
    let mut bought = engine.buy_free_spins(bet);
    println!("Bought free spins for {:.2}", bought.cost);
    println!("{}", bought.trigger_grid);

    while !bought.session.is_finished() {
        let outcome = engine.advance_free_spins(&mut bought.session)?;
        println!();
        println!(
            "Free spin {} (wild reels {:?}, x{})",
            outcome.spin_index,
            outcome.wild_reels.iter().collect::<Vec<_>>(),
            outcome.multiplier_factor
        );
        println!("{}", outcome.grid.with_wilds(outcome.wild_reels));
        println!(
            "Win: {:.2} | total {:.2}x | {} spins left",
            outcome.win_this_spin, outcome.accumulated_multiplier, outcome.spins_remaining
        );
        if outcome.retrigger_spins > 0 {
            println!("+{} spins!", outcome.retrigger_spins);
        }
    }

    let session = &bought.session;
    let tier = engine.model().win_tiers().classify(session.accumulated_multiplier());
    println!();
    println!(
        "Round over after {} spins ({:?}): {:.2} won, net {:.2}{}",
        session.spins_played(),
        session.finish_reason(),
        session.total_win(),
        bought.net(),
        if tier == WinTier::BigWin { " - BIG WIN" } else { "" }
    );
    Ok(())
}
