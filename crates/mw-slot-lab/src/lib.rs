//! # mw-slot-lab — Megaways Payout Engine
//!
//! Generates reel outcomes, evaluates ways-pays wins, drives the free-spins
//! bonus (retriggers, wild-multiplier reels, max-win cap) and computes the
//! analytic base-game RTP and variance.
//!
//! ## Features
//!
//! - **Grid Generator**: independent weighted draw per cell, resampled until
//!   the scatter count is within bounds
//! - **Ways Evaluator**: leftmost-contiguous ways pays with optional wild reels
//! - **Free Spins**: explicit `NotStarted → Running → Finished` session
//! - **Bonus Buy**: forced three-scatter trigger for a fixed bet multiple
//! - **Analysis**: closed-form base-game RTP / variance and trigger odds
//!
//! ## Architecture
//!
//! ```text
//! GameConfig (serde: JSON / YAML)
//!     │  validate()
//!     v
//! GameModel
//!     ├── SymbolModel   (cell probabilities)
//!     ├── PayTable      (symbol × reel-count lookup)
//!     ├── GridGenerator (weighted draw + scatter rejection)
//!     ├── WildSampler   (wild reel count / multiplier tables)
//!     └── FreeSpinsRules
//!           │
//!           v
//! SlotEngine ── spin() ──> SpinOutcome
//!            └─ start_free_spins() / advance_free_spins() ──> IterationOutcome
//! ```
//!
//! Every sampling call takes an explicit `rand::Rng`; the [`SlotEngine`]
//! facade owns a seedable ChaCha8 stream for callers that do not manage one.

pub mod analysis;
pub mod buy;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod free_spins;
pub mod grid;
pub mod model;
pub mod paytable;
pub mod symbols;
pub mod weighted;
pub mod wild;
pub mod win_tiers;

pub use analysis::*;
pub use buy::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use free_spins::*;
pub use grid::*;
pub use model::*;
pub use paytable::*;
pub use symbols::*;
pub use weighted::*;
pub use wild::*;
pub use win_tiers::*;
