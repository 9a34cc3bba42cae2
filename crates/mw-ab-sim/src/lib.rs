//! # mw-ab-sim — Monte-Carlo RTP Simulator
//!
//! Estimates the full-game RTP (base game plus free spins), hit and trigger
//! frequencies, variance, and the expected value of a free-spins round for
//! any validated game model. Spins are processed in parallel chunks on a
//! dedicated rayon pool; seeded runs are reproducible regardless of the
//! thread count, which makes A/B comparisons between two configs exact.
//!
//! ```text
//! GameConfig ──validate──> GameModel ──┐
//!                                      ├──> Simulator ──> SimulationResult
//! SimConfig (spins, bet, seed, ...) ───┘              ├─> FreeSpinsEstimate
//!                                                     └─> TotalRtpEstimate
//! ```

pub mod config;
pub mod error;
pub mod monte_carlo;
pub mod report;

pub use config::*;
pub use error::*;
pub use monte_carlo::*;
pub use report::*;
