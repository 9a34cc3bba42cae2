//! Closed-form base-game analysis
//!
//! Each reel's match count for a symbol with cell probability `p` is treated
//! as having mean `α = rows·p` and second moment `rows·p(1-p) + (rows·p)²`.
//! An n-of-a-kind term is weighted by the zero-match probability
//! `q = (1-p)^rows` of the following reel, except when n spans every reel.
//! This is an approximation (counts are not independent Binomials once
//! scatters are capped) kept for compatibility with existing balancing data.

use serde::{Deserialize, Serialize};

use crate::model::GameModel;
use crate::paytable::{MAX_PAY_COUNT, MIN_PAY_COUNT};
use crate::symbols::Symbol;

/// `n choose k` as a float (0 when `k > n`)
pub fn binomial_coefficient(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// P(X = k) for X ~ Binomial(n, p)
pub fn binomial_pmf(n: usize, k: usize, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    binomial_coefficient(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// P(X ≤ k) for X ~ Binomial(n, p)
pub fn binomial_cdf(n: usize, k: usize, p: f64) -> f64 {
    (0..=k.min(n)).map(|i| binomial_pmf(n, i, p)).sum::<f64>().min(1.0)
}

/// Analytic return of one paying symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolRtp {
    pub symbol: Symbol,
    pub probability: f64,
    pub rtp: f64,
}

/// Sum over pay counts of `pay^power × moment^n`, with the `q` weighting
fn symbol_moment(model: &GameModel, symbol: Symbol, power: i32, moment: f64, q: f64) -> f64 {
    let reels = model.reels();
    let longest = reels.min(MAX_PAY_COUNT as usize);
    let mut total = 0.0;

    for n in MIN_PAY_COUNT as usize..=longest {
        let pay = model.paytable().payout(symbol, n);
        if pay == 0.0 {
            continue;
        }
        let mut term = pay.powi(power) * moment.powi(n as i32);
        if n < reels {
            term *= q;
        }
        total += term;
    }

    total
}

/// Per-symbol analytic base RTP
pub fn symbol_rtp_breakdown(model: &GameModel) -> Vec<SymbolRtp> {
    let rows = model.rows() as f64;

    model
        .symbols()
        .paying()
        .map(|(symbol, p)| {
            let alpha = rows * p;
            let q = (1.0 - p).powi(model.rows() as i32);
            SymbolRtp {
                symbol,
                probability: p,
                rtp: symbol_moment(model, symbol, 1, alpha, q),
            }
        })
        .collect()
}

/// Analytic base-game RTP (free spins excluded)
pub fn theoretical_rtp(model: &GameModel) -> f64 {
    symbol_rtp_breakdown(model).iter().map(|s| s.rtp).sum()
}

/// Analytic base-game `(variance, standard deviation)` per unit bet.
/// The variance is clamped at 0 before taking the root.
pub fn theoretical_variance(model: &GameModel) -> (f64, f64) {
    let rows = model.rows() as f64;
    let ex = theoretical_rtp(model);

    let ex2: f64 = model
        .symbols()
        .paying()
        .map(|(symbol, p)| {
            let second = rows * p * (1.0 - p) + (rows * p).powi(2);
            let q = (1.0 - p).powi(model.rows() as i32);
            symbol_moment(model, symbol, 2, second, q)
        })
        .sum();

    let variance = ex2 - ex * ex;
    (variance, variance.max(0.0).sqrt())
}

/// Probability that a base spin shows exactly the trigger count of
/// scatters, ignoring the rejection of over-capped grids.
pub fn trigger_probability(model: &GameModel) -> f64 {
    binomial_pmf(
        model.rows() * model.reels(),
        model.free_spins().trigger_scatters(),
        model.symbols().scatter_probability(),
    )
}

/// Everything the closed-form analysis produces for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoreticalSummary {
    pub rtp: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub trigger_probability: f64,
    pub symbols: Vec<SymbolRtp>,
}

impl TheoreticalSummary {
    pub fn compute(model: &GameModel) -> Self {
        let symbols = symbol_rtp_breakdown(model);
        let (variance, std_dev) = theoretical_variance(model);
        Self {
            rtp: symbols.iter().map(|s| s.rtp).sum(),
            variance,
            std_dev,
            trigger_probability: trigger_probability(model),
            symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, GridSpec};
    use crate::paytable::PayEntry;
    use approx::assert_relative_eq;

    #[test]
    fn test_binomial_helpers() {
        assert_eq!(binomial_coefficient(20, 3), 1140.0);
        assert_eq!(binomial_coefficient(5, 0), 1.0);
        assert_eq!(binomial_coefficient(3, 4), 0.0);
        assert_relative_eq!(binomial_pmf(4, 2, 0.5), 0.375);
        assert_relative_eq!(binomial_cdf(4, 4, 0.3), 1.0, epsilon = 1e-12);
        assert_relative_eq!(binomial_cdf(4, 0, 0.5), 0.0625);
    }

    #[test]
    fn test_default_theoretical_rtp() {
        let model = GameConfig::default().validate().unwrap();
        assert_relative_eq!(theoretical_rtp(&model), 0.724_965_834_966_236_9, epsilon = 1e-12);
    }

    #[test]
    fn test_default_theoretical_variance() {
        let model = GameConfig::default().validate().unwrap();
        let (variance, std_dev) = theoretical_variance(&model);
        assert_relative_eq!(variance, 2.768_823_112_048_084, epsilon = 1e-9);
        assert_relative_eq!(std_dev, 1.663_978_098_428_006_4, epsilon = 1e-9);
    }

    #[test]
    fn test_default_trigger_probability() {
        let model = GameConfig::default().validate().unwrap();
        assert_relative_eq!(trigger_probability(&model), 0.002_005_055_985_841_654, epsilon = 1e-15);
    }

    #[test]
    fn test_breakdown_sums_to_rtp() {
        let model = GameConfig::default().validate().unwrap();
        let summary = TheoreticalSummary::compute(&model);
        assert_eq!(summary.symbols.len(), Symbol::PAYING_COUNT);
        assert_relative_eq!(summary.rtp, theoretical_rtp(&model), epsilon = 1e-15);
        assert!(summary.symbols.iter().all(|s| s.rtp > 0.0));
    }

    #[test]
    fn test_zero_reel_factor_applies_below_full_width() {
        let mut config = GameConfig::default();
        config.paytable = vec![PayEntry::new(Symbol::A, 5, 50.0)];
        let five = config.validate().unwrap();

        config.grid = GridSpec { reels: 6, rows: 4 };
        let six = config.validate().unwrap();

        let p = five.symbols().probability(Symbol::A);
        let q = (1.0 - p).powi(4);
        let alpha = 4.0 * p;

        assert_relative_eq!(theoretical_rtp(&five), 50.0 * alpha.powi(5), max_relative = 1e-12);
        assert_relative_eq!(theoretical_rtp(&six), theoretical_rtp(&five) * q, max_relative = 1e-12);
    }
}
