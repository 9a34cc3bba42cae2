//! Ways-pays win evaluation
//!
//! A paying symbol wins when it shows on every reel of a prefix starting at
//! reel 0 that is at least three reels long. The win is the product of the
//! per-reel match counts ("ways") times the pay-table value for the prefix
//! length. A wild reel matches every paying symbol on all of its rows.
//!
//! Evaluation is a pure function of its inputs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::paytable::{MIN_PAY_COUNT, PayTable};
use crate::symbols::Symbol;
use crate::wild::WildReels;

/// One paying symbol's contribution to a spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolWin {
    pub symbol: Symbol,
    /// Length of the contiguous prefix from reel 0
    pub reels: usize,
    /// Product of the per-reel match counts over the prefix
    pub ways: u64,
    /// Pay-table multiplier for `(symbol, reels)`
    pub pay: f64,
    /// `ways × pay`
    pub win: f64,
}

#[inline]
fn reel_matches(grid: &Grid, reel: usize, symbol: Symbol, wild_reels: WildReels) -> usize {
    if wild_reels.contains(reel) {
        grid.rows()
    } else {
        grid.count_on_reel(reel, symbol)
    }
}

fn symbol_win(
    grid: &Grid,
    paytable: &PayTable,
    wild_reels: WildReels,
    symbol: Symbol,
) -> Option<SymbolWin> {
    let mut ways = 1u64;
    let mut reels = 0;

    for reel in 0..grid.reels() {
        let matches = reel_matches(grid, reel, symbol, wild_reels);
        if matches == 0 {
            break;
        }
        ways *= matches as u64;
        reels += 1;
    }

    if reels < MIN_PAY_COUNT as usize {
        return None;
    }
    let pay = paytable.get(symbol, reels)?;

    Some(SymbolWin {
        symbol,
        reels,
        ways,
        pay,
        win: ways as f64 * pay,
    })
}

/// Total win multiplier of `grid` (bet multiples, before any wild
/// multiplier). An empty grid pays 0.
pub fn evaluate_ways(grid: &Grid, paytable: &PayTable, wild_reels: WildReels) -> f64 {
    Symbol::PAYING
        .iter()
        .filter_map(|&symbol| symbol_win(grid, paytable, wild_reels, symbol))
        .map(|w| w.win)
        .sum()
}

/// Per-symbol wins, in symbol order
pub fn evaluate_breakdown(grid: &Grid, paytable: &PayTable, wild_reels: WildReels) -> Vec<SymbolWin> {
    Symbol::PAYING
        .iter()
        .filter_map(|&symbol| symbol_win(grid, paytable, wild_reels, symbol))
        .collect()
}

/// `(row, reel)` of every cell that takes part in a paying win: all cells of
/// wild reels inside a winning prefix, and the matching cells of the other
/// reels in that prefix.
pub fn winning_positions(
    grid: &Grid,
    paytable: &PayTable,
    wild_reels: WildReels,
) -> BTreeSet<(usize, usize)> {
    let mut positions = BTreeSet::new();

    for win in evaluate_breakdown(grid, paytable, wild_reels) {
        for reel in 0..win.reels {
            let wild = wild_reels.contains(reel);
            for row in 0..grid.rows() {
                if wild || grid.get(row, reel) == Some(win.symbol) {
                    positions.insert((row, reel));
                }
            }
        }
    }

    positions
}
