//! Spin outcome grid and its generator

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::index;

use crate::error::{ConfigError, GridError};
use crate::symbols::{Symbol, SymbolModel};
use crate::wild::WildReels;

/// Rejection-sampling attempts after which debug builds assume the
/// configuration has regressed.
const DEBUG_MAX_ATTEMPTS: u32 = 10_000;

/// Visible symbols of one spin, `rows × reels`, stored row-major.
/// Immutable once produced; each spin replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    reels: usize,
    cells: Vec<Symbol>,
}

impl Grid {
    /// Build from row slices; every row must have the same length
    pub fn from_rows<R: AsRef<[Symbol]>>(rows: &[R]) -> Result<Self, GridError> {
        let reels = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * reels);

        for (row, symbols) in rows.iter().enumerate() {
            let symbols = symbols.as_ref();
            if symbols.len() != reels {
                return Err(GridError::Ragged {
                    row,
                    expected: reels,
                    found: symbols.len(),
                });
            }
            cells.extend_from_slice(symbols);
        }

        if reels == 0 {
            return Ok(Self::default());
        }

        Ok(Self {
            rows: rows.len(),
            reels,
            cells,
        })
    }

    pub(crate) fn from_cells(rows: usize, reels: usize, cells: Vec<Symbol>) -> Self {
        debug_assert_eq!(cells.len(), rows * reels);
        Self { rows, reels, cells }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn reels(&self) -> usize {
        self.reels
    }

    /// True when the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, reel: usize) -> Option<Symbol> {
        if row < self.rows && reel < self.reels {
            Some(self.cells[row * self.reels + reel])
        } else {
            None
        }
    }

    /// Symbols of one reel, top to bottom
    pub fn column(&self, reel: usize) -> impl Iterator<Item = Symbol> + '_ {
        let reels = self.reels;
        let rows = if reel < reels { self.rows } else { 0 };
        (0..rows).map(move |row| self.cells[row * reels + reel])
    }

    /// Rows as slices, top to bottom
    pub fn row_slices(&self) -> impl Iterator<Item = &[Symbol]> {
        self.cells.chunks(self.reels.max(1))
    }

    /// Number of cells on `reel` showing `symbol`
    #[inline]
    pub fn count_on_reel(&self, reel: usize, symbol: Symbol) -> usize {
        self.column(reel).filter(|&s| s == symbol).count()
    }

    /// Scatters anywhere on the grid
    pub fn scatter_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_scatter()).count()
    }

    /// Scatters on reels that are not wild
    pub fn scatter_count_outside(&self, wild_reels: WildReels) -> usize {
        (0..self.reels)
            .filter(|&reel| !wild_reels.contains(reel))
            .map(|reel| self.count_on_reel(reel, Symbol::Scatter))
            .sum()
    }

    /// `(row, reel)` of every scatter
    pub fn scatter_positions(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_scatter())
            .map(|(i, _)| (i / self.reels, i % self.reels))
            .collect()
    }

    /// Display adapter that shows wild reels as `W`
    pub fn with_wilds(&self, wild_reels: WildReels) -> WildGridDisplay<'_> {
        WildGridDisplay {
            grid: self,
            wild_reels,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_wilds(WildReels::NONE).fmt(f)
    }
}

/// Parses rows separated by `/` or newlines, one character per cell,
/// e.g. `"AACAA/DEFDE/GHIGH/BDEBD"`. Whitespace inside a row is ignored.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| {
                r.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| Symbol::from_char(c).ok_or(GridError::UnknownSymbol(c)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&rows)
    }
}

pub struct WildGridDisplay<'a> {
    grid: &'a Grid,
    wild_reels: WildReels,
}

impl fmt::Display for WildGridDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, symbols) in self.grid.row_slices().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (reel, symbol) in symbols.iter().enumerate() {
                if reel > 0 {
                    write!(f, " ")?;
                }
                if self.wild_reels.contains(reel) {
                    write!(f, "W")?;
                } else {
                    write!(f, "{symbol}")?;
                }
            }
        }
        Ok(())
    }
}

/// Draws every cell independently from the symbol distribution and resamples
/// the whole grid until it holds at most `max_scatters` scatters.
#[derive(Debug, Clone)]
pub struct GridGenerator {
    rows: usize,
    reels: usize,
    max_scatters: usize,
    symbols: WeightedIndex<f64>,
}

impl GridGenerator {
    pub fn new(
        model: &SymbolModel,
        rows: usize,
        reels: usize,
        max_scatters: usize,
    ) -> Result<Self, ConfigError> {
        let symbols = WeightedIndex::new(model.probabilities().iter().copied()).map_err(|e| {
            ConfigError::Distribution {
                name: "symbol_probabilities",
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            rows,
            reels,
            max_scatters,
            symbols,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn reels(&self) -> usize {
        self.reels
    }

    pub fn max_scatters(&self) -> usize {
        self.max_scatters
    }

    #[inline]
    fn draw_symbol<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
        // WeightedIndex only yields indices of the probability table
        Symbol::ALL[self.symbols.sample(rng)]
    }

    /// Resample until the scatter constraint holds.
    ///
    /// Terminates almost surely; validation guarantees the acceptance
    /// probability is bounded away from zero.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let total = self.rows * self.reels;
        let mut cells = Vec::with_capacity(total);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug_assert!(
                attempts <= DEBUG_MAX_ATTEMPTS,
                "grid rejection sampling exceeded {DEBUG_MAX_ATTEMPTS} attempts"
            );

            cells.clear();
            let mut scatters = 0;
            for _ in 0..total {
                let symbol = self.draw_symbol(rng);
                if symbol.is_scatter() {
                    scatters += 1;
                }
                cells.push(symbol);
            }

            if scatters <= self.max_scatters {
                if attempts > 1 {
                    log::trace!("grid accepted after {attempts} attempts");
                }
                return Grid::from_cells(self.rows, self.reels, cells);
            }
        }
    }

    /// A fresh grid with exactly `scatters` scatters on distinct random cells.
    /// Every other scatter is replaced by a uniformly chosen paying symbol.
    pub fn generate_with_scatters<R: Rng + ?Sized>(&self, rng: &mut R, scatters: usize) -> Grid {
        let total = self.rows * self.reels;
        let scatters = scatters.min(total);
        let base = self.generate(rng);
        let chosen = index::sample(rng, total, scatters).into_vec();

        let mut cells = base.cells;
        for (i, cell) in cells.iter_mut().enumerate() {
            if chosen.contains(&i) {
                *cell = Symbol::Scatter;
            } else if cell.is_scatter() {
                *cell = Symbol::PAYING[rng.random_range(0..Symbol::PAYING_COUNT)];
            }
        }

        Grid::from_cells(self.rows, self.reels, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_parse_and_display() {
        let grid: Grid = "AACAA/DEFDE/GHIGH/BDEBD".parse().unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.reels(), 5);
        assert_eq!(grid.get(3, 0), Some(Symbol::B));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.count_on_reel(0, Symbol::A), 1);
        assert_eq!(grid.to_string(), "A A C A A\nD E F D E\nG H I G H\nB D E B D");

        let wilds = WildReels::from_reels([2]);
        assert!(grid.with_wilds(wilds).to_string().starts_with("A A W A A"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "AAB/AB".parse::<Grid>(),
            Err(GridError::Ragged { row: 1, expected: 3, found: 2 })
        );
        assert_eq!("AXB".parse::<Grid>(), Err(GridError::UnknownSymbol('X')));
        assert!("".parse::<Grid>().unwrap().is_empty());
    }

    #[test]
    fn test_scatter_counts() {
        let grid: Grid = "SACAA/DESDE/GHIGS/BDEBD".parse().unwrap();
        assert_eq!(grid.scatter_count(), 3);
        assert_eq!(grid.scatter_count_outside(WildReels::from_reels([4])), 2);
        assert_eq!(grid.scatter_positions(), vec![(0, 0), (1, 2), (2, 4)]);
    }

    #[test]
    fn test_generated_dimensions() {
        let model = GameConfig::default().validate().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let grid = model.generator().generate(&mut rng);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.reels(), 5);
    }

    #[test]
    fn test_scatter_cap_invariant() {
        let model = GameConfig::default().validate().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0x5ca7);
        for _ in 0..100_000 {
            assert!(model.generator().generate(&mut rng).scatter_count() <= 3);
        }
    }

    #[test]
    fn test_scatter_cap_under_heavy_scatter() {
        let mut config = GameConfig::default();
        config.symbols.scatter_probability = 0.15;
        let model = config.validate().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut saw_three = false;
        for _ in 0..20_000 {
            let count = model.generator().generate(&mut rng).scatter_count();
            assert!(count <= 3);
            saw_three |= count == 3;
        }
        assert!(saw_three);
    }

    #[test]
    fn test_generate_with_exact_scatters() {
        let model = GameConfig::default().validate().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1_000 {
            let grid = model.generator().generate_with_scatters(&mut rng, 3);
            assert_eq!(grid.scatter_count(), 3);
        }
    }
}
