//! Symbol definitions and cell probabilities

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reel symbol: nine paying letters plus the scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
    /// Scatter - triggers free spins regardless of position, never pays ways
    #[serde(rename = "S")]
    Scatter = 9,
}

impl Symbol {
    /// Number of distinct symbols
    pub const COUNT: usize = 10;

    /// Number of paying symbols
    pub const PAYING_COUNT: usize = 9;

    /// All symbols in id order
    pub const ALL: [Symbol; Self::COUNT] = [
        Symbol::A,
        Symbol::B,
        Symbol::C,
        Symbol::D,
        Symbol::E,
        Symbol::F,
        Symbol::G,
        Symbol::H,
        Symbol::I,
        Symbol::Scatter,
    ];

    /// Paying symbols in id order (scatter excluded)
    pub const PAYING: [Symbol; Self::PAYING_COUNT] = [
        Symbol::A,
        Symbol::B,
        Symbol::C,
        Symbol::D,
        Symbol::E,
        Symbol::F,
        Symbol::G,
        Symbol::H,
        Symbol::I,
    ];

    /// Dense id, usable as an array index
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Symbol for a dense id
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    #[inline]
    pub fn is_paying(self) -> bool {
        !self.is_scatter()
    }

    /// Single-character grid notation
    pub fn as_char(self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
            Symbol::C => 'C',
            Symbol::D => 'D',
            Symbol::E => 'E',
            Symbol::F => 'F',
            Symbol::G => 'G',
            Symbol::H => 'H',
            Symbol::I => 'I',
            Symbol::Scatter => 'S',
        }
    }

    /// Parse single-character grid notation
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_char() == c.to_ascii_uppercase())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Per-cell probability of every symbol.
///
/// Built only through config validation, so the table is known to be
/// non-negative and normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolModel {
    probabilities: [f64; Symbol::COUNT],
}

impl SymbolModel {
    pub(crate) fn new(probabilities: [f64; Symbol::COUNT]) -> Self {
        Self { probabilities }
    }

    /// Probability that a single cell shows `symbol`
    #[inline]
    pub fn probability(&self, symbol: Symbol) -> f64 {
        self.probabilities[symbol.index()]
    }

    /// All probabilities in symbol id order
    pub fn probabilities(&self) -> &[f64; Symbol::COUNT] {
        &self.probabilities
    }

    pub fn scatter_probability(&self) -> f64 {
        self.probability(Symbol::Scatter)
    }

    /// Paying symbols with their cell probability
    pub fn paying(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
        Symbol::PAYING.iter().map(move |&s| (s, self.probability(s)))
    }

    /// Sum over all symbols (1.0 for a valid model)
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_index_roundtrip() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
            assert_eq!(Symbol::from_index(i), Some(*symbol));
        }
        assert_eq!(Symbol::from_index(Symbol::COUNT), None);
    }

    #[test]
    fn test_symbol_chars() {
        assert_eq!(Symbol::from_char('a'), Some(Symbol::A));
        assert_eq!(Symbol::from_char('S'), Some(Symbol::Scatter));
        assert_eq!(Symbol::from_char('W'), None);
        assert_eq!(Symbol::Scatter.to_string(), "S");
    }

    #[test]
    fn test_paying_excludes_scatter() {
        assert!(Symbol::PAYING.iter().all(|s| s.is_paying()));
        assert!(!Symbol::Scatter.is_paying());
    }

    #[test]
    fn test_scatter_serde_name() {
        let json = serde_json::to_string(&Symbol::Scatter).unwrap();
        assert_eq!(json, "\"S\"");
        let back: Symbol = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(back, Symbol::C);
    }
}
