//! Pay table: payout multiplier per (symbol, consecutive reel count)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::symbols::Symbol;

/// Shortest paying run of reels
pub const MIN_PAY_COUNT: u8 = 3;
/// Longest paying run of reels
pub const MAX_PAY_COUNT: u8 = 6;

const COUNT_BUCKETS: usize = (MAX_PAY_COUNT - MIN_PAY_COUNT + 1) as usize;

/// One pay table entry as written in config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayEntry {
    pub symbol: Symbol,
    /// Consecutive reels from the left (3..=6)
    pub count: u8,
    /// Bet multiplier paid per way
    pub pay: f64,
}

impl PayEntry {
    pub fn new(symbol: Symbol, count: u8, pay: f64) -> Self {
        Self { symbol, count, pay }
    }
}

/// Fixed-size pay lookup indexed by paying symbol × count bucket.
/// Absent entries pay nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct PayTable {
    pays: [[Option<f64>; COUNT_BUCKETS]; Symbol::PAYING_COUNT],
}

impl PayTable {
    /// Build from config entries, rejecting scatter entries, counts outside
    /// 3..=6, negative or non-finite payouts and duplicate keys.
    pub fn from_entries(entries: &[PayEntry]) -> Result<Self, ConfigError> {
        let mut pays = [[None; COUNT_BUCKETS]; Symbol::PAYING_COUNT];

        for entry in entries {
            if entry.symbol.is_scatter() {
                return Err(ConfigError::PayTableScatter);
            }
            if !(MIN_PAY_COUNT..=MAX_PAY_COUNT).contains(&entry.count) {
                return Err(ConfigError::PayTableCount {
                    symbol: entry.symbol,
                    count: entry.count,
                });
            }
            if !entry.pay.is_finite() || entry.pay < 0.0 {
                return Err(ConfigError::PayTableValue {
                    symbol: entry.symbol,
                    count: entry.count,
                    pay: entry.pay,
                });
            }

            let slot = &mut pays[entry.symbol.index()][(entry.count - MIN_PAY_COUNT) as usize];
            if slot.is_some() {
                return Err(ConfigError::PayTableDuplicate {
                    symbol: entry.symbol,
                    count: entry.count,
                });
            }
            *slot = Some(entry.pay);
        }

        Ok(Self { pays })
    }

    /// Explicit entry for `(symbol, count)`, if any
    #[inline]
    pub fn get(&self, symbol: Symbol, count: usize) -> Option<f64> {
        if symbol.is_scatter() || !(MIN_PAY_COUNT as usize..=MAX_PAY_COUNT as usize).contains(&count) {
            return None;
        }
        self.pays[symbol.index()][count - MIN_PAY_COUNT as usize]
    }

    /// Payout for `(symbol, count)`, 0.0 when absent
    #[inline]
    pub fn payout(&self, symbol: Symbol, count: usize) -> f64 {
        self.get(symbol, count).unwrap_or(0.0)
    }

    /// All explicit entries in symbol / count order
    pub fn entries(&self) -> Vec<PayEntry> {
        let mut out = Vec::new();
        for symbol in Symbol::PAYING {
            for (bucket, pay) in self.pays[symbol.index()].iter().enumerate() {
                if let Some(pay) = pay {
                    out.push(PayEntry::new(symbol, MIN_PAY_COUNT + bucket as u8, *pay));
                }
            }
        }
        out
    }

    /// Longest explicit count in the table
    pub fn longest_count(&self) -> Option<u8> {
        self.entries().iter().map(|e| e.count).max()
    }
}

/// Shipped Mixtape Megaways pay table
pub fn standard_pay_entries() -> Vec<PayEntry> {
    use Symbol::*;
    vec![
        // Premium
        PayEntry::new(A, 3, 5.0),
        PayEntry::new(A, 4, 25.0),
        PayEntry::new(A, 5, 50.0),
        PayEntry::new(B, 3, 2.5),
        PayEntry::new(B, 4, 7.5),
        PayEntry::new(B, 5, 10.0),
        PayEntry::new(C, 3, 1.0),
        PayEntry::new(C, 4, 3.5),
        PayEntry::new(C, 5, 5.0),
        // Mid
        PayEntry::new(D, 3, 0.4),
        PayEntry::new(D, 4, 0.6),
        PayEntry::new(D, 5, 1.5),
        PayEntry::new(E, 3, 0.4),
        PayEntry::new(E, 4, 0.6),
        PayEntry::new(E, 5, 1.5),
        // Low
        PayEntry::new(F, 3, 0.25),
        PayEntry::new(F, 4, 0.4),
        PayEntry::new(F, 5, 1.0),
        PayEntry::new(G, 3, 0.25),
        PayEntry::new(G, 4, 0.4),
        PayEntry::new(G, 5, 1.0),
        // H and I only pay from four reels
        PayEntry::new(H, 4, 0.1),
        PayEntry::new(H, 5, 0.4),
        PayEntry::new(I, 4, 0.1),
        PayEntry::new(I, 5, 0.4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_paytable_lookup() {
        let table = PayTable::from_entries(&standard_pay_entries()).unwrap();
        assert_eq!(table.get(Symbol::A, 5), Some(50.0));
        assert_eq!(table.get(Symbol::H, 3), None);
        assert_eq!(table.payout(Symbol::H, 3), 0.0);
        assert_eq!(table.get(Symbol::C, 6), None);
        assert_eq!(table.get(Symbol::Scatter, 3), None);
        assert_eq!(table.get(Symbol::A, 2), None);
        assert_eq!(table.entries().len(), standard_pay_entries().len());
        assert_eq!(table.longest_count(), Some(5));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let bad_count = [PayEntry::new(Symbol::A, 7, 1.0)];
        assert_eq!(
            PayTable::from_entries(&bad_count),
            Err(ConfigError::PayTableCount { symbol: Symbol::A, count: 7 })
        );

        let scatter = [PayEntry::new(Symbol::Scatter, 3, 1.0)];
        assert_eq!(PayTable::from_entries(&scatter), Err(ConfigError::PayTableScatter));

        let negative = [PayEntry::new(Symbol::B, 3, -1.0)];
        assert!(matches!(
            PayTable::from_entries(&negative),
            Err(ConfigError::PayTableValue { .. })
        ));

        let duplicate = [PayEntry::new(Symbol::B, 3, 1.0), PayEntry::new(Symbol::B, 3, 2.0)];
        assert!(matches!(
            PayTable::from_entries(&duplicate),
            Err(ConfigError::PayTableDuplicate { .. })
        ));
    }

    #[test]
    fn test_six_reel_bucket() {
        let table = PayTable::from_entries(&[PayEntry::new(Symbol::D, 6, 3.0)]).unwrap();
        assert_eq!(table.get(Symbol::D, 6), Some(3.0));
    }
}
