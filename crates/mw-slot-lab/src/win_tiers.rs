//! Win Tiers — win categorization by bet multiple

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Win category shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WinTier {
    NoWin,
    Win,
    BigWin,
}

impl fmt::Display for WinTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WinTier::NoWin => "no win",
            WinTier::Win => "win",
            WinTier::BigWin => "BIG WIN",
        };
        f.write_str(name)
    }
}

/// Thresholds for categorizing wins, as bet multiples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinTierThresholds {
    /// Minimum ratio for "big win"
    pub big_win: f64,
}

impl Default for WinTierThresholds {
    fn default() -> Self {
        Self { big_win: 30.0 }
    }
}

impl WinTierThresholds {
    /// Tier for a win expressed as a bet multiple
    pub fn classify(&self, win_multiplier: f64) -> WinTier {
        if win_multiplier >= self.big_win {
            WinTier::BigWin
        } else if win_multiplier > 0.0 {
            WinTier::Win
        } else {
            WinTier::NoWin
        }
    }

    /// Tier for an absolute win at the given bet
    pub fn classify_amount(&self, win: f64, bet: f64) -> WinTier {
        if bet > 0.0 {
            self.classify(win / bet)
        } else {
            WinTier::NoWin
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.big_win.is_finite() || self.big_win <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "big_win threshold must be positive, got {}",
                self.big_win
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let tiers = WinTierThresholds::default();
        assert_eq!(tiers.classify(0.0), WinTier::NoWin);
        assert_eq!(tiers.classify(0.1), WinTier::Win);
        assert_eq!(tiers.classify(29.99), WinTier::Win);
        assert_eq!(tiers.classify(30.0), WinTier::BigWin);
        assert_eq!(tiers.classify_amount(60.0, 2.0), WinTier::BigWin);
        assert_eq!(tiers.classify_amount(59.0, 2.0), WinTier::Win);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(WinTierThresholds { big_win: 0.0 }.validate().is_err());
        assert!(WinTierThresholds { big_win: f64::INFINITY }.validate().is_err());
        assert!(WinTierThresholds::default().validate().is_ok());
    }
}
