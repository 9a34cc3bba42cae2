//! Wild reels and their multipliers (free spins only)

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::weighted::{WeightedChoice, WeightedTable};

/// Set of reel indices that are fully wild for one free spin.
/// Bitmask over reels `0..8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildReels(u8);

impl WildReels {
    /// Highest representable reel count
    pub const CAPACITY: usize = 8;

    pub const NONE: WildReels = WildReels(0);

    pub fn from_reels<I: IntoIterator<Item = usize>>(reels: I) -> Self {
        let mut set = Self::NONE;
        for reel in reels {
            set.insert(reel);
        }
        set
    }

    /// Mark `reel` wild; returns false when the index is out of range
    pub fn insert(&mut self, reel: usize) -> bool {
        if reel >= Self::CAPACITY {
            return false;
        }
        self.0 |= 1 << reel;
        true
    }

    #[inline]
    pub fn contains(&self, reel: usize) -> bool {
        reel < Self::CAPACITY && self.0 & (1 << reel) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Wild reel indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::CAPACITY).filter(move |&r| self.contains(r))
    }
}

/// Multiplier attached to one wild reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildMultiplier {
    pub reel: usize,
    pub multiplier: u32,
}

/// Multipliers of the current free spin's wild reels, ordered by reel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildMultipliers {
    entries: Vec<WildMultiplier>,
}

impl WildMultipliers {
    pub fn new(mut entries: Vec<WildMultiplier>) -> Self {
        entries.sort_by_key(|e| e.reel);
        Self { entries }
    }

    pub fn get(&self, reel: usize) -> Option<u32> {
        self.entries.iter().find(|e| e.reel == reel).map(|e| e.multiplier)
    }

    pub fn entries(&self) -> &[WildMultiplier] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Win factor for the spin: multipliers stack by summing, 1 without wilds
    pub fn factor(&self) -> u32 {
        if self.entries.is_empty() {
            1
        } else {
            self.entries.iter().map(|e| e.multiplier).sum()
        }
    }

    /// Reels carrying a multiplier
    pub fn reels(&self) -> WildReels {
        WildReels::from_reels(self.entries.iter().map(|e| e.reel))
    }
}

/// Samples the wild reel count, distinct wild reels and one multiplier per
/// wild reel.
#[derive(Debug, Clone)]
pub struct WildSampler {
    reels: usize,
    counts: WeightedChoice<u8>,
    multipliers: WeightedChoice<u32>,
}

impl WildSampler {
    pub fn new(
        reels: usize,
        counts: &WeightedTable<u8>,
        multipliers: &WeightedTable<u32>,
    ) -> Result<Self, ConfigError> {
        if multipliers.values.contains(&0) {
            return Err(ConfigError::Distribution {
                name: "wild_multipliers",
                reason: "multipliers must be at least 1".into(),
            });
        }
        if counts.values.iter().any(|&c| c as usize > reels) {
            log::warn!("wild reel counts above {reels} reels will be clamped");
        }

        Ok(Self {
            reels,
            counts: counts.compile("wild_reel_counts")?,
            multipliers: multipliers.compile("wild_multipliers")?,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (WildReels, WildMultipliers) {
        let count = (self.counts.sample(rng) as usize).min(self.reels);
        if count == 0 {
            return (WildReels::NONE, WildMultipliers::default());
        }

        let reels = WildReels::from_reels(index::sample(rng, self.reels, count).into_vec());
        let entries = reels
            .iter()
            .map(|reel| WildMultiplier {
                reel,
                multiplier: self.multipliers.sample(rng),
            })
            .collect();

        (reels, WildMultipliers::new(entries))
    }

    pub fn counts(&self) -> &WeightedChoice<u8> {
        &self.counts
    }

    pub fn multipliers(&self) -> &WeightedChoice<u32> {
        &self.multipliers
    }
}
