use crate::error::ExchangeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A coin denomination, valued in cents.
///
/// The set is closed: anything else coming from a caller is rejected with
/// `InvalidDenomination` at the conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Coin {
    OneCent,
    FiveCents,
    TenCents,
    TwentyFiveCents,
}

impl Coin {
    /// Largest first.
    pub const DESCENDING: [Coin; 4] = [
        Coin::TwentyFiveCents,
        Coin::TenCents,
        Coin::FiveCents,
        Coin::OneCent,
    ];

    /// Smallest first.
    pub const ASCENDING: [Coin; 4] = [
        Coin::OneCent,
        Coin::FiveCents,
        Coin::TenCents,
        Coin::TwentyFiveCents,
    ];

    pub fn cents(self) -> u32 {
        match self {
            Coin::OneCent => 1,
            Coin::FiveCents => 5,
            Coin::TenCents => 10,
            Coin::TwentyFiveCents => 25,
        }
    }
}

impl TryFrom<u32> for Coin {
    type Error = ExchangeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Coin::OneCent),
            5 => Ok(Coin::FiveCents),
            10 => Ok(Coin::TenCents),
            25 => Ok(Coin::TwentyFiveCents),
            other => Err(ExchangeError::InvalidDenomination(other)),
        }
    }
}

impl From<Coin> for u32 {
    fn from(coin: Coin) -> Self {
        coin.cents()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cents())
    }
}

/// Order in which the greedy planner walks the denominations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Largest coins first, fewest coins dispensed.
    Minimal,
    /// Smallest coins first, most coins dispensed.
    Maximal,
}

impl Strategy {
    pub fn from_minimal(minimal: bool) -> Self {
        if minimal {
            Strategy::Minimal
        } else {
            Strategy::Maximal
        }
    }

    pub fn is_minimal(self) -> bool {
        self == Strategy::Minimal
    }

    pub fn order(self) -> [Coin; 4] {
        match self {
            Strategy::Minimal => Coin::DESCENDING,
            Strategy::Maximal => Coin::ASCENDING,
        }
    }
}

/// Coins used to satisfy one exchange. Only non-zero counts are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(BTreeMap<Coin, u32>);

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coin: Coin, count: u32) {
        if count > 0 {
            self.0.insert(coin, count);
        } else {
            self.0.remove(&coin);
        }
    }

    pub fn get(&self, coin: Coin) -> u32 {
        self.0.get(&coin).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coin, u32)> + '_ {
        self.0.iter().map(|(coin, count)| (*coin, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_coins(&self) -> u64 {
        self.0.values().map(|count| u64::from(*count)).sum()
    }

    pub fn total_cents(&self) -> u64 {
        self.iter()
            .map(|(coin, count)| u64::from(coin.cents()) * u64::from(count))
            .sum()
    }
}

impl FromIterator<(Coin, u32)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (Coin, u32)>>(iter: I) -> Self {
        let mut breakdown = Breakdown::new();
        for (coin, count) in iter {
            breakdown.insert(coin, count);
        }
        breakdown
    }
}

/// Renders as `25:40 10:1`, largest coin first.
impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .rev()
            .map(|(coin, count)| format!("{}:{}", coin, count))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
