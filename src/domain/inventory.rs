use crate::domain::coin::{Breakdown, Coin};
use crate::error::{ExchangeError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coin counts held by the machine.
///
/// Always carries an entry for every denomination, and no count ever goes
/// below zero: every mutator checks before it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinInventory(BTreeMap<Coin, u32>);

impl CoinInventory {
    /// Inventory with `initial` coins of each denomination.
    pub fn uniform(initial: u32) -> Self {
        Self(Coin::ASCENDING.iter().map(|coin| (*coin, initial)).collect())
    }

    pub fn count(&self, coin: Coin) -> u32 {
        self.0.get(&coin).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coin, u32)> + '_ {
        self.0.iter().map(|(coin, count)| (*coin, *count))
    }

    /// Sum of face values, in cents.
    pub fn total_cents(&self) -> u64 {
        self.iter()
            .map(|(coin, count)| u64::from(coin.cents()) * u64::from(count))
            .sum()
    }

    /// Total value in dollars, for display.
    pub fn total_dollars(&self) -> Decimal {
        cents_to_dollars(self.total_cents())
    }

    /// Checks that every count in `breakdown` is available.
    pub fn ensure_covers(&self, breakdown: &Breakdown) -> Result<()> {
        for (coin, used) in breakdown.iter() {
            if used > self.count(coin) {
                return Err(ExchangeError::InsufficientInventory {
                    requested_cents: breakdown.total_cents(),
                    coin: Some(coin),
                });
            }
        }
        Ok(())
    }

    /// Removes the coins in `breakdown`. All or nothing.
    pub fn withdraw(&mut self, breakdown: &Breakdown) -> Result<()> {
        self.ensure_covers(breakdown)?;
        for (coin, used) in breakdown.iter() {
            if let Some(count) = self.0.get_mut(&coin) {
                *count -= used;
            }
        }
        Ok(())
    }

    /// Adds (`delta > 0`) or removes (`delta < 0`) coins of one denomination.
    pub fn adjust(&mut self, coin: Coin, delta: i64) -> Result<()> {
        let overflow = || {
            ExchangeError::InvalidQuantity(format!(
                "{} cent coin count would exceed {}",
                coin.cents(),
                u32::MAX
            ))
        };
        let next = i64::from(self.count(coin))
            .checked_add(delta)
            .ok_or_else(overflow)?;
        if next < 0 {
            return Err(ExchangeError::InsufficientInventory {
                requested_cents: delta.unsigned_abs().saturating_mul(u64::from(coin.cents())),
                coin: Some(coin),
            });
        }
        let next = u32::try_from(next).map_err(|_| overflow())?;
        self.0.insert(coin, next);
        Ok(())
    }
}

pub fn cents_to_dollars(cents: u64) -> Decimal {
    Decimal::new(i64::try_from(cents).unwrap_or(i64::MAX), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_uniform_inventory() {
        let inventory = CoinInventory::uniform(100);
        assert_eq!(inventory.iter().count(), 4);
        assert_eq!(inventory.count(Coin::TenCents), 100);
        assert_eq!(inventory.total_cents(), 4100);
        assert_eq!(inventory.total_dollars(), dec!(41.00));
    }

    #[test]
    fn test_withdraw_success() {
        let mut inventory = CoinInventory::uniform(10);
        let breakdown: Breakdown = [(Coin::TwentyFiveCents, 4), (Coin::OneCent, 10)]
            .into_iter()
            .collect();

        inventory.withdraw(&breakdown).unwrap();
        assert_eq!(inventory.count(Coin::TwentyFiveCents), 6);
        assert_eq!(inventory.count(Coin::OneCent), 0);
        assert_eq!(inventory.count(Coin::TenCents), 10);
    }

    #[test]
    fn test_withdraw_is_all_or_nothing() {
        let mut inventory = CoinInventory::uniform(10);
        let breakdown: Breakdown = [(Coin::TwentyFiveCents, 4), (Coin::OneCent, 11)]
            .into_iter()
            .collect();

        let result = inventory.withdraw(&breakdown);
        assert!(matches!(
            result,
            Err(ExchangeError::InsufficientInventory {
                coin: Some(Coin::OneCent),
                ..
            })
        ));
        assert_eq!(inventory, CoinInventory::uniform(10));
    }

    #[test]
    fn test_adjust_add_and_remove() {
        let mut inventory = CoinInventory::uniform(5);
        inventory.adjust(Coin::FiveCents, 3).unwrap();
        assert_eq!(inventory.count(Coin::FiveCents), 8);

        inventory.adjust(Coin::FiveCents, -8).unwrap();
        assert_eq!(inventory.count(Coin::FiveCents), 0);
    }

    #[test]
    fn test_adjust_below_zero() {
        let mut inventory = CoinInventory::uniform(5);
        let result = inventory.adjust(Coin::TenCents, -6);
        assert!(matches!(
            result,
            Err(ExchangeError::InsufficientInventory {
                requested_cents: 60,
                ..
            })
        ));
        assert_eq!(inventory.count(Coin::TenCents), 5);
    }

    #[test]
    fn test_adjust_overflow() {
        let mut inventory = CoinInventory::uniform(u32::MAX);
        let result = inventory.adjust(Coin::OneCent, 1);
        assert!(matches!(result, Err(ExchangeError::InvalidQuantity(_))));
        assert_eq!(inventory.count(Coin::OneCent), u32::MAX);
    }
}
