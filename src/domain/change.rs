//! Change-making: bill validation and the greedy coin planner.
//!
//! Planning is pure. It reads a `CoinInventory` snapshot and never mutates
//! it; committing the resulting `Breakdown` is the store's job.

use crate::domain::coin::{Breakdown, Strategy};
use crate::domain::inventory::CoinInventory;
use crate::error::{ExchangeError, Result};

/// Bill denominations accepted when arbitrary amounts are not allowed.
pub const ALLOWED_BILLS: [u32; 7] = [1, 2, 5, 10, 20, 50, 100];

/// Cents per bill unit.
pub const CENTS_PER_UNIT: u64 = 100;

/// A request to exchange one bill (or an arbitrary amount) for coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub amount: i64,
    pub strategy: Strategy,
    pub allow_arbitrary: bool,
}

impl ExchangeRequest {
    pub fn new(amount: i64, minimal: bool, allow_arbitrary: bool) -> Self {
        Self {
            amount,
            strategy: Strategy::from_minimal(minimal),
            allow_arbitrary,
        }
    }

    /// Validates the amount, returning it in bill units.
    pub fn validate(&self) -> Result<u32> {
        validate_amount(self.amount, self.allow_arbitrary)
    }
}

/// Checks a bill amount against the denomination rules.
///
/// Arbitrary mode accepts anything strictly greater than one; restricted mode
/// accepts only `ALLOWED_BILLS`.
pub fn validate_amount(amount: i64, allow_arbitrary: bool) -> Result<u32> {
    let valid = if allow_arbitrary {
        amount > 1
    } else {
        ALLOWED_BILLS.iter().any(|bill| i64::from(*bill) == amount)
    };
    if !valid {
        return Err(ExchangeError::InvalidAmount(amount));
    }
    u32::try_from(amount).map_err(|_| ExchangeError::InvalidAmount(amount))
}

/// Single greedy pass over the strategy's denomination order.
///
/// Fails with `InsufficientInventory` if the snapshot cannot cover the full
/// amount.
pub fn plan(amount: u32, strategy: Strategy, available: &CoinInventory) -> Result<Breakdown> {
    let requested_cents = u64::from(amount) * CENTS_PER_UNIT;
    let mut remaining = requested_cents;
    let mut breakdown = Breakdown::new();

    for coin in strategy.order() {
        let value = u64::from(coin.cents());
        let used = (remaining / value).min(u64::from(available.count(coin)));
        if used > 0 {
            // bounded by available.count(), so it fits
            breakdown.insert(coin, used as u32);
            remaining -= used * value;
        }
    }

    if remaining > 0 {
        return Err(ExchangeError::InsufficientInventory {
            requested_cents,
            coin: None,
        });
    }
    Ok(breakdown)
}
