//! Runtime configuration.

/// Coins of each denomination loaded at start and on every reset.
pub const DEFAULT_INITIAL_QUANTITY: u32 = 100;

/// Environment variable overriding the initial coin quantity.
pub const INITIAL_QUANTITY_ENV: &str = "COIN_INITIAL_QUANTITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub initial_quantity: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            initial_quantity: DEFAULT_INITIAL_QUANTITY,
        }
    }
}

impl ExchangeConfig {
    pub fn with_initial_quantity(initial_quantity: u32) -> Self {
        Self { initial_quantity }
    }
}
