use crate::domain::coin::Coin;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid bill amount: {0}")]
    InvalidAmount(i64),
    #[error("Coin value must be one of 1, 5, 10, 25, got {0}")]
    InvalidDenomination(u32),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    /// Not enough coins to serve the request. `coin` is set when a single
    /// denomination ran short (removal or stale commit).
    #[error("Not enough coins available for {requested_cents} cents{}", coin_suffix(.coin))]
    InsufficientInventory {
        requested_cents: u64,
        coin: Option<Coin>,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid command: {0}")]
    Command(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

fn coin_suffix(coin: &Option<Coin>) -> String {
    coin.map(|c| format!(" (short on {} cent coins)", c.cents()))
        .unwrap_or_default()
}

impl ExchangeError {
    pub fn is_insufficient_inventory(&self) -> bool {
        matches!(self, ExchangeError::InsufficientInventory { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
