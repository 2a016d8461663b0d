use crate::domain::bill::BillInventory;
use crate::domain::coin::{Breakdown, Coin};
use crate::domain::inventory::CoinInventory;
use crate::error::Result;
use std::future::Future;
use tokio::sync::RwLock;
use tracing::info;

/// Everything the machine physically holds. Guarded as one unit so readers
/// never see coins and bills out of step.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryState {
    pub coins: CoinInventory,
    pub bills: BillInventory,
}

impl InventoryState {
    fn new(initial_quantity: u32) -> Self {
        Self {
            coins: CoinInventory::uniform(initial_quantity),
            bills: BillInventory::new(),
        }
    }
}

/// Shared owner of the coin and bill inventories.
///
/// Reads take the read lock and return copies. Every mutation (exchange
/// commit, adjust, reset) takes the write lock, so they are serialized
/// against each other.
pub struct InventoryStore {
    state: RwLock<InventoryState>,
    initial_quantity: u32,
}

impl InventoryStore {
    /// Creates a store with `initial_quantity` coins of each denomination.
    pub fn new(initial_quantity: u32) -> Self {
        Self {
            state: RwLock::new(InventoryState::new(initial_quantity)),
            initial_quantity,
        }
    }

    /// Restores the configured coin counts and clears the bill tallies.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = InventoryState::new(self.initial_quantity);
        info!(
            initial_quantity = self.initial_quantity,
            "Inventory reset to {} coins for each type", self.initial_quantity
        );
    }

    /// Point-in-time copy of the coin counts.
    pub async fn snapshot(&self) -> CoinInventory {
        self.state.read().await.coins.clone()
    }

    /// Point-in-time copy of the bill tallies.
    pub async fn bills(&self) -> BillInventory {
        self.state.read().await.bills.clone()
    }

    pub async fn total_cents(&self) -> u64 {
        self.state.read().await.coins.total_cents()
    }

    pub async fn is_operational(&self) -> bool {
        self.total_cents().await > 0
    }

    /// Applies a planned exchange under the write lock.
    ///
    /// `breakdown` is re-checked against the live coins, then `record` runs,
    /// and only once it succeeds are the coins withdrawn and the bill
    /// registered. An error from either step leaves the inventory untouched.
    pub async fn commit<T, F, Fut>(
        &self,
        breakdown: &Breakdown,
        amount: u32,
        allow_arbitrary: bool,
        record: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut state = self.state.write().await;
        state.coins.ensure_covers(breakdown)?;
        let recorded = record().await?;
        state.coins.withdraw(breakdown)?;
        state.bills.register(amount, allow_arbitrary);
        Ok(recorded)
    }

    /// Adds or removes coins of one denomination.
    pub async fn adjust(&self, coin: Coin, delta: i64) -> Result<()> {
        let mut state = self.state.write().await;
        state.coins.adjust(coin, delta)?;
        info!(
            coin = coin.cents(),
            delta,
            count = state.coins.count(coin),
            "Adjusted {} cent coins", coin
        );
        Ok(())
    }
}
