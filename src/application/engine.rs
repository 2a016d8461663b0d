use crate::application::inventory::InventoryStore;
use crate::domain::bill::BillInventory;
use crate::domain::change::{self, ExchangeRequest};
use crate::domain::coin::{Breakdown, Coin};
use crate::domain::inventory::{CoinInventory, cents_to_dollars};
use crate::domain::ports::TransactionLedgerBox;
use crate::domain::transaction::{
    ExchangeTransaction, NewTransaction, TransactionFilter, TransactionSummary,
};
use crate::error::{ExchangeError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Coin counts plus derived totals, as reported by `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineStatus {
    pub coins: CoinInventory,
    pub total_cents: u64,
    pub operational: bool,
}

impl MachineStatus {
    pub fn total_dollars(&self) -> Decimal {
        cents_to_dollars(self.total_cents)
    }
}

/// The coin exchange machine.
///
/// `ExchangeEngine` owns the inventory store and the transaction ledger and
/// exposes every machine operation. It holds no other state; share it between
/// tasks behind an `Arc`.
pub struct ExchangeEngine {
    inventory: InventoryStore,
    ledger: TransactionLedgerBox,
}

impl ExchangeEngine {
    /// Creates a new `ExchangeEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `initial_quantity` - Coins of each denomination at start and after every reset.
    /// * `ledger` - The store for completed exchanges.
    pub fn new(initial_quantity: u32, ledger: TransactionLedgerBox) -> Self {
        Self {
            inventory: InventoryStore::new(initial_quantity),
            ledger,
        }
    }

    /// Exchanges a bill for coins.
    ///
    /// Runs in two phases. The plan is computed against a snapshot without
    /// holding the write lock, then handed to `commit_plan`. Any
    /// failure leaves coins, bills and ledger as they were.
    pub async fn exchange(&self, request: ExchangeRequest) -> Result<Breakdown> {
        let amount = request.validate()?;

        let snapshot = self.inventory.snapshot().await;
        let breakdown = change::plan(amount, request.strategy, &snapshot)?;
        debug!(amount, strategy = ?request.strategy, %breakdown, "Planned exchange");

        self.commit_plan(amount, &request, &breakdown).await?;
        Ok(breakdown)
    }

    /// Commits a breakdown planned for a validated `amount`.
    ///
    /// Under the inventory write lock the breakdown is re-checked against the
    /// live counts, the ledger record is appended, and only then are coins
    /// removed and the bill registered. A plan made on an outdated snapshot
    /// fails with `InsufficientInventory`.
    pub(crate) async fn commit_plan(
        &self,
        amount: u32,
        request: &ExchangeRequest,
        breakdown: &Breakdown,
    ) -> Result<ExchangeTransaction> {
        let record = self
            .inventory
            .commit(breakdown, amount, request.allow_arbitrary, || {
                self.ledger.append(NewTransaction {
                    amount,
                    strategy: request.strategy,
                    breakdown: breakdown.clone(),
                    created_at: Utc::now(),
                })
            })
            .await?;

        info!(
            id = record.id,
            amount,
            arbitrary = request.allow_arbitrary,
            %breakdown,
            "Exchanged ${} for {} coins", amount, breakdown.total_coins()
        );
        Ok(record)
    }

    pub async fn inventory(&self) -> CoinInventory {
        self.inventory.snapshot().await
    }

    pub async fn add_coins(&self, denomination: u32, quantity: u32) -> Result<()> {
        let coin = Coin::try_from(denomination)?;
        ensure_positive(quantity)?;
        self.inventory.adjust(coin, i64::from(quantity)).await
    }

    pub async fn remove_coins(&self, denomination: u32, quantity: u32) -> Result<()> {
        let coin = Coin::try_from(denomination)?;
        ensure_positive(quantity)?;
        self.inventory.adjust(coin, -i64::from(quantity)).await
    }

    /// Restores the configured coin counts and clears the bill tallies.
    /// The ledger is left alone.
    pub async fn reset_inventory(&self) {
        self.inventory.reset().await
    }

    pub async fn bills_inventory(&self) -> BillInventory {
        self.inventory.bills().await
    }

    pub async fn is_operational(&self) -> bool {
        self.inventory.is_operational().await
    }

    pub async fn status(&self) -> MachineStatus {
        let coins = self.inventory.snapshot().await;
        let total_cents = coins.total_cents();
        MachineStatus {
            coins,
            total_cents,
            operational: total_cents > 0,
        }
    }

    pub async fn history(&self) -> Result<Vec<ExchangeTransaction>> {
        self.ledger.all().await
    }

    pub async fn filter_history(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<ExchangeTransaction>> {
        self.ledger.filter(filter).await
    }

    pub async fn summary(&self) -> Result<Vec<TransactionSummary>> {
        self.ledger.summarize().await
    }
}

fn ensure_positive(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(ExchangeError::InvalidQuantity(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
