use crate::domain::ports::TransactionLedger;
use crate::domain::transaction::{ExchangeTransaction, NewTransaction};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction ledger.
///
/// Uses `Arc<RwLock<Vec<ExchangeTransaction>>>` for shared concurrent access
/// and an atomic counter for id assignment. Ids start at 1.
/// Ideal for testing or runs where history need not survive the process.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    transactions: Arc<RwLock<Vec<ExchangeTransaction>>>,
    last_id: Arc<AtomicU64>,
}

impl InMemoryLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionLedger for InMemoryLedger {
    async fn append(&self, tx: NewTransaction) -> Result<ExchangeTransaction> {
        let mut transactions = self.transactions.write().await;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = tx.with_id(id);
        transactions.push(record.clone());
        Ok(record)
    }

    async fn all(&self) -> Result<Vec<ExchangeTransaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.clone())
    }
}
