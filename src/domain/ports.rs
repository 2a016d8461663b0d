use super::transaction::{
    ExchangeTransaction, NewTransaction, TransactionFilter, TransactionSummary,
};
use crate::error::Result;
use async_trait::async_trait;

/// Append-only store of completed exchanges.
///
/// An `append` either stores the record and returns it with a fresh id, or
/// fails without storing anything.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    async fn append(&self, tx: NewTransaction) -> Result<ExchangeTransaction>;
    async fn all(&self) -> Result<Vec<ExchangeTransaction>>;

    async fn filter(&self, filter: &TransactionFilter) -> Result<Vec<ExchangeTransaction>> {
        let all = self.all().await?;
        Ok(all.into_iter().filter(|tx| filter.matches(tx)).collect())
    }

    async fn summarize(&self) -> Result<Vec<TransactionSummary>> {
        let all = self.all().await?;
        Ok(all.iter().map(TransactionSummary::from).collect())
    }
}

pub type TransactionLedgerBox = Box<dyn TransactionLedger>;
