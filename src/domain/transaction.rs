use crate::domain::coin::{Breakdown, Strategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed exchange as stored in the ledger. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeTransaction {
    pub id: u64,
    pub amount: u32,
    #[serde(
        rename = "minimal",
        serialize_with = "serialize_strategy",
        deserialize_with = "deserialize_strategy"
    )]
    pub strategy: Strategy,
    pub breakdown: Breakdown,
    pub created_at: DateTime<Utc>,
}

fn serialize_strategy<S>(strategy: &Strategy, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_bool(strategy.is_minimal())
}

fn deserialize_strategy<'de, D>(deserializer: D) -> Result<Strategy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let minimal = bool::deserialize(deserializer)?;
    Ok(Strategy::from_minimal(minimal))
}

/// A transaction waiting for the ledger to assign its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: u32,
    pub strategy: Strategy,
    pub breakdown: Breakdown,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    pub fn with_id(self, id: u64) -> ExchangeTransaction {
        ExchangeTransaction {
            id,
            amount: self.amount,
            strategy: self.strategy,
            breakdown: self.breakdown,
            created_at: self.created_at,
        }
    }
}

/// History query. Every bound that is set must hold; bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub min_amount: Option<u32>,
    pub max_amount: Option<u32>,
    pub strategy: Option<Strategy>,
}

impl TransactionFilter {
    /// True when no bound is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, tx: &ExchangeTransaction) -> bool {
        self.start.is_none_or(|start| tx.created_at >= start)
            && self.end.is_none_or(|end| tx.created_at <= end)
            && self.min_amount.is_none_or(|min| tx.amount >= min)
            && self.max_amount.is_none_or(|max| tx.amount <= max)
            && self.strategy.is_none_or(|strategy| tx.strategy == strategy)
    }
}

/// Per-transaction summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    pub amount: u32,
    #[serde(serialize_with = "serialize_strategy")]
    pub minimal: Strategy,
    pub total_coins: u64,
}

impl From<&ExchangeTransaction> for TransactionSummary {
    fn from(tx: &ExchangeTransaction) -> Self {
        Self {
            amount: tx.amount,
            minimal: tx.strategy,
            total_coins: tx.breakdown.total_coins(),
        }
    }
}
