use crate::application::engine::MachineStatus;
use crate::domain::bill::BillInventory;
use crate::domain::inventory::CoinInventory;
use crate::domain::transaction::{ExchangeTransaction, TransactionSummary};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct InventoryRow {
    coin: u32,
    count: u32,
}

#[derive(Serialize)]
struct BillRow {
    bill: String,
    count: u64,
}

#[derive(Serialize)]
struct HistoryRow {
    id: u64,
    amount: u32,
    minimal: bool,
    breakdown: String,
    timestamp: String,
}

/// What happened to one row of a command script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub row: u64,
    pub command: String,
    pub result: String,
}

#[derive(Serialize)]
struct StatusRow {
    total: String,
    operational: bool,
}

/// Writes machine reports as CSV.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// `coin,count`, smallest coin first.
    pub fn write_inventory(&mut self, inventory: &CoinInventory) -> Result<()> {
        for (coin, count) in inventory.iter() {
            self.writer.serialize(InventoryRow {
                coin: coin.cents(),
                count,
            })?;
        }
        self.flush()
    }

    /// `bill,count`, with a final `arbitrary` row carrying the accumulated value.
    pub fn write_bills(&mut self, bills: &BillInventory) -> Result<()> {
        for (bill, count) in &bills.by_denomination {
            self.writer.serialize(BillRow {
                bill: bill.to_string(),
                count: u64::from(*count),
            })?;
        }
        self.writer.serialize(BillRow {
            bill: "arbitrary".to_string(),
            count: bills.arbitrary_total,
        })?;
        self.flush()
    }

    pub fn write_history(&mut self, history: &[ExchangeTransaction]) -> Result<()> {
        for tx in history {
            self.writer.serialize(HistoryRow {
                id: tx.id,
                amount: tx.amount,
                minimal: tx.strategy.is_minimal(),
                breakdown: tx.breakdown.to_string(),
                timestamp: tx.created_at.to_rfc3339(),
            })?;
        }
        self.flush()
    }

    pub fn write_summary(&mut self, summary: &[TransactionSummary]) -> Result<()> {
        for row in summary {
            self.writer.serialize(row)?;
        }
        self.flush()
    }

    pub fn write_status(&mut self, status: &MachineStatus) -> Result<()> {
        self.writer.serialize(StatusRow {
            total: format!("${}", status.total_dollars()),
            operational: status.operational,
        })?;
        self.flush()
    }

    /// `row,command,result`, one line per script row in input order.
    pub fn write_results(&mut self, outcomes: &[CommandOutcome]) -> Result<()> {
        for outcome in outcomes {
            self.writer.serialize(outcome)?;
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
