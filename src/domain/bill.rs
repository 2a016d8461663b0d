use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bills taken in by the machine.
///
/// Restricted exchanges count bills by denomination; arbitrary-amount
/// exchanges only add to `arbitrary_total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillInventory {
    pub by_denomination: BTreeMap<u32, u32>,
    pub arbitrary_total: u64,
}

impl BillInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the bill behind one successful exchange.
    ///
    /// `amount` must already be validated; exactly one of the two tallies moves.
    pub fn register(&mut self, amount: u32, allow_arbitrary: bool) {
        if allow_arbitrary {
            self.arbitrary_total = self.arbitrary_total.saturating_add(u64::from(amount));
        } else {
            let count = self.by_denomination.entry(amount).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    pub fn count(&self, denomination: u32) -> u32 {
        self.by_denomination
            .get(&denomination)
            .copied()
            .unwrap_or(0)
    }
}
