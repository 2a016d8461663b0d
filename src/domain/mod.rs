//! Domain layer: coins, inventories, the change planner and ledger records.
//!
//! Everything here is synchronous and free of locking; sharing and
//! persistence live in the application and infrastructure layers.

pub mod bill;
pub mod change;
pub mod coin;
pub mod inventory;
pub mod ports;
pub mod transaction;
