//! Application layer containing the machine's orchestration logic.
//!
//! `InventoryStore` owns the shared coin and bill state behind a `tokio`
//! lock, and `ExchangeEngine` drives plan-then-commit exchanges against it
//! while recording each success in the transaction ledger.

pub mod engine;
pub mod inventory;
