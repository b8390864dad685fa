pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::ledger::{Balances, compute_balances, compute_group_balances};
pub use crate::core::matcher::{compute_settlements, compute_settlements_at};
pub use crate::core::models::{expense::ExpenseRecord, member::Member, settlement::SettlementSuggestion};
pub use crate::core::services::{GroupLedger, LedgerService};
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
