//! Double-entry ledger: accounts, append-only entries, balances and the
//! idempotent transfer executor.

pub mod balance;
pub mod executor;
pub mod models;
pub mod store;

pub use balance::BalanceCalculator;
pub use executor::{TransferError, TransferExecutor};
pub use models::{
    Account, AccountStatus, EntryDirection, LedgerEntry, Transfer, TransferResult,
};
pub use store::{AccountRepository, LedgerStore, TransferRepository};
