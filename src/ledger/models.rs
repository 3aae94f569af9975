//! Data models for accounts, ledger entries and transfers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Account lifecycle status. Accounts are never physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Open,
    Closed,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Open => "open",
            AccountStatus::Closed => "closed",
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(v: &str) -> Self {
        match v {
            "closed" => AccountStatus::Closed,
            _ => AccountStatus::Open,
        }
    }
}

/// Ledger entry direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    Credit,
    Debit,
}

impl EntryDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryDirection::Credit => "credit",
            EntryDirection::Debit => "debit",
        }
    }
}

impl From<&str> for EntryDirection {
    fn from(v: &str) -> Self {
        match v {
            "debit" => EntryDirection::Debit,
            _ => EntryDirection::Credit,
        }
    }
}

/// A user-owned account. Currency is immutable after creation.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: i64,
    pub user_id: i64,
    pub currency: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

/// One side of a balance movement. Write-once: never updated or deleted.
/// Every transfer produces exactly one debit and one credit of equal amount
/// sharing the same `ref`.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub entry_id: i64,
    pub account_id: i64,
    pub direction: EntryDirection,
    pub amount: Decimal,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted transfer. Only successful executions produce a row, so
/// `succeeded` is the only status ever stored.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub transfer_id: i64,
    pub user_id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Decimal,
    pub status: String,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

/// Externally visible outcome of a transfer execution. `replayed` is set
/// when the idempotency key matched a previously persisted transfer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferResult {
    pub id: i64,
    pub status: String,
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub idempotency_key: String,
    pub replayed: bool,
}

impl TransferResult {
    pub fn from_row(transfer: Transfer, replayed: bool) -> Self {
        Self {
            id: transfer.transfer_id,
            status: transfer.status,
            amount: transfer.amount,
            from_account_id: transfer.from_account_id,
            to_account_id: transfer.to_account_id,
            idempotency_key: transfer.idempotency_key,
            replayed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_roundtrip() {
        assert_eq!(AccountStatus::from("open"), AccountStatus::Open);
        assert_eq!(AccountStatus::from("closed"), AccountStatus::Closed);
        assert_eq!(AccountStatus::from("anything"), AccountStatus::Open);
        assert_eq!(AccountStatus::Open.as_str(), "open");
    }

    #[test]
    fn test_entry_direction_roundtrip() {
        assert_eq!(EntryDirection::from("credit"), EntryDirection::Credit);
        assert_eq!(EntryDirection::from("debit"), EntryDirection::Debit);
        assert_eq!(EntryDirection::Debit.as_str(), "debit");
    }

    #[test]
    fn test_result_carries_replayed_flag() {
        let row = Transfer {
            transfer_id: 7,
            user_id: 1,
            from_account_id: 10,
            to_account_id: 11,
            amount: Decimal::new(5000, 2),
            status: "succeeded".to_string(),
            idempotency_key: "k1".to_string(),
            created_at: Utc::now(),
        };
        let first = TransferResult::from_row(row.clone(), false);
        let replay = TransferResult::from_row(row, true);
        assert!(!first.replayed);
        assert!(replay.replayed);
        assert_eq!(first.id, replay.id);
        assert_eq!(first.amount, replay.amount);
    }
}
