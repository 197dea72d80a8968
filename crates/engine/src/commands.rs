//! Command structs for engine operations.
//!
//! These types group parameters for write and list operations, keeping call
//! sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::TransactionKind;

/// Execute an internal transfer between two accounts of this ledger.
#[derive(Clone, Debug)]
pub struct InternalTransferCmd {
    pub from_account_id: Uuid,
    pub to_account_number: String,
    pub amount_minor: i64,
    pub description: Option<String>,
}

impl InternalTransferCmd {
    #[must_use]
    pub fn new(from_account_id: Uuid, to_account_number: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            from_account_id,
            to_account_number: to_account_number.into(),
            amount_minor,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Sort order for ledger history listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransactionSort {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

/// Filter for ledger history listings.
///
/// `to` is inclusive of the whole day when it carries no time component; the
/// caller is expected to pass end-of-day timestamps for date-only filters.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub sort: TransactionSort,
}
