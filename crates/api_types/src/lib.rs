use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountType {
        Checking,
        Savings,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        /// Account id (UUID).
        ///
        /// This is serialized as a string in JSON.
        pub id: Uuid,
        pub account_number: String,
        pub account_name: String,
        pub account_type: AccountType,
        pub balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountListResponse {
        pub accounts: Vec<AccountView>,
    }

    /// Recent-activity totals shown on the account detail page.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountSummaryView {
        pub total_deposits_minor: i64,
        pub total_withdrawals_minor: i64,
        pub transaction_count: u64,
        pub window_days: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountDetailResponse {
        #[serde(flatten)]
        pub account: AccountView,
        /// Account number with everything but the last four digits hidden.
        pub masked_account_number: String,
        pub summary: AccountSummaryView,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransferStatus {
        Pending,
        InProgress,
        Completed,
        Failed,
        Cancelled,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransferType {
        Internal,
        External,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferCreate {
        pub from_account_id: Uuid,
        pub to_account_number: String,
        /// Destination bank code; absent for internal transfers.
        pub to_bank_code: Option<String>,
        /// Must be > 0 and within the configured transfer ceiling.
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        pub id: Uuid,
        pub from_account_id: Uuid,
        pub to_account_number: String,
        pub to_bank_code: Option<String>,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub status: TransferStatus,
        pub transfer_type: TransferType,
        pub reference_number: String,
        pub created_at: DateTime<Utc>,
        /// Set once the transfer reaches a terminal status.
        pub completed_at: Option<DateTime<Utc>>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferListQuery {
        pub account_id: Uuid,
        pub status: Option<TransferStatus>,
        pub limit: Option<u64>,
        pub offset: Option<u64>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
        Transfer,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Completed,
        Pending,
        Failed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionSort {
        DateDesc,
        DateAsc,
        AmountDesc,
        AmountAsc,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub kind: TransactionKind,
        /// Always positive; the sign is implied by `kind`.
        pub amount_minor: i64,
        pub description: Option<String>,
        pub counterparty_account: Option<String>,
        pub balance_after_minor: i64,
        pub reference_number: String,
        pub status: TransactionStatus,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub kind: Option<TransactionKind>,
        /// RFC3339 timestamps; `to` is inclusive.
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub limit: Option<u64>,
        pub offset: Option<u64>,
        pub sort: Option<TransactionSort>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Total rows matching the filter, before pagination.
        pub total_count: u64,
        pub limit: u64,
        pub offset: u64,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}
