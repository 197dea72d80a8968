//! The module contains the `Account` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }
}

impl TryFrom<&str> for AccountType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            other => Err(EngineError::InvalidTransfer(format!(
                "invalid account type: {other}"
            ))),
        }
    }
}

/// A bank account.
///
/// The balance is denormalized onto the row and is the value the transfer
/// executor checks and mutates; the ledger (`transactions`) is the audit
/// trail for it. Balances are integer minor units, never floats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    /// Unique human-facing account number (e.g. `110-123-456789`).
    pub account_number: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub balance_minor: i64,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever the balance is mutated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(
        account_number: String,
        account_name: String,
        account_type: AccountType,
        balance_minor: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if account_number.trim().is_empty() {
            return Err(EngineError::InvalidTransfer(
                "account number must not be empty".to_string(),
            ));
        }
        if balance_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "opening balance must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            account_number,
            account_name,
            account_type,
            balance_minor,
            created_at,
            updated_at: None,
        })
    }

    /// Masked number for display: only the last four digits are shown.
    #[must_use]
    pub fn masked_number(&self) -> String {
        if self.account_number.len() < 4 {
            return "****".to_string();
        }
        let tail = &self.account_number[self.account_number.len() - 4..];
        format!("****-****-{tail}")
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_number: String,
    pub account_name: String,
    pub account_type: String,
    pub balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::transfers::Entity")]
    Transfers,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::transfers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            account_number: ActiveValue::Set(account.account_number.clone()),
            account_name: ActiveValue::Set(account.account_name.clone()),
            account_type: ActiveValue::Set(account.account_type.as_str().to_string()),
            balance_minor: ActiveValue::Set(account.balance_minor),
            created_at: ActiveValue::Set(account.created_at),
            updated_at: ActiveValue::Set(account.updated_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("account not exists".to_string()))?,
            account_number: model.account_number,
            account_name: model.account_name,
            account_type: AccountType::try_from(model.account_type.as_str())?,
            balance_minor: model.balance_minor,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn rejects_negative_opening_balance() {
        let result = Account::new(
            "110-123-456789".to_string(),
            "Main Checking".to_string(),
            AccountType::Checking,
            -1,
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert_eq!(
            result.unwrap_err(),
            EngineError::InvalidAmount("opening balance must be >= 0".to_string())
        );
    }

    #[test]
    fn masks_all_but_last_four_digits() {
        let account = Account::new(
            "110-123-456789".to_string(),
            "Main Checking".to_string(),
            AccountType::Checking,
            0,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(account.masked_number(), "****-****-6789");
    }
}
