//! Transfer primitives.
//!
//! A `Transfer` records the intent and outcome of one fund movement. The
//! executor in `ops::transfers` owns its status transitions; once a terminal
//! status is reached no further transition is permitted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// COMPLETED, FAILED and CANCELLED permit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl TryFrom<&str> for TransferStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidTransfer(format!(
                "invalid transfer status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferType {
    Internal,
    External,
}

impl TransferType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
        }
    }
}

impl TryFrom<&str> for TransferType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "INTERNAL" => Ok(Self::Internal),
            "EXTERNAL" => Ok(Self::External),
            other => Err(EngineError::InvalidTransfer(format!(
                "invalid transfer type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub id: Uuid,
    pub from_account_id: Uuid,
    /// Destination account number as given by the caller; resolved against
    /// the accounts table at execution time.
    pub to_account_number: String,
    /// `None` for internal transfers.
    pub to_bank_code: Option<String>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub status: TransferStatus,
    pub transfer_type: TransferType,
    pub reference_number: String,
    pub created_at: DateTime<Utc>,
    /// Set iff `status` is terminal.
    pub completed_at: Option<DateTime<Utc>>,
    /// Set iff `status` is FAILED.
    pub error_message: Option<String>,
}

impl Transfer {
    /// Creates a PENDING internal transfer with a fresh identity.
    pub fn internal(
        from_account_id: Uuid,
        to_account_number: String,
        amount_minor: i64,
        description: Option<String>,
        reference_number: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_account_id,
            to_account_number,
            to_bank_code: None,
            amount_minor,
            description,
            status: TransferStatus::Pending,
            transfer_type: TransferType::Internal,
            reference_number,
            created_at,
            completed_at: None,
            error_message: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_account_id: String,
    pub to_account_number: String,
    pub to_bank_code: Option<String>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub status: String,
    pub transfer_type: String,
    pub reference_number: String,
    pub created_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::FromAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transfer> for ActiveModel {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: ActiveValue::Set(transfer.id.to_string()),
            from_account_id: ActiveValue::Set(transfer.from_account_id.to_string()),
            to_account_number: ActiveValue::Set(transfer.to_account_number.clone()),
            to_bank_code: ActiveValue::Set(transfer.to_bank_code.clone()),
            amount_minor: ActiveValue::Set(transfer.amount_minor),
            description: ActiveValue::Set(transfer.description.clone()),
            status: ActiveValue::Set(transfer.status.as_str().to_string()),
            transfer_type: ActiveValue::Set(transfer.transfer_type.as_str().to_string()),
            reference_number: ActiveValue::Set(transfer.reference_number.clone()),
            created_at: ActiveValue::Set(transfer.created_at),
            completed_at: ActiveValue::Set(transfer.completed_at),
            error_message: ActiveValue::Set(transfer.error_message.clone()),
        }
    }
}

impl TryFrom<Model> for Transfer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transfer not exists".to_string()))?,
            from_account_id: Uuid::parse_str(&model.from_account_id)
                .map_err(|_| EngineError::KeyNotFound("account not exists".to_string()))?,
            to_account_number: model.to_account_number,
            to_bank_code: model.to_bank_code,
            amount_minor: model.amount_minor,
            description: model.description,
            status: TransferStatus::try_from(model.status.as_str())?,
            transfer_type: TransferType::try_from(model.transfer_type.as_str())?,
            reference_number: model.reference_number,
            created_at: model.created_at,
            completed_at: model.completed_at,
            error_message: model.error_message,
        })
    }
}
