//! Transfer execution and the transfer repository.
//!
//! The executor runs the whole debit/credit/ledger sequence inside one
//! database transaction: either every mutation commits or none does, so no
//! reversal logic exists. A failure after the PENDING row was staged is
//! recorded as a FAILED transfer in a separate follow-up transaction, since
//! the original scope is void after rollback.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, InternalTransferCmd, ResultEngine, Transaction, TransactionKind, Transfer,
    TransferStatus, accounts, reference, transactions, transfers,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Executes an internal transfer as one all-or-nothing operation.
    ///
    /// Validation is fail-fast (amount bounds, sufficient balance,
    /// self-transfer) and rejects before anything is staged. Once execution
    /// starts, any failure rolls the whole sequence back and persists the
    /// transfer as FAILED with the captured error message.
    pub async fn create_internal_transfer(&self, cmd: InternalTransferCmd) -> ResultEngine<Transfer> {
        let InternalTransferCmd {
            from_account_id,
            to_account_number,
            amount_minor,
            description,
        } = cmd;
        let description = normalize_optional_text(description.as_deref());

        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "transfer amount must be positive".to_string(),
            ));
        }
        if amount_minor > self.max_transfer_minor() {
            return Err(EngineError::InvalidAmount(
                "transfer amount exceeds maximum limit".to_string(),
            ));
        }

        if !self.sufficient_funds(from_account_id, amount_minor).await? {
            return Err(EngineError::InsufficientFunds(
                "insufficient balance".to_string(),
            ));
        }

        let source = self.account(from_account_id).await?;
        if source.account_number == to_account_number {
            return Err(EngineError::InvalidTransfer(
                "cannot transfer to the same account".to_string(),
            ));
        }

        let transfer = Transfer::internal(
            from_account_id,
            to_account_number,
            amount_minor,
            description,
            reference::generate(reference::TRANSFER_PREFIX),
            Utc::now(),
        );

        let executed = with_tx!(self, |db_tx| {
            self.execute_internal(&db_tx, &transfer).await
        });

        match executed {
            Ok(completed) => Ok(completed),
            Err(err) => {
                // The atomic scope rolled back; record the outcome on its own.
                self.record_failed_transfer(&transfer, &err).await?;
                Err(err)
            }
        }
    }

    /// Runs steps PENDING → IN_PROGRESS → debit → credit → ledger entries →
    /// COMPLETED inside `db_tx`.
    async fn execute_internal(
        &self,
        db_tx: &DatabaseTransaction,
        transfer: &Transfer,
    ) -> ResultEngine<Transfer> {
        transfers::ActiveModel::from(transfer).insert(db_tx).await?;
        set_transfer_status(db_tx, transfer.id, TransferStatus::InProgress, None).await?;

        // Debit: the sufficiency predicate is re-evaluated here, atomically
        // with the mutation.
        let source = accounts::Entity::find_by_id(transfer.from_account_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        if source.balance_minor < transfer.amount_minor {
            return Err(EngineError::InsufficientFunds(
                "insufficient balance".to_string(),
            ));
        }
        let source_balance_after = source.balance_minor - transfer.amount_minor;
        update_balance(db_tx, &source.id, source_balance_after).await?;

        // Credit. An unresolvable destination aborts the transaction, so the
        // debit above never survives it.
        let destination = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(transfer.to_account_number.clone()))
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::InvalidTransfer("destination account not found".to_string())
            })?;
        let destination_balance_after = destination.balance_minor + transfer.amount_minor;
        update_balance(db_tx, &destination.id, destination_balance_after).await?;

        // Ledger entries, one per leg. `balance_after_minor` comes from the
        // values this transaction just wrote, never from a separate read.
        let withdrawal = Transaction::new(
            transfer.from_account_id,
            TransactionKind::Withdrawal,
            transfer.amount_minor,
            Some(leg_description(
                "Transfer to",
                &transfer.to_account_number,
                transfer.description.as_deref(),
            )),
            Some(transfer.to_account_number.clone()),
            source_balance_after,
            reference::generate(reference::LEDGER_PREFIX),
            transfer.created_at,
        )?;
        transactions::ActiveModel::from(&withdrawal)
            .insert(db_tx)
            .await?;

        let destination_id = Uuid::parse_str(&destination.id)
            .map_err(|_| EngineError::KeyNotFound("account not exists".to_string()))?;
        let deposit = Transaction::new(
            destination_id,
            TransactionKind::Deposit,
            transfer.amount_minor,
            Some(leg_description(
                "Transfer from",
                &source.account_number,
                transfer.description.as_deref(),
            )),
            Some(source.account_number.clone()),
            destination_balance_after,
            reference::generate(reference::LEDGER_PREFIX),
            transfer.created_at,
        )?;
        transactions::ActiveModel::from(&deposit).insert(db_tx).await?;

        let completed_at = Utc::now();
        set_transfer_status(
            db_tx,
            transfer.id,
            TransferStatus::Completed,
            Some(completed_at),
        )
        .await?;

        let mut completed = transfer.clone();
        completed.status = TransferStatus::Completed;
        completed.completed_at = Some(completed_at);
        Ok(completed)
    }

    /// Best-effort FAILED write after the execution scope rolled back.
    ///
    /// Returns the secondary database error if even this write fails; the
    /// caller then surfaces the original failure with no record persisted.
    async fn record_failed_transfer(
        &self,
        transfer: &Transfer,
        cause: &EngineError,
    ) -> ResultEngine<()> {
        let mut failed = transfer.clone();
        failed.status = TransferStatus::Failed;
        failed.completed_at = Some(Utc::now());
        failed.error_message = Some(cause.to_string());

        if let Err(write_err) = transfers::ActiveModel::from(&failed)
            .insert(self.database())
            .await
        {
            tracing::error!("failed to record FAILED transfer {}: {write_err}", failed.id);
            return Err(write_err.into());
        }
        Ok(())
    }

    /// Return a [`Transfer`] by its identifier.
    pub async fn transfer(&self, transfer_id: Uuid) -> ResultEngine<Transfer> {
        let model = transfers::Entity::find_by_id(transfer_id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transfer not exists".to_string()))?;
        Transfer::try_from(model)
    }

    /// Lists transfers originating from an account, newest first.
    pub async fn transfers_by_account(
        &self,
        account_id: Uuid,
        status: Option<TransferStatus>,
        limit: u64,
        offset: u64,
    ) -> ResultEngine<Vec<Transfer>> {
        let mut query = transfers::Entity::find()
            .filter(transfers::Column::FromAccountId.eq(account_id.to_string()))
            .order_by_desc(transfers::Column::CreatedAt)
            .limit(limit)
            .offset(offset);
        if let Some(status) = status {
            query = query.filter(transfers::Column::Status.eq(status.as_str()));
        }

        let models = query.all(self.database()).await?;
        models.into_iter().map(Transfer::try_from).collect()
    }

    /// Updates a transfer's status, stamping `completed_at` on the first
    /// transition into a terminal status.
    ///
    /// Calling this twice with the same terminal status is a no-op the
    /// second time; transitioning away from a terminal status is rejected.
    pub async fn update_transfer_status(
        &self,
        transfer_id: Uuid,
        status: TransferStatus,
        error_message: Option<&str>,
    ) -> ResultEngine<Transfer> {
        let error_message = normalize_optional_text(error_message);

        with_tx!(self, |db_tx| {
            let model = transfers::Entity::find_by_id(transfer_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transfer not exists".to_string()))?;
            let current = TransferStatus::try_from(model.status.as_str())?;

            if current == status && current.is_terminal() {
                Transfer::try_from(model)
            } else if current.is_terminal() {
                Err(EngineError::InvalidTransfer(format!(
                    "transfer already {}",
                    current.as_str()
                )))
            } else {
                let active = transfers::ActiveModel {
                    id: ActiveValue::Set(transfer_id.to_string()),
                    status: ActiveValue::Set(status.as_str().to_string()),
                    completed_at: if status.is_terminal() {
                        ActiveValue::Set(Some(Utc::now()))
                    } else {
                        ActiveValue::NotSet
                    },
                    error_message: error_message
                        .map(|msg| ActiveValue::Set(Some(msg)))
                        .unwrap_or(ActiveValue::NotSet),
                    ..Default::default()
                };
                let updated = active.update(&db_tx).await?;
                Transfer::try_from(updated)
            }
        })
    }
}

async fn set_transfer_status(
    db_tx: &DatabaseTransaction,
    transfer_id: Uuid,
    status: TransferStatus,
    completed_at: Option<DateTime<Utc>>,
) -> ResultEngine<()> {
    let active = transfers::ActiveModel {
        id: ActiveValue::Set(transfer_id.to_string()),
        status: ActiveValue::Set(status.as_str().to_string()),
        completed_at: completed_at
            .map(|at| ActiveValue::Set(Some(at)))
            .unwrap_or(ActiveValue::NotSet),
        ..Default::default()
    };
    active.update(db_tx).await?;
    Ok(())
}

async fn update_balance(
    db_tx: &DatabaseTransaction,
    account_id: &str,
    new_balance_minor: i64,
) -> ResultEngine<()> {
    let active = accounts::ActiveModel {
        id: ActiveValue::Set(account_id.to_string()),
        balance_minor: ActiveValue::Set(new_balance_minor),
        updated_at: ActiveValue::Set(Some(Utc::now())),
        ..Default::default()
    };
    active.update(db_tx).await?;
    Ok(())
}

fn leg_description(direction: &str, counterparty: &str, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{direction} {counterparty}: {note}"),
        None => format!("{direction} {counterparty}"),
    }
}
