use std::time::Duration;

use sea_orm::Database;

use engine::{
    Account, AccountType, Engine, EngineError, InternalTransferCmd, TransactionKind,
    TransactionListFilter, TransferStatus, TransferType,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn seeded_accounts(engine: &Engine) -> (Account, Account) {
    let source = engine
        .new_account(
            "110-123-456789",
            "Alice Checking",
            AccountType::Checking,
            100_000,
        )
        .await
        .unwrap();
    let destination = engine
        .new_account(
            "110-987-654321",
            "Bob Savings",
            AccountType::Savings,
            20_000,
        )
        .await
        .unwrap();
    (source, destination)
}

async fn ledger_for(engine: &Engine, account: &Account) -> Vec<engine::Transaction> {
    let (rows, _) = engine
        .transactions_for_account(account.id, &TransactionListFilter::default(), 50, 0)
        .await
        .unwrap();
    rows
}

#[tokio::test]
async fn completed_transfer_moves_funds_and_writes_both_legs() {
    let engine = engine_with_db().await;
    let (source, destination) = seeded_accounts(&engine).await;

    let transfer = engine
        .create_internal_transfer(
            InternalTransferCmd::new(source.id, destination.account_number.clone(), 50_000)
                .description("rent"),
        )
        .await
        .unwrap();

    assert_eq!(transfer.status, TransferStatus::Completed);
    assert_eq!(transfer.transfer_type, TransferType::Internal);
    assert!(transfer.completed_at.is_some());
    assert!(transfer.error_message.is_none());
    assert!(transfer.reference_number.starts_with("TXF"));

    let source = engine.account(source.id).await.unwrap();
    let destination = engine.account(destination.id).await.unwrap();
    assert_eq!(source.balance_minor, 50_000);
    assert_eq!(destination.balance_minor, 70_000);
    assert!(source.updated_at.is_some());

    let source_entries = ledger_for(&engine, &source).await;
    assert_eq!(source_entries.len(), 1);
    let withdrawal = &source_entries[0];
    assert_eq!(withdrawal.kind, TransactionKind::Withdrawal);
    assert_eq!(withdrawal.amount_minor, 50_000);
    assert_eq!(withdrawal.balance_after_minor, 50_000);
    assert_eq!(
        withdrawal.counterparty_account.as_deref(),
        Some(destination.account_number.as_str())
    );
    assert!(withdrawal.reference_number.starts_with("TXN"));
    assert_ne!(withdrawal.reference_number, transfer.reference_number);

    let destination_entries = ledger_for(&engine, &destination).await;
    assert_eq!(destination_entries.len(), 1);
    let deposit = &destination_entries[0];
    assert_eq!(deposit.kind, TransactionKind::Deposit);
    assert_eq!(deposit.amount_minor, 50_000);
    assert_eq!(deposit.balance_after_minor, 70_000);
    assert_eq!(
        deposit.counterparty_account.as_deref(),
        Some(source.account_number.as_str())
    );
    assert_ne!(deposit.reference_number, withdrawal.reference_number);
}

#[tokio::test]
async fn insufficient_balance_rejects_without_any_record() {
    let engine = engine_with_db().await;
    let (source, destination) = seeded_accounts(&engine).await;

    let err = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            destination.account_number.clone(),
            150_000,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds("insufficient balance".to_string())
    );

    let source = engine.account(source.id).await.unwrap();
    let destination = engine.account(destination.id).await.unwrap();
    assert_eq!(source.balance_minor, 100_000);
    assert_eq!(destination.balance_minor, 20_000);

    let transfers = engine
        .transfers_by_account(source.id, None, 50, 0)
        .await
        .unwrap();
    assert!(transfers.is_empty());
    assert!(ledger_for(&engine, &source).await.is_empty());
}

#[tokio::test]
async fn self_transfer_rejected_before_any_mutation() {
    let engine = engine_with_db().await;
    let (source, _) = seeded_accounts(&engine).await;

    let err = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            source.account_number.clone(),
            10_000,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransfer("cannot transfer to the same account".to_string())
    );

    let source = engine.account(source.id).await.unwrap();
    assert_eq!(source.balance_minor, 100_000);
    assert!(
        engine
            .transfers_by_account(source.id, None, 50, 0)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn missing_destination_leaves_failed_record_and_intact_balance() {
    let engine = engine_with_db().await;
    let (source, _) = seeded_accounts(&engine).await;

    let err = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            "999-000-000000".to_string(),
            10_000,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransfer("destination account not found".to_string())
    );

    // The debit rolled back with the aborted transaction.
    let source = engine.account(source.id).await.unwrap();
    assert_eq!(source.balance_minor, 100_000);
    assert!(ledger_for(&engine, &source).await.is_empty());

    // The outcome itself is recorded.
    let transfers = engine
        .transfers_by_account(source.id, None, 50, 0)
        .await
        .unwrap();
    assert_eq!(transfers.len(), 1);
    let failed = &transfers[0];
    assert_eq!(failed.status, TransferStatus::Failed);
    assert!(failed.completed_at.is_some());
    let message = failed.error_message.as_deref().unwrap();
    assert!(message.contains("destination account not found"));
}

#[tokio::test]
async fn amount_bounds_are_enforced() {
    let engine = engine_with_db().await;
    let source = engine
        .new_account(
            "110-111-111111",
            "Corporate",
            AccountType::Checking,
            250_000_000,
        )
        .await
        .unwrap();
    let destination = engine
        .new_account("110-222-222222", "Payroll", AccountType::Checking, 0)
        .await
        .unwrap();

    for amount in [0, -5_000] {
        let err = engine
            .create_internal_transfer(InternalTransferCmd::new(
                source.id,
                destination.account_number.clone(),
                amount,
            ))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("transfer amount must be positive".to_string())
        );
    }

    let err = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            destination.account_number.clone(),
            engine::DEFAULT_MAX_TRANSFER_MINOR + 1,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("transfer amount exceeds maximum limit".to_string())
    );

    // Exactly at the ceiling is accepted.
    let transfer = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            destination.account_number.clone(),
            engine::DEFAULT_MAX_TRANSFER_MINOR,
        ))
        .await
        .unwrap();
    assert_eq!(transfer.status, TransferStatus::Completed);

    let destination = engine.account(destination.id).await.unwrap();
    assert_eq!(destination.balance_minor, engine::DEFAULT_MAX_TRANSFER_MINOR);
}

#[tokio::test]
async fn configured_ceiling_overrides_default() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .max_transfer_minor(1_000)
        .build();

    let source = engine
        .new_account("110-333-333333", "Capped", AccountType::Checking, 100_000)
        .await
        .unwrap();
    let destination = engine
        .new_account("110-444-444444", "Other", AccountType::Checking, 0)
        .await
        .unwrap();

    let err = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            destination.account_number.clone(),
            1_001,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("transfer amount exceeds maximum limit".to_string())
    );
}

#[tokio::test]
async fn terminal_status_update_is_idempotent() {
    let engine = engine_with_db().await;
    let (source, _) = seeded_accounts(&engine).await;

    engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            "999-000-000000".to_string(),
            10_000,
        ))
        .await
        .unwrap_err();
    let failed = engine
        .transfers_by_account(source.id, None, 1, 0)
        .await
        .unwrap()
        .remove(0);
    let first_completed_at = failed.completed_at.unwrap();

    let unchanged = engine
        .update_transfer_status(failed.id, TransferStatus::Failed, None)
        .await
        .unwrap();
    assert_eq!(unchanged.completed_at, Some(first_completed_at));
    assert_eq!(unchanged.error_message, failed.error_message);

    let err = engine
        .update_transfer_status(failed.id, TransferStatus::Cancelled, None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransfer("transfer already FAILED".to_string())
    );
}

#[tokio::test]
async fn listing_orders_newest_first_and_filters_by_status() {
    let engine = engine_with_db().await;
    let (source, destination) = seeded_accounts(&engine).await;

    let mut reference_numbers = Vec::new();
    for amount in [1_000, 2_000, 3_000] {
        let transfer = engine
            .create_internal_transfer(InternalTransferCmd::new(
                source.id,
                destination.account_number.clone(),
                amount,
            ))
            .await
            .unwrap();
        reference_numbers.push(transfer.reference_number);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    // One failed transfer on top.
    engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            "999-000-000000".to_string(),
            500,
        ))
        .await
        .unwrap_err();

    let all = engine
        .transfers_by_account(source.id, None, 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].status, TransferStatus::Failed);
    assert_eq!(all[1].reference_number, reference_numbers[2]);
    assert_eq!(all[2].reference_number, reference_numbers[1]);
    assert_eq!(all[3].reference_number, reference_numbers[0]);

    let completed = engine
        .transfers_by_account(source.id, Some(TransferStatus::Completed), 50, 0)
        .await
        .unwrap();
    assert_eq!(completed.len(), 3);
    assert!(
        completed
            .iter()
            .all(|t| t.status == TransferStatus::Completed)
    );

    let page = engine
        .transfers_by_account(source.id, Some(TransferStatus::Completed), 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].reference_number, reference_numbers[1]);

    // Listing is scoped to the source account.
    let destination_view = engine
        .transfers_by_account(destination.id, None, 50, 0)
        .await
        .unwrap();
    assert!(destination_view.is_empty());
}

#[tokio::test]
async fn transfer_lookup_by_id() {
    let engine = engine_with_db().await;
    let (source, destination) = seeded_accounts(&engine).await;

    let created = engine
        .create_internal_transfer(InternalTransferCmd::new(
            source.id,
            destination.account_number.clone(),
            7_500,
        ))
        .await
        .unwrap();

    let fetched = engine.transfer(created.id).await.unwrap();
    assert_eq!(fetched.reference_number, created.reference_number);
    assert_eq!(fetched.status, TransferStatus::Completed);

    let err = engine.transfer(uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transfer not exists".to_string())
    );
}

#[tokio::test]
async fn ledger_history_filters_and_sorts() {
    let engine = engine_with_db().await;
    let (source, destination) = seeded_accounts(&engine).await;

    for amount in [5_000, 1_000, 3_000] {
        engine
            .create_internal_transfer(InternalTransferCmd::new(
                source.id,
                destination.account_number.clone(),
                amount,
            ))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Kind filter: the source only carries withdrawals.
    let filter = TransactionListFilter {
        kind: Some(TransactionKind::Deposit),
        ..Default::default()
    };
    let (rows, total) = engine
        .transactions_for_account(source.id, &filter, 50, 0)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);

    let filter = TransactionListFilter {
        kind: Some(TransactionKind::Withdrawal),
        ..Default::default()
    };
    let (rows, total) = engine
        .transactions_for_account(source.id, &filter, 2, 0)
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 2);

    // Amount sort surfaces the largest withdrawal first.
    let filter = TransactionListFilter {
        sort: engine::TransactionSort::AmountDesc,
        ..Default::default()
    };
    let (rows, _) = engine
        .transactions_for_account(source.id, &filter, 50, 0)
        .await
        .unwrap();
    assert_eq!(rows[0].amount_minor, 5_000);
    assert_eq!(rows[2].amount_minor, 1_000);

    // Single-entry lookup round-trips.
    let entry = engine.transaction(rows[0].id).await.unwrap();
    assert_eq!(entry.reference_number, rows[0].reference_number);

    let err = engine.transaction(uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("transaction not exists".to_string())
    );

    let err = engine
        .transactions_for_account(uuid::Uuid::new_v4(), &TransactionListFilter::default(), 50, 0)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("account not exists".to_string())
    );
}
