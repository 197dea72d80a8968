//! Ledger history API endpoints

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse,
    TransactionSort as ApiSort, TransactionStatus as ApiStatus, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Withdrawal => ApiKind::Withdrawal,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

fn map_kind_filter(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Deposit => engine::TransactionKind::Deposit,
        ApiKind::Withdrawal => engine::TransactionKind::Withdrawal,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
    }
}

fn map_sort(sort: ApiSort) -> engine::TransactionSort {
    match sort {
        ApiSort::DateDesc => engine::TransactionSort::DateDesc,
        ApiSort::DateAsc => engine::TransactionSort::DateAsc,
        ApiSort::AmountDesc => engine::TransactionSort::AmountDesc,
        ApiSort::AmountAsc => engine::TransactionSort::AmountAsc,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        description: tx.description,
        counterparty_account: tx.counterparty_account,
        balance_after_minor: tx.balance_after_minor,
        reference_number: tx.reference_number,
        status: map_status(tx.status),
        created_at: tx.created_at,
    }
}

pub async fn list_for_account(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(20);
    if !(1..=100).contains(&limit) {
        return Err(ServerError::Generic(
            "limit must be between 1 and 100".to_string(),
        ));
    }
    let offset = query.offset.unwrap_or(0);

    let filter = engine::TransactionListFilter {
        kind: query.kind.map(map_kind_filter),
        from: query.from,
        to: query.to,
        sort: query.sort.map(map_sort).unwrap_or_default(),
    };

    let (transactions, total_count) = state
        .engine
        .transactions_for_account(id, &filter, limit, offset)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(transaction_view).collect(),
        total_count,
        limit,
        offset,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id).await?;
    Ok(Json(transaction_view(tx)))
}
