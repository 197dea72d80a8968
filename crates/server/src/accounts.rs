//! Account API endpoints

use api_types::account::{
    AccountDetailResponse, AccountListResponse, AccountSummaryView, AccountType as ApiType,
    AccountView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn map_type(account_type: engine::AccountType) -> ApiType {
    match account_type {
        engine::AccountType::Checking => ApiType::Checking,
        engine::AccountType::Savings => ApiType::Savings,
    }
}

pub(crate) fn account_view(account: &engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        account_number: account.account_number.clone(),
        account_name: account.account_name.clone(),
        account_type: map_type(account.account_type),
        balance_minor: account.balance_minor,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AccountListQuery>,
) -> Result<Json<AccountListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(10);
    if !(1..=50).contains(&limit) {
        return Err(ServerError::Generic(
            "limit must be between 1 and 50".to_string(),
        ));
    }
    let offset = query.offset.unwrap_or(0);

    let accounts = state.engine.accounts(limit, offset).await?;

    Ok(Json(AccountListResponse {
        accounts: accounts.iter().map(account_view).collect(),
    }))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountDetailResponse>, ServerError> {
    let account = state.engine.account(id).await?;
    let summary = state.engine.account_summary(id).await?;

    Ok(Json(AccountDetailResponse {
        masked_account_number: account.masked_number(),
        account: account_view(&account),
        summary: AccountSummaryView {
            total_deposits_minor: summary.total_deposits_minor,
            total_withdrawals_minor: summary.total_withdrawals_minor,
            transaction_count: summary.transaction_count,
            window_days: summary.window_days,
        },
    }))
}
