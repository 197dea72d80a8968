//! Transfer API endpoints

use api_types::transfer::{
    TransferCreate, TransferListQuery, TransferStatus as ApiStatus, TransferType as ApiType,
    TransferView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_status(status: engine::TransferStatus) -> ApiStatus {
    match status {
        engine::TransferStatus::Pending => ApiStatus::Pending,
        engine::TransferStatus::InProgress => ApiStatus::InProgress,
        engine::TransferStatus::Completed => ApiStatus::Completed,
        engine::TransferStatus::Failed => ApiStatus::Failed,
        engine::TransferStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn map_status_filter(status: ApiStatus) -> engine::TransferStatus {
    match status {
        ApiStatus::Pending => engine::TransferStatus::Pending,
        ApiStatus::InProgress => engine::TransferStatus::InProgress,
        ApiStatus::Completed => engine::TransferStatus::Completed,
        ApiStatus::Failed => engine::TransferStatus::Failed,
        ApiStatus::Cancelled => engine::TransferStatus::Cancelled,
    }
}

fn map_type(transfer_type: engine::TransferType) -> ApiType {
    match transfer_type {
        engine::TransferType::Internal => ApiType::Internal,
        engine::TransferType::External => ApiType::External,
    }
}

pub(crate) fn transfer_view(transfer: engine::Transfer) -> TransferView {
    TransferView {
        id: transfer.id,
        from_account_id: transfer.from_account_id,
        to_account_number: transfer.to_account_number,
        to_bank_code: transfer.to_bank_code,
        amount_minor: transfer.amount_minor,
        description: transfer.description,
        status: map_status(transfer.status),
        transfer_type: map_type(transfer.transfer_type),
        reference_number: transfer.reference_number,
        created_at: transfer.created_at,
        completed_at: transfer.completed_at,
        error_message: transfer.error_message,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransferCreate>,
) -> Result<(StatusCode, Json<TransferView>), ServerError> {
    if payload.to_bank_code.is_some() {
        return Err(ServerError::Unsupported(
            "external transfers not implemented yet".to_string(),
        ));
    }

    let mut cmd = engine::InternalTransferCmd::new(
        payload.from_account_id,
        payload.to_account_number,
        payload.amount_minor,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let transfer = state.engine.create_internal_transfer(cmd).await?;

    Ok((StatusCode::CREATED, Json(transfer_view(transfer))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransferListQuery>,
) -> Result<Json<Vec<TransferView>>, ServerError> {
    let limit = query.limit.unwrap_or(50);
    if !(1..=100).contains(&limit) {
        return Err(ServerError::Generic(
            "limit must be between 1 and 100".to_string(),
        ));
    }
    let offset = query.offset.unwrap_or(0);

    let transfers = state
        .engine
        .transfers_by_account(
            query.account_id,
            query.status.map(map_status_filter),
            limit,
            offset,
        )
        .await?;

    Ok(Json(transfers.into_iter().map(transfer_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferView>, ServerError> {
    let transfer = state.engine.transfer(id).await?;
    Ok(Json(transfer_view(transfer)))
}
