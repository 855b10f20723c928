use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::request_repo;
use crate::engine::wallet;
use crate::errors::AppError;
use crate::models::{RequestKind, WalletRequest};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateRequestPayload {
    pub account_id: Uuid,
    pub kind: RequestKind,
    pub amount: i64,
}

/// POST /api/wallet/requests — file a deposit/withdrawal request.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<Json<ApiResponse<WalletRequest>>, AppError> {
    let request =
        wallet::create_request(&state.db, payload.account_id, payload.kind, payload.amount)
            .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/wallet/requests — requests awaiting review.
pub async fn list_pending(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<WalletRequest>>> {
    match request_repo::get_pending_requests(&state.db).await {
        Ok(requests) => Json(ApiResponse::ok(requests)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

#[derive(Deserialize)]
pub struct ReviewPayload {
    pub reviewed_by: Uuid,
}

/// POST /api/wallet/requests/:id/approve — approve and move the money.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<ApiResponse<WalletRequest>>, AppError> {
    let request = wallet::approve_request(&state.db, id, payload.reviewed_by).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/wallet/requests/:id/reject — reject without any mutation.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<ApiResponse<WalletRequest>>, AppError> {
    let request = wallet::reject_request(&state.db, id, payload.reviewed_by).await?;
    Ok(Json(ApiResponse::ok(request)))
}
