use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::{account_repo, transaction_repo};
use crate::engine::wallet;
use crate::errors::AppError;
use crate::models::{Account, Transaction};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateAccountPayload {
    pub username: String,
    /// admin | subadmin | player
    pub role: Option<String>,
    pub assigned_to: Option<Uuid>,
}

/// POST /api/accounts — create an account under a parent operator.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountPayload>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".into()));
    }

    let role = payload.role.as_deref().unwrap_or("player");
    if !matches!(role, "admin" | "subadmin" | "player") {
        return Err(AppError::BadRequest(format!("unknown role: {role}")));
    }

    let account =
        account_repo::insert_account(&state.db, payload.username.trim(), role, payload.assigned_to)
            .await
            .map_err(AppError::Internal)?;

    Ok(Json(ApiResponse::ok(account)))
}

/// GET /api/accounts/:id — account detail including current balance.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let account = account_repo::get_account(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("account not found".into()))?;

    Ok(Json(ApiResponse::ok(account)))
}

/// GET /api/accounts/:id/transactions — full audit trail in order.
pub async fn transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<Vec<Transaction>>> {
    match transaction_repo::get_by_account(&state.db, id).await {
        Ok(rows) => Json(ApiResponse::ok(rows)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

#[derive(Deserialize)]
pub struct AdjustPayload {
    /// Signed minor units: positive credits, negative debits.
    pub amount: i64,
    pub performed_by: Uuid,
}

/// POST /api/accounts/:id/adjust — direct operator wallet adjustment.
pub async fn adjust(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustPayload>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let entry =
        wallet::manual_adjust(&state.db, id, payload.amount, payload.performed_by).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

#[derive(Deserialize)]
pub struct BlockPayload {
    pub blocked: bool,
}

/// POST /api/accounts/:id/block — block or unblock an account.
pub async fn block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BlockPayload>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    if !account_repo::set_blocked(&state.db, id, payload.blocked)
        .await
        .map_err(AppError::Internal)?
    {
        return Err(AppError::NotFound("account not found".into()));
    }

    let account = account_repo::get_account(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("account not found".into()))?;

    Ok(Json(ApiResponse::ok(account)))
}
