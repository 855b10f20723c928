use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InsufficientFunds => {
                (StatusCode::PAYMENT_REQUIRED, "Insufficient funds".into())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<crate::ledger::LedgerError> for AppError {
    fn from(e: crate::ledger::LedgerError) -> Self {
        use crate::ledger::LedgerError;
        match e {
            LedgerError::AccountNotFound(_) => AppError::NotFound(e.to_string()),
            LedgerError::InsufficientFunds { .. } => AppError::InsufficientFunds,
            LedgerError::NonPositiveAmount(_) => AppError::BadRequest(e.to_string()),
            LedgerError::Db(err) => AppError::Internal(err.into()),
        }
    }
}

impl From<crate::engine::EngineError> for AppError {
    fn from(e: crate::engine::EngineError) -> Self {
        use crate::engine::EngineError;
        match e {
            EngineError::AccountNotFound
            | EngineError::EventNotFound
            | EngineError::RequestNotFound => AppError::NotFound(e.to_string()),

            EngineError::NonPositiveStake
            | EngineError::NonPositiveAmount
            | EngineError::MalformedResult(_)
            | EngineError::MissingFamily
            | EngineError::UnknownFamily(_)
            | EngineError::InvalidOdds
            | EngineError::Prediction(_) => AppError::BadRequest(e.to_string()),

            EngineError::AccountBlocked
            | EngineError::EventNotOpen
            | EngineError::EventStarted
            | EngineError::ResultAlreadyDeclared
            | EngineError::OpenResultMissing
            | EngineError::OpenResultNotSupported
            | EngineError::ScheduleLocked
            | EngineError::RequestNotPending
            | EngineError::ConcurrentUpdate
            | EngineError::Lifecycle(_) => AppError::InvalidState(e.to_string()),

            EngineError::Ledger(err) => err.into(),

            EngineError::Recurrence(_) | EngineError::CorruptRow(_) => {
                AppError::Internal(anyhow::anyhow!(e.to_string()))
            }
            EngineError::Db(err) => AppError::Internal(err.into()),
            EngineError::Internal(err) => AppError::Internal(err),
        }
    }
}
