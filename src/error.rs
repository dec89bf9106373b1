use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::{FixtureKind, SaleStatus};

pub type Result<T> = std::result::Result<T, ContractError>;

/// Failures of the contract lifecycle.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Sale not found")]
    SaleNotFound,

    #[error("Seller not found")]
    SellerNotFound,

    /// The slab is unknown, belongs to another company, or is already sold.
    #[error("Slab {0} is not available")]
    SlabUnavailable(i64),

    #[error("No sink of type {0} is available")]
    SinkUnavailable(i64),

    #[error("No faucet of type {0} is available")]
    FaucetUnavailable(i64),

    #[error("Sale {0} is cancelled")]
    SaleCancelled(i64),

    #[error("Cannot move sale from {from} to {to}")]
    InvalidTransition { from: SaleStatus, to: SaleStatus },

    #[error("Invalid contract: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ContractError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn fixture_unavailable(kind: FixtureKind, type_id: i64) -> Self {
        match kind {
            FixtureKind::Sink => Self::SinkUnavailable(type_id),
            FixtureKind::Faucet => Self::FaucetUnavailable(type_id),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CustomerNotFound | Self::SaleNotFound | Self::SellerNotFound => StatusCode::NOT_FOUND,
            Self::SlabUnavailable(_)
            | Self::SinkUnavailable(_)
            | Self::FaucetUnavailable(_)
            | Self::SaleCancelled(_)
            | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Contract(err) => err.status_code(),
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Database and template details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            log::warn!("Request rejected: {}", self);
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
