//! # REST API Interface Layer
//!
//! HTTP endpoints for expenses, groups and balances. Handlers translate
//! DTOs from the `shared` crate into domain commands and map domain errors
//! onto status codes; no business rules live here.

pub mod balance_apis;
pub mod expense_apis;
pub mod group_apis;
pub mod mappers;
#[cfg(test)]
mod test_client;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::ErrorResponse;

use crate::domain::error::DomainError;

/// Status code for a domain failure
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) | DomainError::Split(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Logs the failure and renders it as a JSON `{ "message": ... }` body.
/// Storage details stay in the log.
pub fn error_response(context: &str, error: DomainError) -> Response {
    let status = status_for(&error);
    let message = if error.is_client_error() {
        warn!("{}: {}", context, error);
        error.to_string()
    } else {
        error!("{}: {:?}", context, error);
        "Internal server error".to_string()
    };
    (status, Json(ErrorResponse { message })).into_response()
}
