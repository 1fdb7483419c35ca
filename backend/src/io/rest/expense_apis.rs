//! # REST API for Expenses
//!
//! Endpoints for creating, listing, updating and deleting expenses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::io::rest::{balance_apis, error_response};
use crate::io::rest::mappers::expense_mapper::ExpenseMapper;
use crate::storage::ExpenseFilter;
use crate::AppState;
use shared::{CreateExpenseRequest, UpdateExpenseRequest};

/// Query parameters for expense listing and balances
#[derive(Debug, Deserialize, Default)]
pub struct ExpenseScopeQuery {
    /// "all" (default) or "personal"
    pub scope: Option<String>,
}

impl ExpenseScopeQuery {
    pub fn to_filter(&self) -> Result<ExpenseFilter, DomainError> {
        match self.scope.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(ExpenseFilter::All),
            Some("personal") => Ok(ExpenseFilter::Personal),
            Some(other) => Err(DomainError::Validation(format!(
                "Unknown expense scope '{}'",
                other
            ))),
        }
    }
}

/// Create a router for expense related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/balances", get(balance_apis::get_balances))
        .route(
            "/:expense_id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

/// Create a new expense and compute its splits
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    let command = ExpenseMapper::to_create_command(request);
    match state.expense_service.create_expense(command).await {
        Ok(expense) => (StatusCode::CREATED, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("Failed to create expense", e),
    }
}

/// List expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseScopeQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses - query: {:?}", query);

    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(e) => return error_response("Invalid expense listing", e),
    };
    match state.expense_service.list_expenses(filter).await {
        Ok(expenses) => (StatusCode::OK, Json(ExpenseMapper::to_list_response(expenses))).into_response(),
        Err(e) => error_response("Failed to list expenses", e),
    }
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/expenses/{}", expense_id);

    match state.expense_service.get_expense(&expense_id).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("Failed to get expense", e),
    }
}

/// Partially update an expense; splits are recomputed when needed
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{} - request: {:?}", expense_id, request);

    let command = ExpenseMapper::to_update_command(expense_id, request);
    match state.expense_service.update_expense(command).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => error_response("Failed to update expense", e),
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);

    match state.expense_service.delete_expense(&expense_id).await {
        Ok(result) => (StatusCode::OK, Json(ExpenseMapper::to_delete_response(result))).into_response(),
        Err(e) => error_response("Failed to delete expense", e),
    }
}
