//! # REST API for Balances
//!
//! Read-only endpoints returning net balances and suggested settlements.
//! Routed from the expense and group routers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use crate::io::rest::error_response;
use crate::io::rest::expense_apis::ExpenseScopeQuery;
use crate::io::rest::mappers::balance_mapper::BalanceMapper;
use crate::storage::ExpenseFilter;
use crate::AppState;

/// Balances across all expenses, or personal expenses only
pub async fn get_balances(
    State(state): State<AppState>,
    Query(query): Query<ExpenseScopeQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses/balances - query: {:?}", query);

    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(e) => return error_response("Invalid balance request", e),
    };
    match state.balance_service.get_balances(filter).await {
        Ok(sheet) => (StatusCode::OK, Json(BalanceMapper::to_response(sheet))).into_response(),
        Err(e) => error_response("Failed to compute balances", e),
    }
}

pub async fn get_group_balances(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/balances", group_id);

    match state
        .balance_service
        .get_balances(ExpenseFilter::Group(group_id))
        .await
    {
        Ok(sheet) => (StatusCode::OK, Json(BalanceMapper::to_response(sheet))).into_response(),
        Err(e) => error_response("Failed to compute group balances", e),
    }
}
