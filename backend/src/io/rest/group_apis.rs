//! # REST API for Groups
//!
//! Endpoints for creating, listing and deleting groups, plus the group's
//! expenses and balances.

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
use crate::io::rest::mappers::expense_mapper::ExpenseMapper;
use crate::io::rest::mappers::group_mapper::GroupMapper;
use crate::io::rest::{balance_apis, error_response};
use crate::storage::ExpenseFilter;
use crate::AppState;
use shared::CreateGroupRequest;

#[derive(Debug, Deserialize)]
pub struct GroupListQuery {
    pub member: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteGroupQuery {
    pub requested_by: Option<String>,
}

/// Create a router for group related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/:group_id", get(get_group).delete(delete_group))
        .route("/:group_id/expenses", get(list_group_expenses))
        .route("/:group_id/balances", get(balance_apis::get_group_balances))
}

fn required_param(value: Option<String>, name: &str) -> Result<String, DomainError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::Validation(format!("Query parameter '{}' is required", name)))
}

pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    info!("POST /api/groups - request: {:?}", request);

    let command = GroupMapper::to_create_command(request);
    match state.group_service.create_group(command).await {
        Ok(group) => (StatusCode::CREATED, Json(GroupMapper::to_dto(group))).into_response(),
        Err(e) => error_response("Failed to create group", e),
    }
}

/// Groups a member belongs to, split into created-by-me and the rest
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<GroupListQuery>,
) -> impl IntoResponse {
    info!("GET /api/groups - query: {:?}", query);

    let member = match required_param(query.member, "member") {
        Ok(member) => member,
        Err(e) => return error_response("Invalid group listing", e),
    };
    match state.group_service.list_groups(&member).await {
        Ok(result) => (StatusCode::OK, Json(GroupMapper::to_list_response(result))).into_response(),
        Err(e) => error_response("Failed to list groups", e),
    }
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}", group_id);

    match state.group_service.get_group(&group_id).await {
        Ok(group) => (StatusCode::OK, Json(GroupMapper::to_dto(group))).into_response(),
        Err(e) => error_response("Failed to get group", e),
    }
}

/// Delete a group; only its creator may do so
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<DeleteGroupQuery>,
) -> impl IntoResponse {
    info!("DELETE /api/groups/{} - query: {:?}", group_id, query);

    let requested_by = match required_param(query.requested_by, "requested_by") {
        Ok(requested_by) => requested_by,
        Err(e) => return error_response("Invalid group deletion", e),
    };
    let command = GroupMapper::to_delete_command(group_id, requested_by);
    match state.group_service.delete_group(command).await {
        Ok(result) => (StatusCode::OK, Json(GroupMapper::to_delete_response(result))).into_response(),
        Err(e) => error_response("Failed to delete group", e),
    }
}

pub async fn list_group_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/expenses", group_id);

    match state
        .expense_service
        .list_expenses(ExpenseFilter::Group(group_id))
        .await
    {
        Ok(expenses) => (StatusCode::OK, Json(ExpenseMapper::to_list_response(expenses))).into_response(),
        Err(e) => error_response("Failed to list group expenses", e),
    }
}
