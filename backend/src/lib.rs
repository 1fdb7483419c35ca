//! # Fairshare Backend
//!
//! Shared-expense tracking: split calculation, net balances and settlement
//! suggestions, served over a small JSON REST API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (split + balance calculators, services)
//!     ↓
//! Storage Layer (CSV and YAML files)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::domain::{BalanceService, ExpenseService, GroupService, SplitCalculator};
use crate::io::rest::{expense_apis, group_apis};
use crate::storage::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService<CsvConnection>,
    pub group_service: GroupService<CsvConnection>,
    pub balance_service: BalanceService<CsvConnection>,
}

impl AppState {
    pub fn new(connection: &CsvConnection, split_calculator: SplitCalculator) -> Self {
        Self {
            expense_service: ExpenseService::new(connection, split_calculator),
            group_service: GroupService::new(connection),
            balance_service: BalanceService::new(connection),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let connection = CsvConnection::new(&config.data_directory)?;
    info!("Using data directory {}", connection.base_directory().display());

    let split_calculator = SplitCalculator::with_tolerance(config.split_tolerance);
    info!("Setting up domain model (split tolerance {})", split_calculator.tolerance());

    Ok(AppState::new(&connection, split_calculator))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(cors_origin)
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/expenses", expense_apis::router())
        .nest("/groups", group_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
