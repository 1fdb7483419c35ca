//! # Domain Module
//!
//! Contains the business logic for tracking shared expenses.
//!
//! ## Module Organization
//!
//! - **split_calculator**: Turns a split type and raw shares into per-member amounts
//! - **balance_calculator**: Nets expenses into member balances and suggests settlements
//! - **expense_service**: Expense lifecycle on top of storage
//! - **group_service**: Group rosters and creator-only deletion
//! - **balance_service**: Balance sheets over a filtered set of expenses
//!
//! ## Business Rules
//!
//! - Split shares must add up to the expense amount (or 100 for percentages)
//! - Only members eligible for an expense may hold a share of it
//! - Balances are always derived from stored expenses, never stored themselves

pub mod balance_calculator;
pub mod balance_service;
pub mod commands;
pub mod error;
pub mod expense_service;
pub mod group_service;
pub mod models;
pub mod split_calculator;

pub use balance_service::BalanceService;
pub use error::{DomainError, DomainResult, SplitError};
pub use expense_service::ExpenseService;
pub use group_service::GroupService;
pub use split_calculator::SplitCalculator;
