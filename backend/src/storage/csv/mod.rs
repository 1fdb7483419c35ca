//! # CSV Storage
//!
//! File-backed storage: expenses and their splits in two CSV files, groups
//! as one YAML file each.

pub mod connection;
pub mod expense_repository;
pub mod group_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
pub use group_repository::GroupRepository;
