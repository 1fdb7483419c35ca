//! # Storage Module
//!
//! Handles all data persistence for the expense tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the CSV backend in
//! [`csv`] is the one shipped implementation. Storage hands the domain a
//! point-in-time snapshot of expenses and resolves group rosters. It makes no
//! isolation promise against concurrent writers beyond serializing its own
//! file rewrites.

pub mod csv;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::{Connection, ExpenseFilter, ExpenseStorage, GroupStorage};
