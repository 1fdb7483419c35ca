//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::expense::Expense;
use crate::domain::models::group::Group;

/// Which expenses a listing should return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseFilter {
    All,
    /// Only expenses with a declared participant list
    Personal,
    /// Only expenses belonging to one group
    Group(String),
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            ExpenseFilter::All => true,
            ExpenseFilter::Personal => expense.group_id().is_none(),
            ExpenseFilter::Group(group_id) => expense.group_id() == Some(group_id.as_str()),
        }
    }
}

/// Trait defining the interface for expense storage operations
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense together with its split details
    async fn store_expense(&self, expense: &Expense) -> Result<()>;

    /// Retrieve a specific expense by ID
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    /// List expenses matching the filter, most recent first
    async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    /// Replace an existing expense, including its split details.
    /// Returns false if no expense with that ID exists.
    ///
    /// Last writer wins: callers that read, modify and write back get no
    /// protection against a concurrent update of the same expense.
    async fn update_expense(&self, expense: &Expense) -> Result<bool>;

    /// Delete a single expense and its split details.
    /// Returns true if the expense was found and deleted, false otherwise.
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}

/// Trait defining the interface for group storage operations
#[async_trait]
pub trait GroupStorage: Send + Sync {
    async fn store_group(&self, group: &Group) -> Result<()>;

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>>;

    /// All groups the member belongs to, ordered by name
    async fn list_groups_for_member(&self, member_id: &str) -> Result<Vec<Group>>;

    /// Returns true if the group was found and deleted
    async fn delete_group(&self, group_id: &str) -> Result<bool>;

    /// Group roster, or None if the group does not exist
    async fn list_members(&self, group_id: &str) -> Result<Option<Vec<String>>> {
        Ok(self.get_group(group_id).await?.map(|g| g.members))
    }
}

/// Trait defining the interface for storage connections
///
/// Abstracts away the specific connection type and provides factory methods
/// for creating repositories, so the domain layer never names a backend.
pub trait Connection: Send + Sync + Clone {
    type ExpenseRepository: ExpenseStorage + Clone;
    type GroupRepository: GroupStorage + Clone;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;

    fn create_group_repository(&self) -> Self::GroupRepository;
}
