//! # CSV Expense Repository
//!
//! Expenses live in `expenses.csv`, one row per expense. A row carries the
//! whole record: split details and personal-scope participants are JSON
//! arrays in their own columns, so one atomic file replace updates an
//! expense and its shares together.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use super::connection::{CsvConnection, EXPENSES_HEADER};
use crate::domain::models::expense::{Expense, ExpenseScope, SplitDetail, SplitType};
use crate::storage::traits::{ExpenseFilter, ExpenseStorage};

const SCOPE_PERSONAL: &str = "personal";
const SCOPE_GROUP: &str = "group";

#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRow {
    id: String,
    description: String,
    amount: f64,
    paid_by: String,
    scope_kind: String,
    group_id: String,
    participants: String,
    category: String,
    split_type: String,
    split_details: String,
    date: String,
}

/// One element of the `split_details` JSON column
#[derive(Debug, Serialize, Deserialize)]
struct StoredSplit {
    member_id: String,
    amount: f64,
}

/// CSV-based expense repository
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every stored expense. Callers hold either connection lock.
    fn read_expenses(&self) -> Result<Vec<Expense>> {
        self.connection.ensure_files_exist()?;

        let mut reader = ReaderBuilder::new()
            .from_path(self.connection.expenses_file_path())
            .context("Failed to open expenses file")?;
        let mut expenses = Vec::new();
        for result in reader.deserialize::<ExpenseRow>() {
            let row = result.context("Malformed row in expenses file")?;
            expenses.push(Self::from_row(row)?);
        }
        Ok(expenses)
    }

    /// Rewrite the expenses file. Callers must hold the connection write lock.
    fn write_expenses(&self, expenses: &[Expense]) -> Result<()> {
        let rows = expenses
            .iter()
            .map(Self::to_row)
            .collect::<Result<Vec<ExpenseRow>>>()?;

        let path = self.connection.expenses_file_path();
        let temp_path = path.with_extension("tmp");
        Self::write_rows(&temp_path, &rows)?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn write_rows(path: &Path, rows: &[ExpenseRow]) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writer.write_record(EXPENSES_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn to_row(expense: &Expense) -> Result<ExpenseRow> {
        let (scope_kind, group_id, participants) = match &expense.scope {
            ExpenseScope::Personal { participants } => (
                SCOPE_PERSONAL,
                String::new(),
                serde_json::to_string(participants)?,
            ),
            ExpenseScope::Group { group_id } => (SCOPE_GROUP, group_id.clone(), String::new()),
        };
        let splits: Vec<StoredSplit> = expense
            .split_details
            .iter()
            .map(|split| StoredSplit {
                member_id: split.member_id.clone(),
                amount: split.amount,
            })
            .collect();

        Ok(ExpenseRow {
            id: expense.id.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            paid_by: expense.paid_by.clone(),
            scope_kind: scope_kind.to_string(),
            group_id,
            participants,
            category: expense.category.clone(),
            split_type: expense.split_type.to_string(),
            split_details: serde_json::to_string(&splits)?,
            date: expense.date.clone(),
        })
    }

    fn from_row(row: ExpenseRow) -> Result<Expense> {
        let scope = match row.scope_kind.as_str() {
            SCOPE_PERSONAL => ExpenseScope::Personal {
                participants: serde_json::from_str(&row.participants)
                    .with_context(|| format!("Bad participant list for expense {}", row.id))?,
            },
            SCOPE_GROUP => ExpenseScope::Group {
                group_id: row.group_id,
            },
            other => return Err(anyhow!("Unknown scope '{}' for expense {}", other, row.id)),
        };
        let split_type = row
            .split_type
            .parse::<SplitType>()
            .with_context(|| format!("Bad split type '{}' for expense {}", row.split_type, row.id))?;
        let splits: Vec<StoredSplit> = serde_json::from_str(&row.split_details)
            .with_context(|| format!("Bad split details for expense {}", row.id))?;

        Ok(Expense {
            id: row.id,
            description: row.description,
            amount: row.amount,
            paid_by: row.paid_by,
            scope,
            category: row.category,
            split_type,
            split_details: splits
                .into_iter()
                .map(|split| SplitDetail::new(split.member_id, split.amount))
                .collect(),
            date: row.date,
        })
    }

    /// Orders by instant, so timestamps with different offsets compare correctly.
    /// Unparseable dates sort last, by their text.
    fn newest_first(a: &Expense, b: &Expense) -> Ordering {
        let parse = |date: &str| DateTime::<FixedOffset>::parse_from_rfc3339(date).ok();
        match (parse(&a.date), parse(&b.date)) {
            (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.date.cmp(&a.date),
        }
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn store_expense(&self, expense: &Expense) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;
        info!("Storing expense {} ({:.2} paid by {})", expense.id, expense.amount, expense.paid_by);

        let mut expenses = self.read_expenses()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(anyhow!("Expense {} already exists", expense.id));
        }
        expenses.push(expense.clone());
        self.write_expenses(&expenses)
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let _guard = self.connection.lock_for_read().await;
        let expenses = self.read_expenses()?;
        Ok(expenses.into_iter().find(|e| e.id == expense_id))
    }

    async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let _guard = self.connection.lock_for_read().await;
        let mut expenses: Vec<Expense> = self
            .read_expenses()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        expenses.sort_by(Self::newest_first);
        debug!("Listed {} expenses for {:?}", expenses.len(), filter);
        Ok(expenses)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let mut expenses = self.read_expenses()?;
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                self.write_expenses(&expenses)?;
                info!("Updated expense {}", expense.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let mut expenses = self.read_expenses()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        if expenses.len() == before {
            return Ok(false);
        }
        self.write_expenses(&expenses)?;
        info!("Deleted expense {}", expense_id);
        Ok(true)
    }
}
