use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::expense_repository::ExpenseRepository;
use super::group_repository::GroupRepository;
use crate::storage::traits::Connection;

pub const EXPENSES_FILE: &str = "expenses.csv";
pub const GROUPS_DIRECTORY: &str = "groups";

pub const EXPENSES_HEADER: &[&str] = &[
    "id",
    "description",
    "amount",
    "paid_by",
    "scope_kind",
    "group_id",
    "participants",
    "category",
    "split_type",
    "split_details",
    "date",
];

/// CsvConnection manages the data directory layout:
///
/// ```text
/// data/
/// ├── expenses.csv
/// └── groups/
///     └── {group_id}.yaml
/// ```
///
/// Writes replace whole files, so every read-modify-write cycle runs under
/// the write lock and readers hold the read lock while loading.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    file_lock: Arc<RwLock<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            info!("Creating data directory {}", base_path.display());
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
        }

        let connection = Self {
            base_directory: base_path,
            file_lock: Arc::new(RwLock::new(())),
        };
        connection.ensure_files_exist()?;
        Ok(connection)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn expenses_file_path(&self) -> PathBuf {
        self.base_directory.join(EXPENSES_FILE)
    }

    pub fn groups_directory(&self) -> PathBuf {
        self.base_directory.join(GROUPS_DIRECTORY)
    }

    /// Ensure the expenses CSV exists with its header and the groups directory is present
    pub fn ensure_files_exist(&self) -> Result<()> {
        Self::ensure_csv_file(&self.expenses_file_path(), EXPENSES_HEADER)?;

        let groups_dir = self.groups_directory();
        if !groups_dir.exists() {
            fs::create_dir_all(&groups_dir)?;
        }
        Ok(())
    }

    /// Serializes writers; hold the guard across read-modify-write
    pub async fn lock_for_write(&self) -> RwLockWriteGuard<'_, ()> {
        self.file_lock.write().await
    }

    /// Keeps writers out while a reader loads the files
    pub async fn lock_for_read(&self) -> RwLockReadGuard<'_, ()> {
        self.file_lock.read().await
    }

    fn ensure_csv_file(path: &Path, header: &[&str]) -> Result<()> {
        if !path.exists() {
            debug!("Creating {} with header", path.display());
            let mut line = header.join(",");
            line.push('\n');
            fs::write(path, line).with_context(|| format!("Failed to create {}", path.display()))?;
        }
        Ok(())
    }
}

impl Connection for CsvConnection {
    type ExpenseRepository = ExpenseRepository;
    type GroupRepository = GroupRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }

    fn create_group_repository(&self) -> Self::GroupRepository {
        GroupRepository::new(self.clone())
    }
}
