//! Test utilities for file-backed tests.
//!
//! `TestEnvironment` owns a temporary directory, so test data is removed when
//! the environment drops, even if the test panics.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;

pub struct TestEnvironment {
    /// Kept alive until drop; removing it deletes the directory
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("fairshare_test_")?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;
        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("FAIRSHARE_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}
