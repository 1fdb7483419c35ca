//! # CSV Group Repository
//!
//! Each group is a single YAML file under `groups/`, named after a
//! filesystem-safe form of the group id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::CsvConnection;
use crate::domain::models::group::Group;
use crate::storage::traits::GroupStorage;

#[derive(Clone)]
pub struct GroupRepository {
    connection: CsvConnection,
}

impl GroupRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Converts "group::1f0c-…" into "group__1f0c_…"
    pub fn safe_file_stem(group_id: &str) -> String {
        group_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    fn group_file_path(&self, group_id: &str) -> PathBuf {
        self.connection
            .groups_directory()
            .join(format!("{}.yaml", Self::safe_file_stem(group_id)))
    }

    fn load_group(path: &Path) -> Result<Group> {
        let yaml = fs::read_to_string(path)?;
        let group: Group = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse group file {}", path.display()))?;
        Ok(group)
    }

    fn discover_groups(&self) -> Result<Vec<Group>> {
        let groups_dir = self.connection.groups_directory();
        if !groups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut groups = Vec::new();
        for entry in fs::read_dir(&groups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match Self::load_group(&path) {
                Ok(group) => groups.push(group),
                Err(e) => warn!("Skipping unreadable group file {}: {}", path.display(), e),
            }
        }
        Ok(groups)
    }
}

#[async_trait]
impl GroupStorage for GroupRepository {
    async fn store_group(&self, group: &Group) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;
        let path = self.group_file_path(&group.id);
        let temp_path = path.with_extension("tmp");

        let yaml = serde_yaml::to_string(group)?;
        fs::write(&temp_path, yaml)?;
        fs::rename(&temp_path, &path)?;

        info!("Stored group {} ({}) with {} members", group.name, group.id, group.members.len());
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>> {
        let path = self.group_file_path(group_id);
        if !path.exists() {
            debug!("No group file for {}", group_id);
            return Ok(None);
        }
        Ok(Some(Self::load_group(&path)?))
    }

    async fn list_groups_for_member(&self, member_id: &str) -> Result<Vec<Group>> {
        let mut groups: Vec<Group> = self
            .discover_groups()?
            .into_iter()
            .filter(|g| g.has_member(member_id))
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn delete_group(&self, group_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let path = self.group_file_path(group_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted group {}", group_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn group(id: &str, name: &str, members: &[&str]) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            created_by: members[0].to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(GroupRepository::safe_file_stem("group::ab-12"), "group__ab_12");
    }

    #[tokio::test]
    async fn test_store_and_get_group() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = GroupRepository::new(env.connection.clone());
        let trip = group("group::trip", "Trip", &["alice", "bob"]);

        repo.store_group(&trip).await.unwrap();

        assert_eq!(repo.get_group("group::trip").await.unwrap(), Some(trip));
        assert_eq!(repo.get_group("group::none").await.unwrap(), None);
        assert_eq!(
            repo.list_members("group::trip").await.unwrap(),
            Some(vec!["alice".to_string(), "bob".to_string()])
        );
        assert_eq!(repo.list_members("group::none").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_groups_for_member_sorted_by_name() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = GroupRepository::new(env.connection.clone());
        repo.store_group(&group("group::2", "Zoo", &["alice", "bob"])).await.unwrap();
        repo.store_group(&group("group::1", "Flat", &["bob", "alice"])).await.unwrap();
        repo.store_group(&group("group::3", "Work", &["carol"])).await.unwrap();

        let names: Vec<String> = repo
            .list_groups_for_member("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Flat", "Zoo"]);
    }

    #[tokio::test]
    async fn test_unreadable_group_files_are_skipped() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = GroupRepository::new(env.connection.clone());
        repo.store_group(&group("group::ok", "Ok", &["alice"])).await.unwrap();
        fs::write(env.connection.groups_directory().join("broken.yaml"), ": : :").unwrap();

        let groups = repo.list_groups_for_member("alice").await.unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_group() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = GroupRepository::new(env.connection.clone());
        repo.store_group(&group("group::x", "X", &["alice"])).await.unwrap();

        assert!(repo.delete_group("group::x").await.unwrap());
        assert!(!repo.delete_group("group::x").await.unwrap());
        assert_eq!(repo.get_group("group::x").await.unwrap(), None);
    }
}
