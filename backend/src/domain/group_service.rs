use chrono::Utc;
use log::{info, warn};

use crate::domain::commands::groups::{
    CreateGroupCommand, DeleteGroupCommand, DeleteGroupResult, GroupListResult,
};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::group::Group;
use crate::storage::{Connection, GroupStorage};

/// Manages group rosters. Only the creator may delete a group.
#[derive(Clone)]
pub struct GroupService<C: Connection> {
    group_repository: C::GroupRepository,
}

impl<C: Connection> GroupService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            group_repository: connection.create_group_repository(),
        }
    }

    pub async fn create_group(&self, command: CreateGroupCommand) -> DomainResult<Group> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Group name is required".to_string()));
        }
        let created_by = command.created_by.trim();
        if created_by.is_empty() {
            return Err(DomainError::Validation("Group creator is required".to_string()));
        }

        let mut members: Vec<String> = Vec::with_capacity(command.members.len() + 1);
        for member in command.members.iter().map(|m| m.trim()) {
            if !member.is_empty() && !members.iter().any(|m| m == member) {
                members.push(member.to_string());
            }
        }
        if !members.iter().any(|m| m == created_by) {
            members.push(created_by.to_string());
        }

        let group = Group {
            id: Group::generate_id(),
            name: name.to_string(),
            members,
            created_by: created_by.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.group_repository.store_group(&group).await?;
        info!("Created group '{}' ({})", group.name, group.id);
        Ok(group)
    }

    /// Groups the member belongs to, split into the ones they created and the rest
    pub async fn list_groups(&self, member_id: &str) -> DomainResult<GroupListResult> {
        let (my_groups, other_groups): (Vec<Group>, Vec<Group>) = self
            .group_repository
            .list_groups_for_member(member_id)
            .await?
            .into_iter()
            .partition(|g| g.created_by == member_id);
        Ok(GroupListResult {
            my_groups,
            other_groups,
        })
    }

    pub async fn get_group(&self, group_id: &str) -> DomainResult<Group> {
        self.group_repository
            .get_group(group_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Group not found".to_string()))
    }

    pub async fn list_members(&self, group_id: &str) -> DomainResult<Vec<String>> {
        Ok(self.get_group(group_id).await?.members)
    }

    /// Expenses recorded against the group are left in place
    pub async fn delete_group(&self, command: DeleteGroupCommand) -> DomainResult<DeleteGroupResult> {
        let group = self.get_group(&command.group_id).await?;
        if group.created_by != command.requested_by.trim() {
            warn!(
                "{} tried to delete group {} created by {}",
                command.requested_by, group.id, group.created_by
            );
            return Err(DomainError::Forbidden(
                "You can only delete groups you created".to_string(),
            ));
        }

        if !self.group_repository.delete_group(&group.id).await? {
            return Err(DomainError::NotFound("Group not found".to_string()));
        }
        info!("Deleted group {}", group.id);
        Ok(DeleteGroupResult {
            success_message: "Group deleted successfully".to_string(),
        })
    }
}
