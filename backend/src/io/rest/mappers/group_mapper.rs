use shared::{CreateGroupRequest, DeleteGroupResponse, Group, GroupListResponse};

use crate::domain::commands::groups::{
    CreateGroupCommand, DeleteGroupCommand, DeleteGroupResult, GroupListResult,
};
use crate::domain::models::group::Group as DomainGroup;

pub struct GroupMapper;

impl GroupMapper {
    pub fn to_dto(domain: DomainGroup) -> Group {
        Group {
            id: domain.id,
            name: domain.name,
            members: domain.members,
            created_by: domain.created_by,
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainGroup>) -> Vec<Group> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_list_response(result: GroupListResult) -> GroupListResponse {
        GroupListResponse {
            my_groups: Self::to_dto_list(result.my_groups),
            other_groups: Self::to_dto_list(result.other_groups),
        }
    }

    pub fn to_create_command(request: CreateGroupRequest) -> CreateGroupCommand {
        CreateGroupCommand {
            name: request.name,
            members: request.members,
            created_by: request.created_by,
        }
    }

    pub fn to_delete_command(group_id: String, requested_by: String) -> DeleteGroupCommand {
        DeleteGroupCommand {
            group_id,
            requested_by,
        }
    }

    pub fn to_delete_response(result: DeleteGroupResult) -> DeleteGroupResponse {
        DeleteGroupResponse {
            success_message: result.success_message,
        }
    }
}
