use serde::{Deserialize, Serialize};

/// Group as persisted in `groups/<id>.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: String,
}

impl Group {
    pub fn generate_id() -> String {
        format!("group::{}", uuid::Uuid::new_v4())
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m == member_id)
    }
}
