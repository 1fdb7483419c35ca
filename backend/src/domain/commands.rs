//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to these internal types.

pub mod expenses {
    use crate::domain::models::expense::{ExpenseScope, RawShare};

    /// Input for creating a new expense.
    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub description: String,
        pub amount: f64,
        pub paid_by: String,
        pub scope: ExpenseScope,
        pub category: Option<String>,
        /// Unparsed, so unknown names surface as a split validation error
        pub split_type: String,
        pub split_details: Option<Vec<RawShare>>,
        pub date: Option<String>,
    }

    /// Partial update of an existing expense.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateExpenseCommand {
        pub expense_id: String,
        pub description: Option<String>,
        pub amount: Option<f64>,
        pub paid_by: Option<String>,
        pub category: Option<String>,
        pub split_type: Option<String>,
        pub split_details: Option<Vec<RawShare>>,
    }

    impl UpdateExpenseCommand {
        /// Amount, split type and shares all feed the split calculation
        pub fn changes_split(&self) -> bool {
            self.amount.is_some() || self.split_type.is_some() || self.split_details.is_some()
        }
    }

    /// Result of deleting an expense.
    #[derive(Debug, Clone)]
    pub struct DeleteExpenseResult {
        pub success_message: String,
    }
}

pub mod groups {
    use crate::domain::models::group::Group;

    /// Input for creating a group. The creator is always made a member.
    #[derive(Debug, Clone)]
    pub struct CreateGroupCommand {
        pub name: String,
        pub members: Vec<String>,
        pub created_by: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteGroupCommand {
        pub group_id: String,
        pub requested_by: String,
    }

    /// Groups a member belongs to, split by who created them.
    #[derive(Debug, Clone)]
    pub struct GroupListResult {
        pub my_groups: Vec<Group>,
        pub other_groups: Vec<Group>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteGroupResult {
        pub success_message: String,
    }
}
