use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Expense ID in format: "expense::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Free-text description of what was bought
    pub description: String,
    /// Total cost, always positive
    pub amount: f64,
    /// Member who fronted the full amount
    pub paid_by: String,
    /// Who the expense is shared between
    pub scope: ExpenseScope,
    pub category: String,
    pub split_type: SplitType,
    /// Per-member owed amounts, in the order they were computed
    pub split_details: Vec<SplitDetail>,
    /// Human-readable timestamp with timezone (RFC 3339)
    pub date: String,
}

/// Who an expense is shared between
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpenseScope {
    /// A declared list of participants
    Personal { participants: Vec<String> },
    /// Every member of a group
    Group { group_id: String },
}

/// How the total of an expense is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Unequal,
    Percentage,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitType::Equal => "equal",
            SplitType::Unequal => "unequal",
            SplitType::Percentage => "percentage",
        };
        f.write_str(name)
    }
}

/// A single member's share of an expense.
///
/// In requests the `amount` carries the raw input: an owed amount for
/// unequal splits and a percentage for percentage splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitDetail {
    pub member_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// Description of the expense (max 256 characters)
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub scope: ExpenseScope,
    /// Defaults to "General" when omitted
    #[serde(default)]
    pub category: Option<String>,
    /// One of "equal", "unequal" or "percentage"
    pub split_type: String,
    /// Raw shares, required for unequal and percentage splits
    #[serde(default)]
    pub split_details: Option<Vec<SplitDetail>>,
    /// Optional date override (RFC 3339) - uses current time if not provided
    #[serde(default)]
    pub date: Option<String>,
}

/// Partial update; only supplied fields change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub split_type: Option<String>,
    #[serde(default)]
    pub split_details: Option<Vec<SplitDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub success_message: String,
}

/// A suggested transfer between two members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Net balances (positive = is owed, negative = owes) and suggested settlements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancesResponse {
    pub balances: BTreeMap<String, f64>,
    pub settlements: Vec<Settlement>,
}

/// Represents a group of members sharing expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: String, // RFC 3339 timestamp
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_by: String,
}

/// Groups visible to one member, split by who created them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub my_groups: Vec<Group>,
    pub other_groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteGroupResponse {
    pub success_message: String,
}

/// Body returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
