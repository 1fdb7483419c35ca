use std::fmt;
use std::str::FromStr;

use crate::domain::error::SplitError;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub scope: ExpenseScope,
    pub category: String,
    pub split_type: SplitType,
    pub split_details: Vec<SplitDetail>,
    pub date: String,
}

impl Expense {
    pub fn generate_id() -> String {
        format!("expense::{}", uuid::Uuid::new_v4())
    }

    pub fn group_id(&self) -> Option<&str> {
        match &self.scope {
            ExpenseScope::Group { group_id } => Some(group_id),
            ExpenseScope::Personal { .. } => None,
        }
    }
}

/// How the eligible member set of an expense is resolved
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseScope {
    Personal { participants: Vec<String> },
    Group { group_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitType {
    Equal,
    Unequal,
    Percentage,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Unequal => "unequal",
            SplitType::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitType::Equal),
            "unequal" => Ok(SplitType::Unequal),
            "percentage" => Ok(SplitType::Percentage),
            other => Err(SplitError::InvalidSplitType(other.to_string())),
        }
    }
}

/// A member's computed share of an expense
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDetail {
    pub member_id: String,
    pub amount: f64,
}

impl SplitDetail {
    pub fn new(member_id: impl Into<String>, amount: f64) -> Self {
        Self {
            member_id: member_id.into(),
            amount,
        }
    }
}

/// Caller-supplied share before validation: an amount for unequal splits,
/// a percentage for percentage splits
#[derive(Debug, Clone, PartialEq)]
pub struct RawShare {
    pub member_id: String,
    pub value: f64,
}

impl RawShare {
    pub fn new(member_id: impl Into<String>, value: f64) -> Self {
        Self {
            member_id: member_id.into(),
            value,
        }
    }
}

impl From<&SplitDetail> for RawShare {
    fn from(detail: &SplitDetail) -> Self {
        RawShare::new(detail.member_id.clone(), detail.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_type_parsing_is_lenient_on_case() {
        assert_eq!("Equal".parse::<SplitType>().unwrap(), SplitType::Equal);
        assert_eq!(" unequal ".parse::<SplitType>().unwrap(), SplitType::Unequal);
        assert_eq!("PERCENTAGE".parse::<SplitType>().unwrap(), SplitType::Percentage);
    }

    #[test]
    fn test_unknown_split_type_is_rejected() {
        let err = "shares".parse::<SplitType>().unwrap_err();
        assert!(matches!(err, SplitError::InvalidSplitType(ref t) if t == "shares"));
        assert_eq!(err.to_string(), "Invalid split type");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(Expense::generate_id(), Expense::generate_id());
        assert!(Expense::generate_id().starts_with("expense::"));
    }
}
