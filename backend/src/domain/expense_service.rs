//! Expense lifecycle: create, read, partial update and delete.
//!
//! Splits are computed once when an expense is created and only recomputed
//! when an update touches the amount, the split type or the shares. Every
//! validation runs before anything is written, so a rejected request never
//! leaves a partial record behind.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::commands::expenses::{
    CreateExpenseCommand, DeleteExpenseResult, UpdateExpenseCommand,
};
use crate::domain::error::{DomainError, DomainResult, SplitError};
use crate::domain::models::expense::{Expense, ExpenseScope, RawShare, SplitType, DEFAULT_CATEGORY};
use crate::domain::split_calculator::SplitCalculator;
use crate::storage::{Connection, ExpenseFilter, ExpenseStorage, GroupStorage};

const MAX_DESCRIPTION_LENGTH: usize = 256;

#[derive(Clone)]
pub struct ExpenseService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    group_repository: C::GroupRepository,
    split_calculator: SplitCalculator,
}

impl<C: Connection> ExpenseService<C> {
    pub fn new(connection: &C, split_calculator: SplitCalculator) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            group_repository: connection.create_group_repository(),
            split_calculator,
        }
    }

    pub async fn create_expense(&self, command: CreateExpenseCommand) -> DomainResult<Expense> {
        info!(
            "Creating expense '{}' for {:.2} paid by {}",
            command.description, command.amount, command.paid_by
        );

        let description = Self::validate_description(&command.description)?;
        Self::validate_amount(command.amount)?;
        let paid_by = Self::validate_member("Payer", &command.paid_by)?;
        let split_type = command.split_type.parse::<SplitType>()?;

        let scope = Self::normalize_scope(command.scope)?;
        let eligible_members = self.resolve_eligible_members(&scope).await?;
        let raw_shares = command.split_details.unwrap_or_default();
        let split_details = self.split_calculator.compute_splits(
            split_type,
            command.amount,
            &eligible_members,
            &raw_shares,
        )?;

        let expense = Expense {
            id: Expense::generate_id(),
            description,
            amount: command.amount,
            paid_by,
            scope,
            category: Self::normalize_category(command.category),
            split_type,
            split_details,
            date: Self::resolve_date(command.date)?,
        };

        self.expense_repository.store_expense(&expense).await?;
        info!("Created expense {} with {} shares", expense.id, expense.split_details.len());
        Ok(expense)
    }

    pub async fn get_expense(&self, expense_id: &str) -> DomainResult<Expense> {
        self.expense_repository
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Expense not found".to_string()))
    }

    pub async fn list_expenses(&self, filter: ExpenseFilter) -> DomainResult<Vec<Expense>> {
        if let ExpenseFilter::Group(group_id) = &filter {
            self.require_group_members(group_id).await?;
        }
        Ok(self.expense_repository.list_expenses(&filter).await?)
    }

    /// Concurrent updates of the same expense are last-writer-wins
    pub async fn update_expense(&self, command: UpdateExpenseCommand) -> DomainResult<Expense> {
        info!("Updating expense {}", command.expense_id);

        let mut expense = self.get_expense(&command.expense_id).await?;
        let changes_split = command.changes_split();

        if let Some(description) = &command.description {
            expense.description = Self::validate_description(description)?;
        }
        if let Some(amount) = command.amount {
            Self::validate_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(paid_by) = &command.paid_by {
            expense.paid_by = Self::validate_member("Payer", paid_by)?;
        }
        if command.category.is_some() {
            expense.category = Self::normalize_category(command.category);
        }
        if let Some(split_type) = &command.split_type {
            expense.split_type = split_type.parse::<SplitType>()?;
        }

        if changes_split {
            let raw_shares = match command.split_details {
                Some(shares) => shares,
                None => Self::fallback_shares(&expense)?,
            };
            let eligible_members = self.resolve_eligible_members(&expense.scope).await?;
            expense.split_details = self.split_calculator.compute_splits(
                expense.split_type,
                expense.amount,
                &eligible_members,
                &raw_shares,
            )?;
        }

        if !self.expense_repository.update_expense(&expense).await? {
            // Deleted between our read and write
            return Err(DomainError::NotFound("Expense not found".to_string()));
        }
        Ok(expense)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> DomainResult<DeleteExpenseResult> {
        info!("Deleting expense {}", expense_id);
        if !self.expense_repository.delete_expense(expense_id).await? {
            return Err(DomainError::NotFound("Expense not found".to_string()));
        }
        Ok(DeleteExpenseResult {
            success_message: "Expense deleted successfully".to_string(),
        })
    }

    /// Shares to recompute with when an update changes the amount or type
    /// but supplies none. Stored unequal amounts are reused as-is; stored
    /// percentage splits only keep amounts, so fresh percentages are required.
    fn fallback_shares(expense: &Expense) -> DomainResult<Vec<RawShare>> {
        match expense.split_type {
            SplitType::Equal => Ok(Vec::new()),
            SplitType::Unequal => Ok(expense.split_details.iter().map(RawShare::from).collect()),
            SplitType::Percentage => {
                Err(SplitError::MissingSplitDetails(SplitType::Percentage.to_string()).into())
            }
        }
    }

    async fn resolve_eligible_members(&self, scope: &ExpenseScope) -> DomainResult<Vec<String>> {
        match scope {
            ExpenseScope::Personal { participants } => Ok(participants.clone()),
            ExpenseScope::Group { group_id } => self.require_group_members(group_id).await,
        }
    }

    async fn require_group_members(&self, group_id: &str) -> DomainResult<Vec<String>> {
        self.group_repository
            .list_members(group_id)
            .await?
            .ok_or_else(|| {
                warn!("Group {} not found", group_id);
                DomainError::NotFound("Group not found".to_string())
            })
    }

    /// Trims participant ids and drops blanks and duplicates, keeping order
    fn normalize_scope(scope: ExpenseScope) -> DomainResult<ExpenseScope> {
        match scope {
            ExpenseScope::Personal { participants } => {
                let mut cleaned: Vec<String> = Vec::with_capacity(participants.len());
                for participant in participants {
                    let participant = participant.trim();
                    if !participant.is_empty() && !cleaned.iter().any(|p| p == participant) {
                        cleaned.push(participant.to_string());
                    }
                }
                if cleaned.is_empty() {
                    return Err(DomainError::Validation(
                        "At least one participant is required".to_string(),
                    ));
                }
                Ok(ExpenseScope::Personal {
                    participants: cleaned,
                })
            }
            ExpenseScope::Group { group_id } => {
                let group_id = group_id.trim().to_string();
                if group_id.is_empty() {
                    return Err(DomainError::Validation("Group is required".to_string()));
                }
                Ok(ExpenseScope::Group { group_id })
            }
        }
    }

    fn validate_description(description: &str) -> DomainResult<String> {
        let trimmed = description.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::Validation(format!(
                "Description must be between 1 and {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate_amount(amount: f64) -> DomainResult<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::Validation("Amount must be positive".to_string()));
        }
        Ok(())
    }

    fn validate_member(role: &str, member_id: &str) -> DomainResult<String> {
        let trimmed = member_id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation(format!("{} is required", role)));
        }
        Ok(trimmed.to_string())
    }

    fn normalize_category(category: Option<String>) -> String {
        category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    fn resolve_date(date: Option<String>) -> DomainResult<String> {
        match date {
            Some(date) => DateTime::parse_from_rfc3339(date.trim())
                .map(|parsed| parsed.to_rfc3339())
                .map_err(|_| DomainError::Validation("Date must be an RFC 3339 timestamp".to_string())),
            None => Ok(Utc::now().to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::expense::SplitDetail;
    use crate::domain::models::group::Group;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::CsvConnection;

    fn create_test_service(env: &TestEnvironment) -> ExpenseService<CsvConnection> {
        ExpenseService::new(&env.connection, SplitCalculator::strict())
    }

    async fn create_test_group(env: &TestEnvironment, members: &[&str]) -> Group {
        let group = Group {
            id: Group::generate_id(),
            name: "Flat".to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            created_by: members[0].to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        env.connection
            .create_group_repository()
            .store_group(&group)
            .await
            .unwrap();
        group
    }

    fn personal_command(split_type: &str, amount: f64, shares: Option<Vec<RawShare>>) -> CreateExpenseCommand {
        CreateExpenseCommand {
            description: "Dinner".to_string(),
            amount,
            paid_by: "alice".to_string(),
            scope: ExpenseScope::Personal {
                participants: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
            },
            category: None,
            split_type: split_type.to_string(),
            split_details: shares,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_create_personal_equal_expense() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);

        let expense = service
            .create_expense(personal_command("equal", 90.0, None))
            .await
            .unwrap();

        assert_eq!(expense.category, "General");
        assert_eq!(expense.split_type, SplitType::Equal);
        assert_eq!(expense.split_details.len(), 3);
        assert!(expense.split_details.iter().all(|s| s.amount == 30.0));
        assert_eq!(service.get_expense(&expense.id).await.unwrap(), expense);
    }

    #[tokio::test]
    async fn test_create_group_expense_uses_roster() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let group = create_test_group(&env, &["alice", "bob"]).await;

        let expense = service
            .create_expense(CreateExpenseCommand {
                scope: ExpenseScope::Group {
                    group_id: group.id.clone(),
                },
                category: Some("Groceries".to_string()),
                ..personal_command("equal", 50.0, None)
            })
            .await
            .unwrap();

        assert_eq!(
            expense.split_details,
            vec![SplitDetail::new("alice", 25.0), SplitDetail::new("bob", 25.0)]
        );
        assert_eq!(expense.category, "Groceries");

        let listed = service
            .list_expenses(ExpenseFilter::Group(group.id.clone()))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_group() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);

        let err = service
            .create_expense(CreateExpenseCommand {
                scope: ExpenseScope::Group {
                    group_id: "group::missing".to_string(),
                },
                ..personal_command("equal", 50.0, None)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejected_split_persists_nothing() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);

        let shares = vec![RawShare::new("alice", 60.0), RawShare::new("bob", 39.0)];
        let err = service
            .create_expense(personal_command("unequal", 100.0, Some(shares)))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Split(SplitError::UnequalSumMismatch { .. })));
        assert_eq!(err.to_string(), "Unequal split amounts must sum to total amount");
        assert!(service.list_expenses(ExpenseFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_split_type_is_a_split_error() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);

        let err = service
            .create_expense(personal_command("by-weight", 10.0, None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Split(SplitError::InvalidSplitType(_))));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_create_validates_basic_fields() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);

        let empty_description = CreateExpenseCommand {
            description: "   ".to_string(),
            ..personal_command("equal", 10.0, None)
        };
        let negative_amount = personal_command("equal", -5.0, None);
        let no_payer = CreateExpenseCommand {
            paid_by: "".to_string(),
            ..personal_command("equal", 10.0, None)
        };
        let no_participants = CreateExpenseCommand {
            scope: ExpenseScope::Personal {
                participants: vec![" ".to_string()],
            },
            ..personal_command("equal", 10.0, None)
        };
        let bad_date = CreateExpenseCommand {
            date: Some("yesterday".to_string()),
            ..personal_command("equal", 10.0, None)
        };

        for command in [empty_description, negative_amount, no_payer, no_participants, bad_date] {
            let err = service.create_expense(command).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "unexpected error: {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_update_description_keeps_splits() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let shares = vec![RawShare::new("alice", 70.0), RawShare::new("bob", 30.0)];
        let created = service
            .create_expense(personal_command("unequal", 100.0, Some(shares)))
            .await
            .unwrap();

        let updated = service
            .update_expense(UpdateExpenseCommand {
                expense_id: created.id.clone(),
                description: Some("Team dinner".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.description, "Team dinner");
        assert_eq!(updated.split_details, created.split_details);
    }

    #[tokio::test]
    async fn test_update_amount_recomputes_equal_split() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let created = service
            .create_expense(personal_command("equal", 90.0, None))
            .await
            .unwrap();

        let updated = service
            .update_expense(UpdateExpenseCommand {
                expense_id: created.id.clone(),
                amount: Some(120.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(updated.split_details.iter().all(|s| s.amount == 40.0));
        assert_eq!(service.get_expense(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_to_percentage_requires_shares() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let created = service
            .create_expense(personal_command("equal", 90.0, None))
            .await
            .unwrap();

        let err = service
            .update_expense(UpdateExpenseCommand {
                expense_id: created.id.clone(),
                split_type: Some("percentage".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Split(SplitError::MissingSplitDetails(_))));

        let updated = service
            .update_expense(UpdateExpenseCommand {
                expense_id: created.id.clone(),
                split_type: Some("percentage".to_string()),
                split_details: Some(vec![RawShare::new("bob", 50.0), RawShare::new("carol", 50.0)]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            updated.split_details,
            vec![SplitDetail::new("bob", 45.0), SplitDetail::new("carol", 45.0)]
        );
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_untouched() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let shares = vec![RawShare::new("alice", 70.0), RawShare::new("bob", 30.0)];
        let created = service
            .create_expense(personal_command("unequal", 100.0, Some(shares)))
            .await
            .unwrap();

        // Stored shares no longer add up to the new amount
        let err = service
            .update_expense(UpdateExpenseCommand {
                expense_id: created.id.clone(),
                amount: Some(80.0),
                description: Some("Changed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Split(SplitError::UnequalSumMismatch { .. })));
        assert_eq!(service.get_expense(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let env = TestEnvironment::new().await.unwrap();
        let service = create_test_service(&env);
        let created = service
            .create_expense(personal_command("equal", 30.0, None))
            .await
            .unwrap();

        let result = service.delete_expense(&created.id).await.unwrap();
        assert_eq!(result.success_message, "Expense deleted successfully");
        assert!(matches!(
            service.delete_expense(&created.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            service.get_expense(&created.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }
}
