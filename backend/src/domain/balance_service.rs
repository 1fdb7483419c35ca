use log::{debug, info};

use crate::domain::balance_calculator::compute_balances;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::balance::BalanceSheet;
use crate::storage::{Connection, ExpenseFilter, ExpenseStorage, GroupStorage};

/// Derives balances and settlement suggestions from stored expenses.
/// Nothing here is persisted; every call recomputes from the records.
#[derive(Clone)]
pub struct BalanceService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    group_repository: C::GroupRepository,
}

impl<C: Connection> BalanceService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            group_repository: connection.create_group_repository(),
        }
    }

    pub async fn get_balances(&self, filter: ExpenseFilter) -> DomainResult<BalanceSheet> {
        if let ExpenseFilter::Group(group_id) = &filter {
            if self.group_repository.get_group(group_id).await?.is_none() {
                return Err(DomainError::NotFound("Group not found".to_string()));
            }
        }

        let expenses = self.expense_repository.list_expenses(&filter).await?;
        debug!("Computing balances over {} expenses ({:?})", expenses.len(), filter);

        let sheet = compute_balances(&expenses);
        info!(
            "Balances for {:?}: {} members, {} settlements",
            filter,
            sheet.balances.len(),
            sheet.settlements.len()
        );
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::expenses::CreateExpenseCommand;
    use crate::domain::commands::groups::CreateGroupCommand;
    use crate::domain::expense_service::ExpenseService;
    use crate::domain::group_service::GroupService;
    use crate::domain::models::balance::Settlement;
    use crate::domain::models::expense::{ExpenseScope, RawShare};
    use crate::domain::split_calculator::SplitCalculator;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::CsvConnection;

    struct Services {
        expenses: ExpenseService<CsvConnection>,
        groups: GroupService<CsvConnection>,
        balances: BalanceService<CsvConnection>,
    }

    fn create_test_services(env: &TestEnvironment) -> Services {
        Services {
            expenses: ExpenseService::new(&env.connection, SplitCalculator::strict()),
            groups: GroupService::new(&env.connection),
            balances: BalanceService::new(&env.connection),
        }
    }

    fn group_expense(
        group_id: &str,
        amount: f64,
        paid_by: &str,
        split_type: &str,
        shares: Option<Vec<RawShare>>,
    ) -> CreateExpenseCommand {
        CreateExpenseCommand {
            description: "Shared cost".to_string(),
            amount,
            paid_by: paid_by.to_string(),
            scope: ExpenseScope::Group {
                group_id: group_id.to_string(),
            },
            category: None,
            split_type: split_type.to_string(),
            split_details: shares,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_group_scenario_balances_and_settlements() {
        let env = TestEnvironment::new().await.unwrap();
        let services = create_test_services(&env);
        let group = services
            .groups
            .create_group(CreateGroupCommand {
                name: "Trip".to_string(),
                members: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                created_by: "A".to_string(),
            })
            .await
            .unwrap();

        services
            .expenses
            .create_expense(group_expense(&group.id, 90.0, "A", "equal", None))
            .await
            .unwrap();
        services
            .expenses
            .create_expense(group_expense(
                &group.id,
                30.0,
                "B",
                "unequal",
                Some(vec![RawShare::new("C", 30.0)]),
            ))
            .await
            .unwrap();

        let sheet = services
            .balances
            .get_balances(ExpenseFilter::Group(group.id.clone()))
            .await
            .unwrap();

        assert_eq!(sheet.balances["A"], 60.0);
        assert_eq!(sheet.balances["B"], 0.0);
        assert_eq!(sheet.balances["C"], -60.0);
        assert_eq!(
            sheet.settlements,
            vec![Settlement {
                from: "C".to_string(),
                to: "A".to_string(),
                amount: 60.0,
            }]
        );
    }

    #[tokio::test]
    async fn test_personal_filter_excludes_group_expenses() {
        let env = TestEnvironment::new().await.unwrap();
        let services = create_test_services(&env);
        let group = services
            .groups
            .create_group(CreateGroupCommand {
                name: "Flat".to_string(),
                members: vec!["bob".to_string()],
                created_by: "alice".to_string(),
            })
            .await
            .unwrap();
        services
            .expenses
            .create_expense(group_expense(&group.id, 40.0, "alice", "equal", None))
            .await
            .unwrap();
        services
            .expenses
            .create_expense(CreateExpenseCommand {
                scope: ExpenseScope::Personal {
                    participants: vec!["carol".to_string(), "dave".to_string()],
                },
                ..group_expense("", 10.0, "carol", "equal", None)
            })
            .await
            .unwrap();

        let personal = services.balances.get_balances(ExpenseFilter::Personal).await.unwrap();
        assert_eq!(personal.balances.len(), 2);
        assert_eq!(personal.balances["carol"], 5.0);
        assert_eq!(personal.balances["dave"], -5.0);

        let all = services.balances.get_balances(ExpenseFilter::All).await.unwrap();
        assert_eq!(all.balances.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let env = TestEnvironment::new().await.unwrap();
        let services = create_test_services(&env);

        let err = services
            .balances
            .get_balances(ExpenseFilter::Group("group::missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_expenses_gives_empty_sheet() {
        let env = TestEnvironment::new().await.unwrap();
        let services = create_test_services(&env);

        let sheet = services.balances.get_balances(ExpenseFilter::All).await.unwrap();
        assert_eq!(sheet, BalanceSheet::default());
    }
}
