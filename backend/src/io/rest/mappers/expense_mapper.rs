use shared::{
    CreateExpenseRequest, DeleteExpenseResponse, Expense, ExpenseListResponse, ExpenseScope,
    SplitDetail, SplitType, UpdateExpenseRequest,
};

use crate::domain::commands::expenses::{
    CreateExpenseCommand, DeleteExpenseResult, UpdateExpenseCommand,
};
use crate::domain::models::expense::{
    Expense as DomainExpense, ExpenseScope as DomainExpenseScope, RawShare,
    SplitDetail as DomainSplitDetail, SplitType as DomainSplitType,
};

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn scope_to_domain(dto: ExpenseScope) -> DomainExpenseScope {
        match dto {
            ExpenseScope::Personal { participants } => DomainExpenseScope::Personal { participants },
            ExpenseScope::Group { group_id } => DomainExpenseScope::Group { group_id },
        }
    }

    pub fn scope_to_dto(domain: DomainExpenseScope) -> ExpenseScope {
        match domain {
            DomainExpenseScope::Personal { participants } => ExpenseScope::Personal { participants },
            DomainExpenseScope::Group { group_id } => ExpenseScope::Group { group_id },
        }
    }

    pub fn split_type_to_dto(domain: DomainSplitType) -> SplitType {
        match domain {
            DomainSplitType::Equal => SplitType::Equal,
            DomainSplitType::Unequal => SplitType::Unequal,
            DomainSplitType::Percentage => SplitType::Percentage,
        }
    }

    /// Request shares carry raw input, so they map to `RawShare`, not to a computed detail
    pub fn raw_shares_to_domain(dto: Vec<SplitDetail>) -> Vec<RawShare> {
        dto.into_iter()
            .map(|share| RawShare::new(share.member_id, share.amount))
            .collect()
    }

    fn split_detail_to_dto(domain: DomainSplitDetail) -> SplitDetail {
        SplitDetail {
            member_id: domain.member_id,
            amount: domain.amount,
        }
    }

    pub fn to_dto(domain: DomainExpense) -> Expense {
        Expense {
            id: domain.id,
            description: domain.description,
            amount: domain.amount,
            paid_by: domain.paid_by,
            scope: Self::scope_to_dto(domain.scope),
            category: domain.category,
            split_type: Self::split_type_to_dto(domain.split_type),
            split_details: domain
                .split_details
                .into_iter()
                .map(Self::split_detail_to_dto)
                .collect(),
            date: domain.date,
        }
    }

    pub fn to_list_response(domain: Vec<DomainExpense>) -> ExpenseListResponse {
        ExpenseListResponse {
            expenses: domain.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateExpenseRequest) -> CreateExpenseCommand {
        CreateExpenseCommand {
            description: request.description,
            amount: request.amount,
            paid_by: request.paid_by,
            scope: Self::scope_to_domain(request.scope),
            category: request.category,
            split_type: request.split_type,
            split_details: request.split_details.map(Self::raw_shares_to_domain),
            date: request.date,
        }
    }

    pub fn to_update_command(expense_id: String, request: UpdateExpenseRequest) -> UpdateExpenseCommand {
        UpdateExpenseCommand {
            expense_id,
            description: request.description,
            amount: request.amount,
            paid_by: request.paid_by,
            category: request.category,
            split_type: request.split_type,
            split_details: request.split_details.map(Self::raw_shares_to_domain),
        }
    }

    pub fn to_delete_response(result: DeleteExpenseResult) -> DeleteExpenseResponse {
        DeleteExpenseResponse {
            success_message: result.success_message,
        }
    }
}
