use shared::{BalancesResponse, Settlement};

use crate::domain::models::balance::{BalanceSheet, Settlement as DomainSettlement};

pub struct BalanceMapper;

impl BalanceMapper {
    fn settlement_to_dto(domain: DomainSettlement) -> Settlement {
        Settlement {
            from: domain.from,
            to: domain.to,
            amount: domain.amount,
        }
    }

    pub fn to_response(sheet: BalanceSheet) -> BalancesResponse {
        BalancesResponse {
            balances: sheet.balances,
            settlements: sheet
                .settlements
                .into_iter()
                .map(Self::settlement_to_dto)
                .collect(),
        }
    }
}
