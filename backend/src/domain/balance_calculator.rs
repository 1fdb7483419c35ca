//! Net balance accumulation and settlement suggestion.
//!
//! The algorithm:
//! 1. Credit each payer with the full expense amount and debit every split
//!    member with their share (the payer's own share nets against what they
//!    fronted).
//! 2. Round every balance to cents and normalize `-0.0` to `0.0`.
//! 3. Greedily match the largest remaining debtor against the largest
//!    remaining creditor until either side runs out.
//!
//! The engine trusts its input. Expenses whose splits do not add up simply
//! produce balances that reflect the inconsistency.

use std::collections::BTreeMap;

use log::debug;

use crate::domain::models::balance::{BalanceSheet, Settlement};
use crate::domain::models::expense::Expense;

/// Remaining amounts at or below this are treated as settled
pub const SETTLEMENT_EPSILON: f64 = 0.005;

/// Accumulates signed per-member balances without rounding.
/// Positive means the member is owed money, negative means they owe.
pub fn net_balances(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut net: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        *net.entry(expense.paid_by.clone()).or_insert(0.0) += expense.amount;
        for split in &expense.split_details {
            *net.entry(split.member_id.clone()).or_insert(0.0) -= split.amount;
        }
    }

    net
}

/// Rounds to two decimals, half away from zero, without producing `-0.0`
pub fn round_balance(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

struct Party<'a> {
    member: &'a str,
    remaining: f64,
}

/// Greedy largest-first matching of debtors to creditors.
///
/// Every step settles at least one party, so at most
/// `creditors + debtors - 1` transfers are produced.
pub fn suggest_settlements(balances: &BTreeMap<String, f64>) -> Vec<Settlement> {
    let mut creditors: Vec<Party> = balances
        .iter()
        .filter(|(_, &balance)| balance > 0.0)
        .map(|(member, &balance)| Party {
            member,
            remaining: balance,
        })
        .collect();
    let mut debtors: Vec<Party> = balances
        .iter()
        .filter(|(_, &balance)| balance < 0.0)
        .map(|(member, &balance)| Party {
            member,
            remaining: -balance,
        })
        .collect();

    // Stable sorts keep member-id order among equal amounts
    creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));

    let mut settlements = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let transfer = debtors[i].remaining.min(creditors[j].remaining);
        let amount = round_balance(transfer);
        if amount > 0.0 {
            settlements.push(Settlement {
                from: debtors[i].member.to_string(),
                to: creditors[j].member.to_string(),
                amount,
            });
        }

        debtors[i].remaining -= transfer;
        creditors[j].remaining -= transfer;

        if debtors[i].remaining <= SETTLEMENT_EPSILON {
            i += 1;
        }
        if creditors[j].remaining <= SETTLEMENT_EPSILON {
            j += 1;
        }
    }

    settlements
}

/// Full pipeline: accumulate, round, then suggest settlements
pub fn compute_balances(expenses: &[Expense]) -> BalanceSheet {
    let balances: BTreeMap<String, f64> = net_balances(expenses)
        .into_iter()
        .map(|(member, balance)| (member, round_balance(balance)))
        .collect();
    let settlements = suggest_settlements(&balances);

    debug!(
        "Computed balances for {} members from {} expenses, {} settlements suggested",
        balances.len(),
        expenses.len(),
        settlements.len()
    );

    BalanceSheet {
        balances,
        settlements,
    }
}
