use std::collections::BTreeMap;

/// Suggested transfer: `from` pays `to` the given amount
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Rounded net balance per member plus the transfers that would clear them.
/// Derived on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceSheet {
    pub balances: BTreeMap<String, f64>,
    pub settlements: Vec<Settlement>,
}
