pub mod balance_mapper;
pub mod expense_mapper;
pub mod group_mapper;
