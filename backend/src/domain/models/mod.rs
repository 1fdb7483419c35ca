pub mod balance;
pub mod expense;
pub mod group;
