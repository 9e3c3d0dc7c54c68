//! Data models shared by the parsing pipeline, aggregation and budgets.

pub mod budget;
pub mod config;
pub mod expense;
pub mod totals;
