pub mod dashboard;
pub mod header;
pub mod search;
pub mod stock_table;
