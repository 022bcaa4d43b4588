mod categories;
mod statistics;

pub use categories::CategoryExpense;
pub use statistics::FinancialStats;
