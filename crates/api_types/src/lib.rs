use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod stats {
    use super::*;

    /// Query string accepted by the statistics endpoints.
    ///
    /// Both bounds are optional and must be formatted as `YYYY-MM-DD`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DateRange {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    /// Income/expense totals for the caller over a window.
    ///
    /// Field names are part of the public contract and kept in their
    /// historical (Portuguese) form.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_receitas: f64,
        pub total_despesas: f64,
        pub saldo: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CategoryExpense {
        pub category: String,
        /// Month bucket, `YYYY-MM`.
        pub year_month: String,
        pub avg_expense: f64,
        pub total_expense: f64,
        pub count: u64,
    }
}
