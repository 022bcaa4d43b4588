//! Statistics API endpoints

use api_types::stats::{CategoryExpense, DateRange, Statistic};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, NaiveDate, Utc};
use engine::{CallerId, DateWindow, TransactionStore};

use crate::{ServerError, server::ServerState};

/// Parses a `YYYY-MM-DD` value, zero padding included.
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ServerError> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    well_formed
        .then(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| ServerError::InvalidInput(format!("invalid {field}: use YYYY-MM-DD")))
}

/// Builds the window from the query, defaulting `start_date` to 1970-01-01
/// and `end_date` to `today`.
fn parse_window(range: &DateRange, today: NaiveDate) -> Result<DateWindow, ServerError> {
    let start = match range.start_date.as_deref() {
        Some(value) => parse_date("start_date", value)?,
        None => DateTime::<Utc>::UNIX_EPOCH.date_naive(),
    };
    let end = match range.end_date.as_deref() {
        Some(value) => parse_date("end_date", value)?,
        None => today,
    };

    Ok(DateWindow::new(start, end))
}

fn window_from_query(
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<DateWindow, ServerError> {
    let Query(range) = query.map_err(|err| ServerError::InvalidInput(err.body_text()))?;
    parse_window(&range, Utc::now().date_naive())
}

/// Handle requests for the caller's income/expense totals
pub async fn get_statistics<S: TransactionStore + 'static>(
    Extension(caller): Extension<CallerId>,
    State(state): State<ServerState<S>>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<Statistic>, ServerError> {
    let window = window_from_query(query)?;

    let stats = state
        .bounded(state.engine.compute_statistics(caller, window))
        .await?;

    Ok(Json(Statistic {
        total_receitas: stats.total_income,
        total_despesas: stats.total_expense,
        saldo: stats.balance,
    }))
}

/// Handle requests for the caller's expenses per category and month
pub async fn get_category_expenses<S: TransactionStore + 'static>(
    Extension(caller): Extension<CallerId>,
    State(state): State<ServerState<S>>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<Vec<CategoryExpense>>, ServerError> {
    let window = window_from_query(query)?;

    let groups = state
        .bounded(state.engine.compute_category_expenses(caller, window))
        .await?;

    Ok(Json(
        groups
            .into_iter()
            .map(|group| CategoryExpense {
                category: group.category,
                year_month: group.year_month,
                avg_expense: group.average,
                total_expense: group.total,
                count: group.count,
            })
            .collect(),
    ))
}
