//! Read access to the transaction ledger.
//!
//! The engine never talks to the database directly: it is handed a
//! [`TransactionStore`] and only asks it the two questions the reports need.
//! Raw `type` labels are turned into [`TransactionKind`] here, so nothing past
//! this module deals with label strings.

use std::future::Future;

use sea_orm::{
    DatabaseBackend, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};

use crate::{CallerId, DateWindow, ResultEngine, TransactionKind, transactions};

/// Sum of the amounts of one kind.
#[derive(Clone, Debug, PartialEq)]
pub struct KindTotal {
    pub kind: TransactionKind,
    pub total: f64,
}

/// Expenses of one category within one `YYYY-MM` month.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseGroup {
    pub category: String,
    pub year_month: String,
    pub total: f64,
    /// Number of rows in the group, never zero.
    pub count: u64,
}

/// Query capability over the transactions of a single owner.
///
/// Implementations only read. Both queries are scoped to `owner` and to the
/// inclusive `window`.
pub trait TransactionStore: Send + Sync {
    /// Sum of amounts per kind.
    ///
    /// A kind may appear more than once when its rows carry different alias
    /// labels; callers are expected to accumulate.
    fn totals_by_kind(
        &self,
        owner: CallerId,
        window: DateWindow,
    ) -> impl Future<Output = ResultEngine<Vec<KindTotal>>> + Send;

    /// Expense sums grouped by category and month, ordered by month and
    /// then by category.
    fn expense_groups(
        &self,
        owner: CallerId,
        window: DateWindow,
    ) -> impl Future<Output = ResultEngine<Vec<ExpenseGroup>>> + Send;
}

/// [`TransactionStore`] backed by the `transactions` table.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

impl TransactionStore for DatabaseStore {
    async fn totals_by_kind(
        &self,
        owner: CallerId,
        window: DateWindow,
    ) -> ResultEngine<Vec<KindTotal>> {
        let rows: Vec<(String, Option<f64>)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Kind)
            .column_as(transactions::Column::Amount.sum(), "total")
            .filter(transactions::Column::UserId.eq(owner.get()))
            .filter(transactions::Column::Date.between(window.start(), window.end()))
            .group_by(transactions::Column::Kind)
            .into_tuple()
            .all(&self.database)
            .await?;

        let totals = rows
            .into_iter()
            .filter_map(|(label, total)| match TransactionKind::from_label(&label) {
                Some(kind) => Some(KindTotal {
                    kind,
                    total: total.unwrap_or_default(),
                }),
                None => {
                    tracing::debug!("ignoring transactions with unknown type label {label:?}");
                    None
                }
            })
            .collect();

        Ok(totals)
    }

    async fn expense_groups(
        &self,
        owner: CallerId,
        window: DateWindow,
    ) -> ResultEngine<Vec<ExpenseGroup>> {
        let labels = TransactionKind::Expense.labels().iter().copied();
        let year_month = year_month(self.database.get_database_backend());

        let rows: Vec<(String, String, Option<f64>, i64)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Category)
            .column_as(year_month.clone(), "year_month")
            .column_as(transactions::Column::Amount.sum(), "total")
            .column_as(transactions::Column::Id.count(), "count")
            .filter(transactions::Column::UserId.eq(owner.get()))
            .filter(transactions::Column::Date.between(window.start(), window.end()))
            .filter(Expr::expr(Func::lower(Expr::col(transactions::Column::Kind))).is_in(labels))
            .group_by(transactions::Column::Category)
            .group_by(year_month.clone())
            .order_by_asc(year_month)
            .order_by_asc(transactions::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, year_month, total, count)| ExpenseGroup {
                category,
                year_month,
                total: total.unwrap_or_default(),
                count: count.unsigned_abs(),
            })
            .collect())
    }
}

/// `YYYY-MM` of the `date` column in the backend's dialect.
fn year_month(backend: DatabaseBackend) -> SimpleExpr {
    match backend {
        DatabaseBackend::Postgres => Expr::cust(r#"TO_CHAR("date", 'YYYY-MM')"#),
        DatabaseBackend::MySql => Expr::cust("DATE_FORMAT(`date`, '%Y-%m')"),
        DatabaseBackend::Sqlite => Expr::cust(r#"strftime('%Y-%m', "date")"#),
    }
}
