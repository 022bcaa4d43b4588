use crate::{CallerId, DateWindow, KindTotal, ResultEngine, TransactionKind, TransactionStore};

use super::super::Engine;

/// Income/expense totals of a caller over a window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinancialStats {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}

impl FinancialStats {
    fn from_totals(totals: impl IntoIterator<Item = KindTotal>) -> Self {
        let (total_income, total_expense) = totals.into_iter().fold(
            (0.0, 0.0),
            |(income, expense), item| match item.kind {
                TransactionKind::Income => (income + item.total, expense),
                TransactionKind::Expense => (income, expense + item.total),
            },
        );

        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

impl<S: TransactionStore> Engine<S> {
    /// Totals the caller's income and expenses dated inside `window`.
    ///
    /// Kinds with no rows count as zero. An empty window yields all zeros
    /// without querying the store.
    pub async fn compute_statistics(
        &self,
        caller: CallerId,
        window: DateWindow,
    ) -> ResultEngine<FinancialStats> {
        if window.is_empty() {
            tracing::debug!("statistics for user {caller}: empty window {window}");
            return Ok(FinancialStats::default());
        }

        tracing::debug!("computing statistics for user {caller} over {window}");
        let totals = self.store.totals_by_kind(caller, window).await?;
        let stats = FinancialStats::from_totals(totals);
        tracing::debug!(
            "user {caller}: income {:.2}, expense {:.2}, balance {:.2}",
            stats.total_income,
            stats.total_expense,
            stats.balance
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        EngineError,
        store::memory::{MemoryStore, row},
    };

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
    }

    const CALLER: CallerId = CallerId::new(1);

    #[tokio::test]
    async fn income_minus_expense() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "income", "salary", "2023-03-10", 1000.0),
            row(1, "expense", "rent", "2023-03-15", 400.0),
        ]));

        let stats = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(
            stats,
            FinancialStats {
                total_income: 1000.0,
                total_expense: 400.0,
                balance: 600.0,
            }
        );
    }

    #[tokio::test]
    async fn aliases_of_a_kind_accumulate() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "income", "salary", "2023-03-01", 100.0),
            row(1, "Receita", "bonus", "2023-03-02", 50.0),
            row(1, "despesa", "food", "2023-03-03", 20.0),
            row(1, "EXPENSE", "food", "2023-03-04", 5.0),
        ]));

        let stats = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(stats.total_income, 150.0);
        assert_eq!(stats.total_expense, 25.0);
        assert_eq!(stats.balance, 125.0);
    }

    #[tokio::test]
    async fn no_expenses_means_balance_equals_income() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "receita", "salary", "2023-05-01", 321.5),
            row(1, "transfer", "savings", "2023-05-02", 99.0),
        ]));

        let stats = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(stats.total_expense, 0.0);
        assert_eq!(stats.balance, stats.total_income);
        assert_eq!(stats.total_income, 321.5);
    }

    #[tokio::test]
    async fn negative_amounts_keep_their_kind() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "income", "refund", "2023-05-01", -10.0),
            row(1, "expense", "rent", "2023-05-02", -30.0),
        ]));

        let stats = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(stats.total_income, -10.0);
        assert_eq!(stats.total_expense, -30.0);
        assert_eq!(stats.balance, 20.0);
    }

    #[tokio::test]
    async fn reversed_window_is_zero_without_querying() {
        let store = MemoryStore::new(vec![row(1, "income", "salary", "2023-03-10", 1000.0)]);
        let engine = Engine::with_store(store);

        let stats = engine
            .compute_statistics(CALLER, window("2023-12-31", "2023-01-01"))
            .await
            .unwrap();

        assert_eq!(stats, FinancialStats::default());
        assert_eq!(engine.store().queries(), 0);
    }

    #[tokio::test]
    async fn other_callers_and_dates_are_excluded() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "income", "salary", "2023-01-01", 10.0),
            row(1, "income", "salary", "2023-01-31", 20.0),
            row(1, "income", "salary", "2022-12-31", 1000.0),
            row(1, "income", "salary", "2023-02-01", 1000.0),
            row(2, "income", "salary", "2023-01-15", 1000.0),
        ]));

        let stats = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-01-31"))
            .await
            .unwrap();

        assert_eq!(stats.total_income, 30.0);
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "income", "salary", "2023-03-10", 1000.0),
            row(1, "despesa", "rent", "2023-03-15", 400.0),
        ]));
        let window = window("2023-01-01", "2023-12-31");

        let first = engine.compute_statistics(CALLER, window).await.unwrap();
        let second = engine.compute_statistics(CALLER, window).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let engine = Engine::with_store(MemoryStore::failing());

        let err = engine
            .compute_statistics(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::StoreUnavailable(_)));
    }
}
