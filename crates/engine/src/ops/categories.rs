use crate::{CallerId, DateWindow, ExpenseGroup, ResultEngine, TransactionStore};

use super::super::Engine;

/// Expenses of one category within one calendar month.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryExpense {
    pub category: String,
    /// Zero-padded `YYYY-MM`, so lexicographic order is chronological.
    pub year_month: String,
    pub average: f64,
    pub total: f64,
    /// Always at least 1.
    pub count: u64,
}

impl From<ExpenseGroup> for CategoryExpense {
    fn from(group: ExpenseGroup) -> Self {
        Self {
            average: group.total / group.count as f64,
            category: group.category,
            year_month: group.year_month,
            total: group.total,
            count: group.count,
        }
    }
}

impl<S: TransactionStore> Engine<S> {
    /// Breaks the caller's expenses inside `window` down by category and
    /// month.
    ///
    /// An empty window yields no groups without querying the store.
    pub async fn compute_category_expenses(
        &self,
        caller: CallerId,
        window: DateWindow,
    ) -> ResultEngine<Vec<CategoryExpense>> {
        if window.is_empty() {
            tracing::debug!("category expenses for user {caller}: empty window {window}");
            return Ok(Vec::new());
        }

        let groups: Vec<CategoryExpense> = self
            .store
            .expense_groups(caller, window)
            .await?
            .into_iter()
            .filter(|group| group.count > 0)
            .map(CategoryExpense::from)
            .collect();
        tracing::debug!(
            "user {caller}: {} category/month groups over {window}",
            groups.len()
        );

        Ok(groups)
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

    #[test]
    fn average_is_total_over_count() {
        let expense = CategoryExpense::from(ExpenseGroup {
            category: "food".to_string(),
            year_month: "2024-01".to_string(),
            total: 31.0,
            count: 3,
        });

        assert_eq!(expense.total, 31.0);
        assert_eq!(expense.count, 3);
        assert_eq!(expense.average, 31.0 / 3.0);
    }

    #[tokio::test]
    async fn same_category_same_month_is_one_group() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "expense", "food", "2023-03-01", 50.0),
            row(1, "expense", "food", "2023-03-20", 30.0),
        ]));

        let groups = engine
            .compute_category_expenses(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(
            groups,
            vec![CategoryExpense {
                category: "food".to_string(),
                year_month: "2023-03".to_string(),
                average: 40.0,
                total: 80.0,
                count: 2,
            }]
        );
    }

    #[tokio::test]
    async fn only_expense_labels_are_grouped() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "despesa", "food", "2023-03-01", 50.0),
            row(1, "expense", "food", "2023-03-20", 30.0),
            row(1, "income", "food", "2023-03-21", 1000.0),
            row(1, "receita", "salary", "2023-03-22", 1000.0),
        ]));

        let groups = engine
            .compute_category_expenses(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total, 80.0);
        assert_eq!(groups[0].count, 2);
    }

    #[tokio::test]
    async fn reversed_window_is_empty_without_querying() {
        let engine = Engine::with_store(MemoryStore::new(vec![row(
            1,
            "expense",
            "food",
            "2023-03-01",
            50.0,
        )]));

        let groups = engine
            .compute_category_expenses(CALLER, window("2023-03-31", "2023-03-01"))
            .await
            .unwrap();

        assert!(groups.is_empty());
        assert_eq!(engine.store().queries(), 0);
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let engine = Engine::with_store(MemoryStore::new(vec![
            row(1, "expense", "food", "2023-03-01", 50.0),
            row(1, "expense", "rent", "2023-04-01", 700.0),
        ]));
        let window = window("2023-01-01", "2023-12-31");

        let first = engine
            .compute_category_expenses(CALLER, window)
            .await
            .unwrap();
        let second = engine
            .compute_category_expenses(CALLER, window)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let engine = Engine::with_store(MemoryStore::failing());

        let err = engine
            .compute_category_expenses(CALLER, window("2023-01-01", "2023-12-31"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::StoreUnavailable(_)));
    }
}
