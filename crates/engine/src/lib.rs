//! Reporting engine over a user's transaction ledger.
//!
//! [`Engine`] answers two questions for a caller over an inclusive date
//! window: income/expense totals ([`Engine::compute_statistics`]) and a
//! per-category, per-month breakdown of expenses
//! ([`Engine::compute_category_expenses`]). It only reads, through the
//! [`TransactionStore`] it was built with.

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use ops::{CategoryExpense, FinancialStats};
pub use store::{DatabaseStore, ExpenseGroup, KindTotal, TransactionStore};
pub use transactions::TransactionKind;
pub use window::{CallerId, DateWindow};

mod error;
mod ops;
mod store;
pub mod transactions;
mod window;

pub type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine<S = DatabaseStore> {
    store: S,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S: TransactionStore> Engine<S> {
    /// Build an engine on top of any store implementation.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self.database.ok_or_else(|| {
            EngineError::Configuration("missing database connection".to_string())
        })?;
        Ok(Engine {
            store: DatabaseStore::new(database),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_without_database_is_a_configuration_error() {
        let err = Engine::builder().build().await.unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }
}
