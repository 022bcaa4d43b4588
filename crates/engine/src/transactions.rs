//! Transaction ledger primitives.
//!
//! Rows are written by the ledger service; the engine only reads them. The
//! `type` column holds a free-text label which is classified through
//! [`TransactionKind::from_label`].

use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    const INCOME_LABELS: &'static [&'static str] = &["income", "receita"];
    const EXPENSE_LABELS: &'static [&'static str] = &["expense", "despesa"];

    /// Every lowercase label stored for this kind, including the legacy
    /// Portuguese ones.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Income => Self::INCOME_LABELS,
            Self::Expense => Self::EXPENSE_LABELS,
        }
    }

    /// Classifies a stored label, ignoring ASCII case.
    ///
    /// Returns `None` for labels outside the alias table.
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::Income, Self::Expense].into_iter().find(|kind| {
            kind.labels()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(label))
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: Date,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
