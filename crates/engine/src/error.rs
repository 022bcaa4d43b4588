//! The module contains the errors the engine can return.
//!
//! - [`StoreUnavailable`] the transaction store failed to answer a query.
//! - [`Configuration`] the engine was built without a usable store.
//!
//!  [`StoreUnavailable`]: EngineError::StoreUnavailable
//!  [`Configuration`]: EngineError::Configuration
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        Self::StoreUnavailable(value.to_string())
    }
}
