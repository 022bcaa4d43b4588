use api_types::ErrorResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use auth::{AuthError, Claims, TokenVerifier};
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod server;
mod statistics;

pub mod types {
    pub mod stats {
        pub use api_types::stats::{CategoryExpense, DateRange, Statistic};
    }
}

/// Every failure a request can end with.
///
/// This is the only place where error kinds become status codes.
#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    InvalidInput(String),
}

const INTERNAL_ERROR: &str = "internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::StoreUnavailable(_) | EngineError::Configuration(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::StoreUnavailable(reason) => {
            tracing::error!("store error: {reason}");
        }
        EngineError::Configuration(reason) => {
            tracing::error!("engine misconfigured: {reason}");
        }
    }
    INTERNAL_ERROR.to_string()
}

fn status_and_message_for_auth_error(err: AuthError) -> (StatusCode, String) {
    match err {
        AuthError::Unauthenticated(reason) => (StatusCode::UNAUTHORIZED, reason),
        AuthError::Configuration(reason) => {
            tracing::error!("authentication misconfigured: {reason}");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(err),
            ),
            ServerError::Auth(err) => status_and_message_for_auth_error(err),
            ServerError::InvalidInput(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}
