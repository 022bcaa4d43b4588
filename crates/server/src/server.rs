use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, middleware, routing::get};
use engine::{Engine, EngineError, ResultEngine, TransactionStore};

use crate::{ServerError, auth, statistics};

/// Deadline applied to engine calls when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ServerState<S> {
    pub engine: Arc<Engine<S>>,
    pub verifier: Arc<auth::TokenVerifier>,
    pub request_timeout: Duration,
}

impl<S> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            verifier: Arc::clone(&self.verifier),
            request_timeout: self.request_timeout,
        }
    }
}

impl<S: TransactionStore> ServerState<S> {
    pub fn new(engine: Engine<S>, verifier: auth::TokenVerifier) -> Self {
        Self {
            engine: Arc::new(engine),
            verifier: Arc::new(verifier),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Runs an engine call under the request deadline.
    ///
    /// When the deadline passes the call's future is dropped, which cancels
    /// the in-flight store query.
    pub(crate) async fn bounded<T>(
        &self,
        call: impl Future<Output = ResultEngine<T>>,
    ) -> Result<T, ServerError> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EngineError::StoreUnavailable(format!(
                "query exceeded the {:?} request deadline",
                self.request_timeout
            ))
            .into()),
        }
    }
}

pub fn router<S: TransactionStore + 'static>(state: ServerState<S>) -> Router {
    Router::new()
        .route("/statistics", get(statistics::get_statistics::<S>))
        .route("/statistics/", get(statistics::get_statistics::<S>))
        .route(
            "/statistics/category-expenses",
            get(statistics::get_category_expenses::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.verifier),
            auth::auth,
        ))
        .with_state(state)
}

pub async fn run_with_listener<S: TransactionStore + 'static>(
    state: ServerState<S>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    if !state.verifier.is_configured() {
        tracing::warn!("no signing secret configured: every request will fail");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
