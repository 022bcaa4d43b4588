//! Bearer token verification.
//!
//! Tokens are JWTs signed with HS256 and a single shared secret. The secret
//! is read once at startup; a verifier built without one rejects every
//! request with [`AuthError::Configuration`].

use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use engine::CallerId;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ServerError;

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("authentication misconfigured: {0}")]
    Configuration(String),
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the epoch.
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

pub struct TokenVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl TokenVerifier {
    /// An empty secret counts as no secret.
    pub fn new(secret: Option<&str>) -> Self {
        let key = secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));

        Self {
            key,
            validation: Validation::new(ALGORITHM),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Checks signature, algorithm and expiry, then returns the caller.
    pub fn verify(&self, token: &str) -> Result<CallerId, AuthError> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AuthError::Configuration("signing secret not set".to_string()))?;

        let data = decode::<Claims>(token, key, &self.validation).map_err(|err| {
            tracing::debug!("rejected token: {err}");
            AuthError::Unauthenticated("invalid or expired token".to_string())
        })?;

        data.claims
            .user_id
            .map(CallerId::new)
            .ok_or_else(|| AuthError::Unauthenticated("token has no user_id claim".to_string()))
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

/// Middleware resolving the caller from `Authorization: Bearer <token>`.
///
/// On success the [`CallerId`] is stored in the request extensions.
pub(crate) async fn auth(
    State(verifier): State<Arc<TokenVerifier>>,
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let TypedHeader(Authorization(bearer)) = auth_header.map_err(|_| {
        AuthError::Unauthenticated("missing or malformed Authorization header".to_string())
    })?;

    let caller = verifier.verify(bearer.token())?;

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
