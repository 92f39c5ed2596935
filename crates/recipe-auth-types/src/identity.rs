//! Bearer-token identity extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::request::Parts;
use uuid::Uuid;

use recipe_core::error::AppError;

use crate::token::validate_token;

/// HMAC secret used to validate bearer tokens. Expose it from the router state
/// with a `FromRef` impl so [`Identity`] can be extracted.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller, taken from `Authorization: Bearer <token>`.
///
/// Rejects with 401 if the header is absent, not a bearer credential, or the
/// token fails validation (bad signature, expired, malformed subject).
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AppError;

    // Resolve synchronously and hand back a 'static future; see axum-core 0.5
    // `FromRequestParts` (returns `impl Future + Send`, not `async fn`).
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = TokenSecret::from_ref(state);
        let result = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AppError::Unauthorized)
            .and_then(|auth| {
                validate_token(auth.token(), &secret.0).map_err(|e| {
                    tracing::debug!(error = %e, "rejected bearer token");
                    AppError::Unauthorized
                })
            })
            .map(|info| Self {
                user_id: info.user_id,
            });

        async move { result }
    }
}
