use std::sync::Arc;

use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use shelf_core::access::{AccessDenied, AccessGate};
use shelf_core::token::Claims;

use crate::error::AccessError;

/// Middleware that runs the route's [`AccessGate`] against the `Authorization` header.
///
/// On success the verified [`Claims`] are stored in the request extensions for the
/// [`Authenticated`] extractor. On rejection the handler is never invoked.
pub async fn require_access(
    State(gate): State<Arc<AccessGate>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match gate.check(header) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(denied) => {
            tracing::debug!(
                code = denied.code(),
                path = %request.uri().path(),
                "Access denied: {denied}"
            );
            AccessError(denied).into_response()
        }
    }
}

/// Claims of the caller, as verified by [`require_access`].
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Authenticated)
            .ok_or(AccessError(AccessDenied::NotAuthenticated))
    }
}
