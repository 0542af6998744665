use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shelf_core::access::AccessGate;
use shelf_core::models::{AllowedRoles, Role};
use shelf_core::validation::{LoginAttempt, Registration};
use shelf_core::{AccountStore, AppError};

use crate::auth::{Authenticated, require_access};
use crate::dto::{
    AccountListResponse, AccountResponse, HealthResponse, LoginRequest, LoginResponse,
    ProfileResponse, RegisterRequest, UserSummary, VerifyTokenResponse,
};
use crate::error::{ApiError, error_response};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full router with all routes and middleware.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: AccountStore + 'static,
{
    let members = Arc::new(AccessGate::new(
        state.tokens.clone(),
        AllowedRoles::new([Role::Member, Role::Librarian]),
    ));
    let librarians = Arc::new(AccessGate::new(
        state.tokens.clone(),
        AllowedRoles::new([Role::Librarian]),
    ));

    let member_routes = Router::new()
        .route("/users/profile", get(profile::<S>))
        .route("/users/verify-token", get(verify_token))
        .route_layer(middleware::from_fn_with_state(members, require_access));

    let librarian_routes = Router::new()
        .route("/users/all", get(list_accounts::<S>))
        .route_layer(middleware::from_fn_with_state(librarians, require_access));

    let public = Router::new()
        .route("/users/register", post(register::<S>))
        .route("/users/login", post(login::<S>))
        .route("/health", get(health::<S>))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public
        .merge(member_routes)
        .merge(librarian_routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Registration & login
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation failed or username taken", body = crate::dto::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::dto::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn register<S>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + 'static,
{
    let Json(body) = payload?;
    let registration = Registration::parse(
        body.username.as_deref(),
        body.password.as_deref(),
        body.role.as_deref(),
    )?;

    let account = state.credentials.register(registration).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::dto::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn login<S>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError>
where
    S: AccountStore + 'static,
{
    let Json(body) = payload?;
    let attempt = LoginAttempt::parse(body.username.as_deref(), body.password.as_deref())?;

    let outcome = state.credentials.login(attempt).await?;
    let expires_at = outcome
        .token
        .claims
        .expires_at()
        .ok_or_else(|| AppError::Internal("Token expiry out of range".into()))?;

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        expires_at,
        user: UserSummary::from(&outcome.account),
    }))
}

// ---------------------------------------------------------------------------
// Authenticated users
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/users/profile",
    responses(
        (status = 200, description = "Current account", body = ProfileResponse),
        (status = 401, description = "Missing or expired token", body = crate::dto::ErrorResponse),
        (status = 403, description = "Invalid token", body = crate::dto::ErrorResponse),
        (status = 404, description = "Account no longer exists", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn profile<S>(
    State(state): State<Arc<AppState<S>>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<ProfileResponse>, ApiError>
where
    S: AccountStore + 'static,
{
    let id = claims
        .subject_id()
        .ok_or_else(|| AppError::Authentication("User not authenticated.".into()))?;

    let account = state.credentials.profile(id).await?;

    Ok(Json(ProfileResponse {
        user: AccountResponse::from(account),
    }))
}

#[utoipa::path(
    get,
    path = "/users/verify-token",
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 401, description = "Missing or expired token", body = crate::dto::ErrorResponse),
        (status = 403, description = "Invalid token", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn verify_token(
    Authenticated(claims): Authenticated,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let user_id = claims
        .subject_id()
        .ok_or_else(|| AppError::Authentication("User not authenticated.".into()))?;

    Ok(Json(VerifyTokenResponse {
        valid: true,
        expires_at: claims.expires_at(),
        user: UserSummary {
            user_id,
            username: claims.username,
            role: claims.role,
        },
    }))
}

// ---------------------------------------------------------------------------
// Librarians
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/users/all",
    responses(
        (status = 200, description = "All accounts, newest first", body = AccountListResponse),
        (status = 401, description = "Missing or expired token", body = crate::dto::ErrorResponse),
        (status = 403, description = "Invalid token or role is not librarian", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_accounts<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AccountListResponse>, ApiError>
where
    S: AccountStore + 'static,
{
    let users: Vec<AccountResponse> = state
        .credentials
        .list_accounts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(AccountListResponse {
        count: users.len(),
        users,
    }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health<S>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse
where
    S: AccountStore + 'static,
{
    let db_status = match state.credentials.store().health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "error"
        }
    };

    let status = if db_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if db_status == "ok" {
            "healthy"
        } else {
            "unhealthy"
        },
        database: db_status,
    };

    (status, Json(response))
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found", "Route not found.")
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "Method not allowed.",
    )
}
