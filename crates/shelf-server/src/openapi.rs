use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelf API",
        version = "0.1.0",
        description = "Library account service: registration, login and role-gated access."
    ),
    paths(
        crate::routes::register,
        crate::routes::login,
        crate::routes::profile,
        crate::routes::verify_token,
        crate::routes::list_accounts,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::RegisterRequest,
        crate::dto::LoginRequest,
        crate::dto::AccountResponse,
        crate::dto::UserSummary,
        crate::dto::LoginResponse,
        crate::dto::ProfileResponse,
        crate::dto::VerifyTokenResponse,
        crate::dto::AccountListResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "users", description = "Accounts, login and token checks"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the Bearer token security scheme to the OpenAPI document.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /users/login. Valid for 24 hours."))
                        .build(),
                ),
            );
        }
    }
}
