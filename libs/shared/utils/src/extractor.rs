use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{extract::CookieJar, TypedHeader};
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{AllowedRoles, AuthUser};
use shared_models::error::{AppError, AuthError};

use crate::jwt::validate_token;

/// Picks the access token from the HTTP-only cookie, falling back to the
/// `Authorization: Bearer` header.
pub fn resolve_token(
    config: &AppConfig,
    jar: &CookieJar,
    bearer: Option<&Authorization<Bearer>>,
) -> Result<String, AuthError> {
    if let Some(cookie) = jar.get(&config.auth_cookie_name) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    bearer
        .map(|auth| auth.token().to_string())
        .ok_or(AuthError::MissingToken)
}

// Authenticates the caller and stores an `AuthUser` in the request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = resolve_token(&config, &jar, bearer.as_ref().map(|TypedHeader(auth)| auth))?;

    let user = validate_token(&token, &config.supabase_jwt_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Rejects callers whose role is not in the route's allow-list. Must run
/// inside `auth_middleware`.
pub async fn require_roles(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = extract_user(&request)?;

    if !allowed.permits(user.role) {
        debug!("Role {} denied for {}", user.role, request.uri().path());
        return Err(AuthError::Forbidden(format!(
            "Role '{}' is not allowed to access this resource",
            user.role
        )).into());
    }

    Ok(next.run(request).await)
}

pub fn extract_user<B>(request: &axum::http::Request<B>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AuthError::Unauthorized("User not found in request extensions".to_string()).into())
}
