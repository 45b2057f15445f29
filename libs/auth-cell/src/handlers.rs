use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, TokenResponse};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::resolve_token;
use shared_utils::jwt::validate_token as verify_jwt;

use crate::models::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest, User, UserQuery};
use crate::services::{AuthService, UserService};

pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub users: UserService,
}

fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.auth_cookie_name.clone(), token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

// ==============================================================================
// AUTH HANDLERS
// ==============================================================================

pub async fn login(
    State(state): State<Arc<AuthState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    let outcome = state.auth.login(request).await?;

    let jar = jar.add(session_cookie(&state.config, outcome.access_token));

    Ok((jar, ApiResponse::ok("Login successful", outcome.response)))
}

pub async fn logout(
    State(state): State<Arc<AuthState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<Value>>) {
    state.auth.logout(&user).await;

    // Always sent, bearer callers included.
    let mut expired = session_cookie(&state.config, String::new());
    expired.make_removal();
    let jar = jar.add(expired);

    (jar, ApiResponse::message("Logged out"))
}

pub async fn me(
    State(state): State<Arc<AuthState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let profile = state.auth.me(&user).await?;
    Ok(ApiResponse::ok("Current user", profile))
}

pub async fn validate_token(
    State(state): State<Arc<AuthState>>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    debug!("Validating token");

    let token = resolve_token(&state.config, &jar, bearer.as_ref().map(|TypedHeader(auth)| auth))?;
    let user = verify_jwt(&token, &state.config.supabase_jwt_secret)?;

    Ok(ApiResponse::ok("Token is valid", TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

// ==============================================================================
// USER HANDLERS
// ==============================================================================

pub async fn list_users(
    State(state): State<Arc<AuthState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.users.list_users(query.role).await?;
    Ok(ApiResponse::ok("Users retrieved", users))
}

pub async fn get_user(
    State(state): State<Arc<AuthState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.users.get_user(user_id).await?;
    Ok(ApiResponse::ok("User retrieved", user))
}

pub async fn create_user(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.users.create_user(request).await?;
    Ok(ApiResponse::created("User created", user))
}

pub async fn update_user(
    State(state): State<Arc<AuthState>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.users.update_user(user_id, request).await?;
    Ok(ApiResponse::ok("User updated", user))
}

pub async fn delete_user(
    State(state): State<Arc<AuthState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.users.delete_user(user_id).await?;
    Ok(ApiResponse::message("User deleted"))
}
