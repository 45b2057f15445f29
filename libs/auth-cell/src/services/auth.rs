use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::{AppError, AuthError};
use shared_utils::validation::Validate;

use crate::models::{LoginRequest, LoginResponse, User};
use crate::repository::UserRepository;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

/// Outcome of a successful login: the profile plus the token to put in
/// the session cookie.
pub struct LoginOutcome {
    pub access_token: String,
    pub response: LoginResponse,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        request.validate()?;
        debug!("Login attempt for {}", request.email);

        let session = self.users.sign_in(&request.email, &request.password).await
            .map_err(|e| match e.status {
                Some(400) | Some(401) | Some(422) => AppError::from(AuthError::InvalidCredentials),
                _ => AppError::from(e),
            })?;

        let user_id = session.user.get("id")
            .and_then(|id| id.as_str())
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or_else(|| AppError::ExternalService("Auth provider returned no user id".to_string()))?;

        let user = self.users.find_by_id(user_id).await?
            .ok_or_else(|| AuthError::Unauthorized("No staff profile for this account".to_string()))?;

        info!("User {} logged in as {}", user.id, user.role);

        Ok(LoginOutcome {
            access_token: session.access_token,
            response: LoginResponse {
                user,
                expires_in: session.expires_in,
            },
        })
    }

    /// Revokes the session upstream. The cookie is cleared by the caller
    /// regardless of the outcome.
    pub async fn logout(&self, caller: &AuthUser) {
        if let Err(e) = self.users.sign_out(&caller.token).await {
            warn!("Upstream sign-out failed for {}: {}", caller.id, e);
        }
    }

    pub async fn me(&self, caller: &AuthUser) -> Result<User, AppError> {
        self.users.find_by_id(caller.id).await?
            .ok_or_else(|| AuthError::Unauthorized("No staff profile for this account".to_string()).into())
    }
}
