use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub app_metadata: Option<serde_json::Value>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

impl JwtClaims {
    /// Application role, read from `app_metadata.role` first and then
    /// `user_metadata.role`. The top-level `role` claim is the database role
    /// of the hosted service ("authenticated") and is ignored here.
    pub fn app_role(&self) -> Option<Role> {
        [&self.app_metadata, &self.user_metadata]
            .into_iter()
            .flatten()
            .filter_map(|meta| meta.get("role").and_then(|r| r.as_str()))
            .find_map(|r| r.parse().ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Receptionist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Receptionist => "receptionist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "receptionist" => Ok(Role::Receptionist),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Set of roles allowed to reach a route.
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

impl AllowedRoles {
    pub const ADMIN: AllowedRoles = AllowedRoles(&[Role::Admin]);
    pub const STAFF: AllowedRoles = AllowedRoles(&[Role::Admin, Role::Doctor, Role::Receptionist]);
    pub const CLINICAL: AllowedRoles = AllowedRoles(&[Role::Admin, Role::Doctor]);
    pub const FRONT_DESK: AllowedRoles = AllowedRoles(&[Role::Admin, Role::Receptionist]);
    pub const BOOKING: AllowedRoles = AllowedRoles::STAFF;

    pub fn permits(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Caller identity attached to the request by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
}
