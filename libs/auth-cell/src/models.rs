use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

/// Staff account profile stored in the `users` table. Doctors and
/// receptionists extend it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .email("email", &self.email)
            .min_len("password", &self.password, 8)
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .optional_phone("phone", self.phone.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(first_name) = &self.first_name {
            v.required("firstName", first_name);
        }
        if let Some(last_name) = &self.last_name {
            v.required("lastName", last_name);
        }
        v.optional_phone("phone", self.phone.as_deref()).finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .email("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_storage_row_and_writes_camel_case() {
        let row = json!({
            "id": "0b8f5c1e-7a0b-4f7e-9d38-0e7d5e4c2a11",
            "email": "doc@example.com",
            "first_name": "Karim",
            "last_name": "Haddad",
            "phone": null,
            "role": "doctor",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": null
        });

        let user: User = serde_json::from_value(row).unwrap();
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.full_name(), "Karim Haddad");

        let out = serde_json::to_value(&user).unwrap();
        assert_eq!(out["firstName"], "Karim");
        assert_eq!(out["role"], "doctor");
        assert!(out.get("first_name").is_none());
    }

    #[test]
    fn rejects_unknown_role() {
        let body = json!({
            "email": "x@example.com",
            "password": "password123",
            "firstName": "X",
            "lastName": "Y",
            "role": "janitor"
        });
        assert!(serde_json::from_value::<CreateUserRequest>(body).is_err());
    }

    #[test]
    fn create_request_validation() {
        let request = CreateUserRequest {
            email: "bad".to_string(),
            password: "short".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            phone: None,
            role: Role::Receptionist,
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(fields)) if fields.len() == 2));
    }
}
