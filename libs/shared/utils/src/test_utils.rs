use std::sync::Arc;
use axum::{body::Body, http::Request, response::Response};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-role-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_role_key: self.supabase_service_role_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            port: 3000,
            cors_origin: "http://localhost:5173".to_string(),
            cookie_secure: false,
            auth_cookie_name: "access_token".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn receptionist(email: &str) -> Self {
        Self::new(email, Role::Receptionist)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: Some(self.email.clone()),
            role: self.role,
            token: "test-token".to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// Signed token for this user using the default test secret.
    pub fn token(&self) -> String {
        JwtTestUtils::create_test_token(self, TEST_JWT_SECRET, Some(24))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": "authenticated",
            "app_metadata": { "role": user.role.as_str() },
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::sign(payload, secret)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_token_without_role(secret: &str) -> String {
        Self::sign(json!({
            "sub": Uuid::new_v4(),
            "email": "nobody@example.com",
            "role": "authenticated",
            "exp": (Utc::now() + Duration::hours(1)).timestamp()
        }), secret)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    fn sign(payload: Value, secret: &str) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }
}

/// Request builder shortcuts for router tests.
pub struct TestRequest;

impl TestRequest {
    pub fn get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    pub fn delete(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    pub fn json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Storage rows (snake_case) as the hosted database returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_row(user_id: &str, role: &str) -> Value {
        json!({
            "id": user_id,
            "email": format!("{}@example.com", role),
            "first_name": "Test",
            "last_name": "User",
            "phone": "+213555000111",
            "role": role,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row(user_id: &str) -> Value {
        json!({
            "id": user_id,
            "specialization": "Nephrology",
            "license_number": "MD123456",
            "is_available": true,
            "created_at": "2024-01-01T00:00:00Z",
            "user": Self::user_row(user_id, "doctor")
        })
    }

    pub fn receptionist_row(user_id: &str) -> Value {
        json!({
            "id": user_id,
            "shift": "morning",
            "created_at": "2024-01-01T00:00:00Z",
            "user": Self::user_row(user_id, "receptionist")
        })
    }

    pub fn patient_row(patient_id: &str, medical_file_id: Option<&str>) -> Value {
        json!({
            "id": patient_id,
            "first_name": "Amina",
            "last_name": "Benali",
            "date_of_birth": "1980-05-12",
            "gender": "female",
            "phone": "+213555123456",
            "email": "amina@example.com",
            "address": "12 Rue Didouche Mourad",
            "medical_file_id": medical_file_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn room_row(room_id: &str, is_available: bool) -> Value {
        json!({
            "id": room_id,
            "room_number": "D-101",
            "capacity": 4,
            "type": "dialysis",
            "is_available": is_available,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn machine_row(machine_id: &str, status: &str) -> Value {
        json!({
            "id": machine_id,
            "serial_number": "FMC-5008-001",
            "model": "Fresenius 5008S",
            "status": status,
            "room_id": null,
            "last_maintenance_date": "2024-03-01",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(appointment_id: &str, patient_id: &str, doctor_id: &str, status: &str) -> Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "room_id": null,
            "created_by_reception_id": null,
            "created_by_doctor_id": doctor_id,
            "appointment_date": "2024-12-25T10:00:00Z",
            "estimated_duration_in_minutes": 30,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn medical_file_row(file_id: &str, patient_id: &str, doctor_id: &str, data: Value) -> Value {
        json!({
            "id": file_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "data": data,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn history_row(appointment_id: &str, data: Value) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "appointment_id": appointment_id,
            "appointment_data": data,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.database_key(), "test-service-role-key");
        assert!(!app_config.supabase_jwt_secret.is_empty());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::doctor("doc@example.com");
        assert_eq!(user.email, "doc@example.com");
        assert_eq!(user.role, Role::Doctor);

        let auth = user.to_auth_user();
        assert_eq!(auth.email, Some(user.email.clone()));
        assert_eq!(auth.role, Role::Doctor);
        assert_eq!(auth.id, user.id);
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::receptionist("desk@example.com");
        let token = JwtTestUtils::create_test_token(&user, "test-secret", Some(1));

        assert_eq!(token.split('.').count(), 3);
    }
}
