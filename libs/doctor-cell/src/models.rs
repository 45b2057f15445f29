use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth_cell::User;
use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

/// A doctor is a staff user with clinical details; `id` equals the user id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(flatten)]
    pub user: User,
    pub specialization: String,
    pub license_number: String,
    pub is_available: bool,
}

impl Doctor {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn full_name(&self) -> String {
        format!("Dr. {}", self.user.full_name())
    }
}

/// `doctors` row with its `users` profile embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRow {
    pub id: Uuid,
    pub specialization: String,
    pub license_number: String,
    pub is_available: bool,
    pub user: User,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            user: row.user,
            specialization: row.specialization,
            license_number: row.license_number,
            is_available: row.is_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub license_number: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Validate for CreateDoctorRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .email("email", &self.email)
            .min_len("password", &self.password, 8)
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .optional_phone("phone", self.phone.as_deref())
            .required("specialization", &self.specialization)
            .required("licenseNumber", &self.license_number)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub is_available: Option<bool>,
}

impl UpdateDoctorRequest {
    pub fn touches_profile(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.phone.is_some()
    }
}

impl Validate for UpdateDoctorRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(specialization) = &self.specialization {
            v.required("specialization", specialization);
        }
        if let Some(license_number) = &self.license_number {
            v.required("licenseNumber", license_number);
        }
        v.optional_phone("phone", self.phone.as_deref()).finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorQuery {
    pub specialization: Option<String>,
}
