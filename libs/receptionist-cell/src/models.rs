use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth_cell::User;
use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receptionist {
    #[serde(flatten)]
    pub user: User,
    pub shift: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceptionistRow {
    pub id: Uuid,
    pub shift: Option<String>,
    pub user: User,
}

impl From<ReceptionistRow> for Receptionist {
    fn from(row: ReceptionistRow) -> Self {
        Receptionist {
            user: row.user,
            shift: row.shift,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionistRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub shift: Option<String>,
}

impl Validate for CreateReceptionistRequest {
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
pub struct UpdateReceptionistRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub shift: Option<String>,
}

impl UpdateReceptionistRequest {
    pub fn touches_profile(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.phone.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceptionistQuery {
    pub shift: Option<String>,
}
