use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

// ==============================================================================
// DIALYSIS PATIENTS
// ==============================================================================

/// Enrolment of a registered patient in the dialysis programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct DialysisPatient {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub start_date: NaiveDate,
    pub dry_weight: Option<f64>,
    pub vascular_access_type: Option<String>,
    pub sessions_per_week: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDialysisPatientRequest {
    pub patient_id: Uuid,
    pub start_date: NaiveDate,
    pub dry_weight: Option<f64>,
    pub vascular_access_type: Option<String>,
    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: i32,
    pub notes: Option<String>,
}

fn default_sessions_per_week() -> i32 {
    3
}

fn sessions_per_week_ok(value: i32) -> bool {
    (1..=7).contains(&value)
}

impl Validate for CreateDialysisPatientRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .optional_positive_f64("dryWeight", self.dry_weight)
            .check(sessions_per_week_ok(self.sessions_per_week), "sessionsPerWeek", "must be between 1 and 7")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDialysisPatientRequest {
    pub start_date: Option<NaiveDate>,
    pub dry_weight: Option<f64>,
    pub vascular_access_type: Option<String>,
    pub sessions_per_week: Option<i32>,
    pub notes: Option<String>,
}

impl Validate for UpdateDialysisPatientRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .optional_positive_f64("dryWeight", self.dry_weight)
            .check(
                self.sessions_per_week.map_or(true, sessions_per_week_ok),
                "sessionsPerWeek",
                "must be between 1 and 7",
            )
            .finish()
    }
}

// ==============================================================================
// PROTOCOLS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct DialysisProtocol {
    pub id: Uuid,
    pub dialysis_patient_id: Uuid,
    pub dialysate_flow_rate: Option<i32>,
    pub blood_flow_rate: Option<i32>,
    pub session_duration_minutes: i32,
    pub anticoagulation: Option<String>,
    pub dialyzer_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProtocolRequest {
    pub dialysate_flow_rate: Option<i32>,
    pub blood_flow_rate: Option<i32>,
    pub session_duration_minutes: i32,
    pub anticoagulation: Option<String>,
    pub dialyzer_type: Option<String>,
}

impl Validate for CreateProtocolRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .positive("sessionDurationMinutes", self.session_duration_minutes as i64)
            .check(self.dialysate_flow_rate.map_or(true, |r| r > 0), "dialysateFlowRate", "must be positive")
            .check(self.blood_flow_rate.map_or(true, |r| r > 0), "bloodFlowRate", "must be positive")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProtocolRequest {
    pub dialysate_flow_rate: Option<i32>,
    pub blood_flow_rate: Option<i32>,
    pub session_duration_minutes: Option<i32>,
    pub anticoagulation: Option<String>,
    pub dialyzer_type: Option<String>,
}

impl Validate for UpdateProtocolRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .check(self.session_duration_minutes.map_or(true, |m| m > 0), "sessionDurationMinutes", "must be positive")
            .check(self.dialysate_flow_rate.map_or(true, |r| r > 0), "dialysateFlowRate", "must be positive")
            .check(self.blood_flow_rate.map_or(true, |r| r > 0), "bloodFlowRate", "must be positive")
            .finish()
    }
}

// ==============================================================================
// SESSIONS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct DialysisSession {
    pub id: Uuid,
    pub dialysis_patient_id: Uuid,
    pub machine_id: Option<Uuid>,
    pub doctor_id: Uuid,
    pub session_date: DateTime<Utc>,
    pub pre_weight: Option<f64>,
    pub post_weight: Option<f64>,
    pub ultrafiltration_volume: Option<f64>,
    pub complications: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DialysisSession {
    pub fn weight_loss(&self) -> Option<f64> {
        match (self.pre_weight, self.post_weight) {
            (Some(pre), Some(post)) => Some(((pre - post) * 100.0).round() / 100.0),
            _ => None,
        }
    }

    /// Compact record merged into the medical file under `lastDialysisSession`.
    pub fn summary(&self) -> Value {
        json!({
            "sessionId": self.id,
            "sessionDate": self.session_date.to_rfc3339(),
            "machineId": self.machine_id,
            "doctorId": self.doctor_id,
            "preWeight": self.pre_weight,
            "postWeight": self.post_weight,
            "weightLoss": self.weight_loss(),
            "ultrafiltrationVolume": self.ultrafiltration_volume,
            "complications": self.complications
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub dialysis_patient_id: Uuid,
    pub machine_id: Option<Uuid>,
    /// Defaults to the calling doctor.
    pub doctor_id: Option<Uuid>,
    pub session_date: DateTime<Utc>,
    pub pre_weight: Option<f64>,
    pub post_weight: Option<f64>,
    pub ultrafiltration_volume: Option<f64>,
    pub complications: Option<String>,
    pub notes: Option<String>,
}

impl Validate for CreateSessionRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .optional_positive_f64("preWeight", self.pre_weight)
            .optional_positive_f64("postWeight", self.post_weight)
            .check(
                self.ultrafiltration_volume.map_or(true, |v| v >= 0.0),
                "ultrafiltrationVolume",
                "cannot be negative",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub dialysis_patient_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(pre: Option<f64>, post: Option<f64>) -> DialysisSession {
        DialysisSession {
            id: Uuid::new_v4(),
            dialysis_patient_id: Uuid::new_v4(),
            machine_id: None,
            doctor_id: Uuid::new_v4(),
            session_date: Utc::now(),
            pre_weight: pre,
            post_weight: post,
            ultrafiltration_volume: Some(2.4),
            complications: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn weight_loss_needs_both_weights() {
        assert_eq!(session(Some(72.5), Some(70.1)).weight_loss(), Some(2.4));
        assert_eq!(session(Some(72.5), None).weight_loss(), None);
    }

    #[test]
    fn summary_is_camel_case() {
        let summary = session(Some(80.0), Some(78.0)).summary();
        assert_eq!(summary["weightLoss"], 2.0);
        assert_eq!(summary["ultrafiltrationVolume"], 2.4);
        assert!(summary.get("sessionId").is_some());
    }

    #[test]
    fn sessions_per_week_is_bounded() {
        let request = CreateDialysisPatientRequest {
            patient_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            dry_weight: Some(68.0),
            vascular_access_type: Some("AV fistula".to_string()),
            sessions_per_week: 9,
            notes: None,
        };
        assert!(request.validate().is_err());
    }
}
