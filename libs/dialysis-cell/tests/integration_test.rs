use std::sync::Arc;
use axum::{http::StatusCode, Router};
use tower::ServiceExt;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path};

use dialysis_cell::{dialysis_routes, CreateSessionUseCase, DialysisService, DialysisState, SupabaseDialysisRepository};
use medical_file_cell::{MedicalFileService, SupabaseMedicalFileRepository};
use patient_cell::SupabasePatientRepository;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{response_json, MockSupabaseResponses, TestConfig, TestRequest, TestUser};

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let dialysis = Arc::new(SupabaseDialysisRepository::new(supabase.clone()));
    let patients = Arc::new(SupabasePatientRepository::new(supabase.clone()));
    let medical_files = Arc::new(MedicalFileService::new(
        Arc::new(SupabaseMedicalFileRepository::new(supabase)),
        patients.clone(),
    ));

    dialysis_routes(Arc::new(DialysisState {
        config: Arc::new(config),
        dialysis: DialysisService::new(dialysis.clone(), dialysis.clone(), dialysis.clone(), patients),
        create_session: CreateSessionUseCase::new(dialysis.clone(), dialysis, medical_files),
    }))
}

fn dialysis_patient_row(id: &str, patient_id: &str) -> Value {
    json!({
        "id": id,
        "patient_id": patient_id,
        "start_date": "2024-01-08",
        "dry_weight": 70.0,
        "vascular_access_type": "AV fistula",
        "sessions_per_week": 3,
        "notes": null,
        "created_at": "2024-01-08T00:00:00Z",
        "updated_at": null
    })
}

fn session_row(id: &str, dialysis_patient_id: &str, doctor_id: &str) -> Value {
    json!({
        "id": id,
        "dialysis_patient_id": dialysis_patient_id,
        "machine_id": null,
        "doctor_id": doctor_id,
        "session_date": "2024-12-25T08:00:00Z",
        "pre_weight": 72.5,
        "post_weight": 70.1,
        "ultrafiltration_volume": 2.4,
        "complications": null,
        "notes": null,
        "created_at": "2024-12-25T12:00:00Z"
    })
}

fn session_body(dialysis_patient_id: &str) -> Value {
    json!({
        "dialysisPatientId": dialysis_patient_id,
        "sessionDate": "2024-12-25T08:00:00Z",
        "preWeight": 72.5,
        "postWeight": 70.1,
        "ultrafiltrationVolume": 2.4
    })
}

#[tokio::test]
async fn test_session_summary_is_merged_into_medical_file() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");
    let dialysis_patient_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();
    let file_id = Uuid::new_v4().to_string();
    let doctor_id = doctor.id.to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/dialysis_patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            dialysis_patient_row(&dialysis_patient_id, &patient_id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/dialysis_sessions"))
        .and(body_partial_json(json!({ "doctor_id": doctor_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            session_row(&Uuid::new_v4().to_string(), &dialysis_patient_id, &doctor_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&file_id, &patient_id, &doctor_id, json!({ "bp": "120/80" }))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/medical_files"))
        .and(body_partial_json(json!({
            "data": {
                "bp": "120/80",
                "lastDialysisSession": { "preWeight": 72.5, "postWeight": 70.1 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&file_id, &patient_id, &doctor_id, json!({}))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/sessions", &doctor.token(), session_body(&dialysis_patient_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_medical_file_failure_does_not_fail_session() {
    let mock_server = MockServer::start().await;
    let dialysis_patient_id = Uuid::new_v4().to_string();
    let session_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/dialysis_patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            dialysis_patient_row(&dialysis_patient_id, &Uuid::new_v4().to_string())
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/dialysis_sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            session_row(&session_id, &dialysis_patient_id, &Uuid::new_v4().to_string())
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("connection reset", "XX000")
        ))
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/sessions", &token, session_body(&dialysis_patient_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], session_id);
}

#[tokio::test]
async fn test_session_for_unknown_enrolment_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/dialysis_patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/dialysis_sessions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/sessions", &token, session_body(&Uuid::new_v4().to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_receptionists_have_no_dialysis_access() {
    let mock_server = MockServer::start().await;

    let token = TestUser::receptionist("desk@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get("/patients", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
