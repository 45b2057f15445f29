use std::sync::Arc;
use axum::{http::StatusCode, Router};
use tower::ServiceExt;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use patient_cell::SupabasePatientRepository;
use prescription_cell::{prescription_routes, PrescriptionService, PrescriptionState, SupabasePrescriptionRepository};
use shared_database::SupabaseClient;
use shared_utils::test_utils::{response_json, MockSupabaseResponses, TestConfig, TestRequest, TestUser};

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));

    prescription_routes(Arc::new(PrescriptionState {
        config: Arc::new(config),
        prescriptions: PrescriptionService::new(
            Arc::new(SupabasePrescriptionRepository::new(supabase.clone())),
            Arc::new(SupabasePatientRepository::new(supabase)),
        ),
    }))
}

fn prescription_row(id: &str, patient_id: &str, doctor_id: &str) -> Value {
    json!({
        "id": id,
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "date": "2024-12-25",
        "notes": "Take after dialysis",
        "created_at": "2024-12-25T12:00:00Z"
    })
}

fn medication_row(prescription_id: &str, name: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "prescription_id": prescription_id,
        "name": name,
        "dosage": "500mg",
        "frequency": "twice daily",
        "duration_days": 30
    })
}

fn prescription_body(patient_id: &str) -> Value {
    json!({
        "patientId": patient_id,
        "notes": "Take after dialysis",
        "medications": [
            { "name": "Calcium carbonate", "dosage": "500mg", "frequency": "twice daily", "durationDays": 30 },
            { "name": "Erythropoietin", "dosage": "4000 IU", "frequency": "weekly" }
        ]
    })
}

async fn mount_patient(mock_server: &MockServer, patient_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(patient_id, None)
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_create_prescription_with_medications() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");
    let patient_id = Uuid::new_v4().to_string();
    let prescription_id = Uuid::new_v4().to_string();
    let doctor_id = doctor.id.to_string();

    mount_patient(&mock_server, &patient_id).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .and(body_partial_json(json!({ "patient_id": patient_id, "doctor_id": doctor_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            prescription_row(&prescription_id, &patient_id, &doctor_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medications"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            medication_row(&prescription_id, "Calcium carbonate"),
            medication_row(&prescription_id, "Erythropoietin")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/", &doctor.token(), prescription_body(&patient_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], prescription_id);
    assert_eq!(body["data"]["medications"].as_array().map(|m| m.len()), Some(2));
    assert_eq!(body["data"]["medications"][0]["durationDays"], 30);
}

#[tokio::test]
async fn test_failed_medication_batch_removes_prescription() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let prescription_id = Uuid::new_v4().to_string();

    mount_patient(&mock_server, &patient_id).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            prescription_row(&prescription_id, &patient_id, &Uuid::new_v4().to_string())
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("insert failed", "XX000")
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("id", format!("eq.{}", prescription_id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/", &token, prescription_body(&patient_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_prescription_without_medications_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/", &token, json!({
            "patientId": Uuid::new_v4(),
            "medications": []
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_medications_first() {
    let mock_server = MockServer::start().await;
    let prescription_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            prescription_row(&prescription_id, &Uuid::new_v4().to_string(), &Uuid::new_v4().to_string())
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/medications"))
        .and(query_param("prescription_id", format!("eq.{}", prescription_id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = TestUser::admin("admin@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::delete(&format!("/{}", prescription_id), &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_receptionists_cannot_read_prescriptions() {
    let mock_server = MockServer::start().await;

    let token = TestUser::receptionist("desk@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get(&format!("/patient/{}", Uuid::new_v4()), &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
