use std::sync::Arc;
use axum::{http::StatusCode, Router};
use tower::ServiceExt;
use serde_json::json;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use medical_file_cell::{medical_file_routes, MedicalFileService, MedicalFileState, SupabaseMedicalFileRepository};
use patient_cell::SupabasePatientRepository;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{response_json, MockSupabaseResponses, TestConfig, TestRequest, TestUser};

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let service = MedicalFileService::new(
        Arc::new(SupabaseMedicalFileRepository::new(supabase.clone())),
        Arc::new(SupabasePatientRepository::new(supabase)),
    );
    medical_file_routes(Arc::new(MedicalFileState {
        config: Arc::new(config),
        files: Arc::new(service),
    }))
}

#[tokio::test]
async fn test_update_shallow_merges_data() {
    let mock_server = MockServer::start().await;
    let file_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .and(query_param("id", format!("eq.{}", file_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&file_id, &patient_id, &doctor_id, json!({
                "bp": "120/80",
                "labs": { "urea": 40, "creatinine": 9.1 }
            }))
        ])))
        .mount(&mock_server)
        .await;

    let merged = json!({ "bp": "120/80", "labs": { "urea": 35 }, "hr": 72 });
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/medical_files"))
        .and(body_partial_json(json!({ "doctor_id": doctor_id, "data": merged })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&file_id, &patient_id, &doctor_id, merged.clone())
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let token = TestUser::doctor("doc@example.com").token();
    let response = app
        .oneshot(TestRequest::json("PUT", &format!("/{}", file_id), &token, json!({
            "doctorId": doctor_id,
            "data": { "labs": { "urea": 35 }, "hr": 72 }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["data"], merged);
}

#[tokio::test]
async fn test_second_file_for_patient_is_conflict() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&patient_id, Some(&Uuid::new_v4().to_string()))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&Uuid::new_v4().to_string(), &patient_id, &doctor_id, json!({}))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let token = TestUser::doctor("doc@example.com").token();
    let response = app
        .oneshot(TestRequest::json("POST", "/", &token, json!({
            "patientId": patient_id,
            "doctorId": doctor_id,
            "data": { "bp": "130/85" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_receptionists_cannot_read_medical_files() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);
    let token = TestUser::receptionist("desk@example.com").token();

    let response = app.oneshot(TestRequest::get("/", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_object_data_is_rejected() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);
    let token = TestUser::doctor("doc@example.com").token();

    let response = app
        .oneshot(TestRequest::json("PUT", &format!("/{}", Uuid::new_v4()), &token, json!({
            "doctorId": Uuid::new_v4(),
            "data": [1, 2, 3]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn create_service(mock_server: &MockServer) -> MedicalFileService {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    MedicalFileService::new(
        Arc::new(SupabaseMedicalFileRepository::new(supabase.clone())),
        Arc::new(SupabasePatientRepository::new(supabase)),
    )
}

#[tokio::test]
async fn test_merge_rejects_non_object_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = create_service(&mock_server)
        .merge_into_patient_file(Uuid::new_v4(), Uuid::new_v4(), json!("dry weight 70kg"))
        .await;

    assert!(matches!(result, Err(shared_models::AppError::Validation(_))));
}

#[tokio::test]
async fn test_first_merge_stores_payload_as_given() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let file_id = Uuid::new_v4().to_string();
    let payload = json!({ "lastDialysisSession": { "preWeight": 72.5 } });

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_files"))
        .and(body_partial_json(json!({ "data": payload })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::medical_file_row(&file_id, &patient_id.to_string(), &doctor_id.to_string(), payload.clone())
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&patient_id.to_string(), Some(&file_id))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = create_service(&mock_server)
        .merge_into_patient_file(patient_id, doctor_id, payload.clone())
        .await
        .unwrap();

    assert_eq!(file.data, payload);
}
