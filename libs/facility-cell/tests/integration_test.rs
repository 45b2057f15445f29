use std::sync::Arc;
use axum::{http::StatusCode, Router};
use tower::ServiceExt;
use serde_json::json;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use facility_cell::{
    machine_routes, room_routes, FacilityState, MachineService, RoomService,
    SupabaseMachineRepository, SupabaseRoomRepository,
};
use shared_database::SupabaseClient;
use shared_utils::test_utils::{response_json, MockSupabaseResponses, TestConfig, TestRequest, TestUser};

fn create_state(mock_server: &MockServer) -> Arc<FacilityState> {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    Arc::new(FacilityState {
        config: Arc::new(config),
        rooms: RoomService::new(Arc::new(SupabaseRoomRepository::new(supabase.clone()))),
        machines: MachineService::new(Arc::new(SupabaseMachineRepository::new(supabase))),
    })
}

fn rooms_app(mock_server: &MockServer) -> Router {
    room_routes(create_state(mock_server))
}

fn machines_app(mock_server: &MockServer) -> Router {
    machine_routes(create_state(mock_server))
}

#[tokio::test]
async fn test_get_room_twice_is_identical() {
    let mock_server = MockServer::start().await;
    let room_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/rooms"))
        .and(query_param("id", format!("eq.{}", room_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::room_row(&room_id, true)
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let token = TestUser::receptionist("desk@example.com").token();
    let first = rooms_app(&mock_server)
        .oneshot(TestRequest::get(&format!("/{}", room_id), &token))
        .await
        .unwrap();
    let second = rooms_app(&mock_server)
        .oneshot(TestRequest::get(&format!("/{}", room_id), &token))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    let first = response_json(first).await;
    let second = response_json(second).await;
    assert_eq!(first, second);
    assert_eq!(first["data"]["roomNumber"], "D-101");
    assert_eq!(first["data"]["type"], "dialysis");
}

#[tokio::test]
async fn test_room_creation_requires_admin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rooms"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = rooms_app(&mock_server)
        .oneshot(TestRequest::json("POST", "/", &token, json!({
            "roomNumber": "D-102",
            "capacity": 2,
            "type": "dialysis"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_availability_reports_overlap() {
    let mock_server = MockServer::start().await;
    let room_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::room_row(&room_id, true)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("room_id", format!("eq.{}", room_id)))
        .and(query_param("status", "eq.SCHEDULED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "appointment_date": "2024-12-25T10:00:00Z", "estimated_duration_in_minutes": 60 }
        ])))
        .mount(&mock_server)
        .await;

    let token = TestUser::admin("admin@example.com").token();
    let response = rooms_app(&mock_server)
        .oneshot(TestRequest::get(
            &format!("/{}/availability?start=2024-12-25T10:30:00Z&durationMinutes=30", room_id),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["isAvailable"], true);
    assert_eq!(body["data"]["hasConflict"], true);
}

#[tokio::test]
async fn test_machine_stats_counts_by_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/machines"))
        .and(query_param("select", "status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "AVAILABLE" },
            { "status": "AVAILABLE" },
            { "status": "IN_USE" },
            { "status": "MAINTENANCE" }
        ])))
        .mount(&mock_server)
        .await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = machines_app(&mock_server)
        .oneshot(TestRequest::get("/machine-stats", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"], json!({
        "total": 4,
        "available": 2,
        "inUse": 1,
        "maintenance": 1,
        "outOfService": 0
    }));
}

#[tokio::test]
async fn test_list_machines_filters_by_status() {
    let mock_server = MockServer::start().await;
    let machine_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/machines"))
        .and(query_param("status", "eq.IN_USE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::machine_row(&machine_id, "IN_USE")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = TestUser::receptionist("desk@example.com").token();
    let response = machines_app(&mock_server)
        .oneshot(TestRequest::get("/?status=IN_USE", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["status"], "IN_USE");
    assert_eq!(body["data"][0]["serialNumber"], "FMC-5008-001");
}
