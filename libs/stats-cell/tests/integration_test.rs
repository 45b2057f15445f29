use std::sync::Arc;
use axum::{http::StatusCode, Router};
use chrono::{Datelike, Utc};
use tower::ServiceExt;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use facility_cell::SupabaseMachineRepository;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{response_json, TestConfig, TestRequest, TestUser};
use stats_cell::{stats_routes, GetDashboardStatsUseCase, StatsService, StatsState, SupabaseStatsRepository};

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let stats = Arc::new(SupabaseStatsRepository::new(supabase.clone()));

    stats_routes(Arc::new(StatsState {
        config: Arc::new(config),
        dashboard: GetDashboardStatsUseCase::new(stats.clone(), Arc::new(SupabaseMachineRepository::new(supabase))),
        stats: StatsService::new(stats),
    }))
}

async fn mount_count(mock_server: &MockServer, table: &str, total: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .and(query_param("select", "id"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-range", format!("0-0/{}", total).as_str())
                .set_body_json(json!([])),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_summary_totals() {
    let mock_server = MockServer::start().await;
    for (table, total) in [
        ("patients", 40),
        ("doctors", 5),
        ("receptionists", 3),
        ("appointments", 120),
        ("rooms", 8),
        ("machines", 14),
    ] {
        mount_count(&mock_server, table, total).await;
    }

    let token = TestUser::admin("admin@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get("/summary", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"], json!({
        "patients": 40,
        "doctors": 5,
        "receptionists": 3,
        "appointments": 120,
        "rooms": 8,
        "machines": 14
    }));
}

#[tokio::test]
async fn test_patients_per_day_covers_current_week() {
    let mock_server = MockServer::start().await;
    let now = Utc::now();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("select", "created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "created_at": now.to_rfc3339() },
            { "created_at": now.to_rfc3339() }
        ])))
        .mount(&mock_server)
        .await;

    let token = TestUser::admin("admin@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get("/patients-per-day", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let days = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(days.len(), 7);

    let today_index = now.date_naive().weekday().num_days_from_monday() as usize;
    assert_eq!(days[today_index]["date"], now.format("%Y-%m-%d").to_string());
    assert_eq!(days[today_index]["count"], 2);
    let total: i64 = days.iter().filter_map(|d| d["count"].as_i64()).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_dashboard_combines_sources() {
    let mock_server = MockServer::start().await;
    let now = Utc::now();

    mount_count(&mock_server, "patients", 40).await;
    mount_count(&mock_server, "doctors", 5).await;
    mount_count(&mock_server, "receptionists", 3).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("select", "status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "SCHEDULED" },
            { "status": "COMPLETED" },
            { "status": "NO_SHOW" }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("select", "appointment_date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "appointment_date": now.to_rfc3339() }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("select", "created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/machines"))
        .and(query_param("select", "status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "AVAILABLE" },
            { "status": "MAINTENANCE" }
        ])))
        .mount(&mock_server)
        .await;

    let token = TestUser::admin("admin@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get("/", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["totalPatients"], 40);
    assert_eq!(data["todayAppointments"]["total"], 3);
    assert_eq!(data["todayAppointments"]["noShow"], 1);
    assert_eq!(data["machines"]["maintenance"], 1);
    assert_eq!(data["staff"], json!({ "doctors": 5, "receptionists": 3 }));
    assert_eq!(data["week"]["appointments"].as_array().map(|d| d.len()), Some(7));
    assert_eq!(data["week"]["patients"].as_array().map(|d| d.len()), Some(7));
}

#[tokio::test]
async fn test_stats_are_admin_only() {
    let mock_server = MockServer::start().await;

    let token = TestUser::doctor("doc@example.com").token();
    let response = create_test_app(&mock_server)
        .oneshot(TestRequest::get("/summary", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
