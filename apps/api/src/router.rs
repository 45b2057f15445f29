use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use auth_cell::{auth_routes, user_routes};
use dialysis_cell::dialysis_routes;
use doctor_cell::doctor_routes;
use facility_cell::{machine_routes, room_routes};
use medical_file_cell::medical_file_routes;
use patient_cell::patient_routes;
use prescription_cell::prescription_routes;
use receptionist_cell::receptionist_routes;
use stats_cell::stats_routes;

use crate::container::AppContainer;

pub fn create_router(container: &AppContainer) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/auth", auth_routes(container.auth.clone()))
        .nest("/users", user_routes(container.auth.clone()))
        .nest("/doctors", doctor_routes(container.doctors.clone()))
        .nest("/receptionists", receptionist_routes(container.receptionists.clone()))
        .nest("/patients", patient_routes(container.patients.clone()))
        .nest("/medical-files", medical_file_routes(container.medical_files.clone()))
        .nest("/rooms", room_routes(container.facility.clone()))
        .nest("/machines", machine_routes(container.facility.clone()))
        .nest("/appointments", appointment_routes(container.appointments.clone()))
        .nest("/dialysis", dialysis_routes(container.dialysis.clone()))
        .nest("/prescriptions", prescription_routes(container.prescriptions.clone()))
        .nest("/stats", stats_routes(container.stats.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use shared_utils::test_utils::{TestConfig, TestRequest, TestUser};

    fn app() -> Router {
        let config = TestConfig::with_supabase_url("http://127.0.0.1:9").to_app_config();
        create_router(&AppContainer::build(config))
    }

    #[tokio::test]
    async fn root_answers_without_auth() {
        let response = app()
            .oneshot(axum::http::Request::get("/").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn nested_routes_require_a_token() {
        let response = app()
            .oneshot(axum::http::Request::get("/patients").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_checks_apply_after_nesting() {
        let token = TestUser::doctor("doc@example.com").token();
        let response = app()
            .oneshot(TestRequest::get("/stats/summary", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
