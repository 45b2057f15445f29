use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::StatsState;

pub fn stats_routes(state: Arc<StatsState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/patients-per-day", get(handlers::patients_per_day))
        .route("/appointments-per-day", get(handlers::appointments_per_day))
        .route("/summary", get(handlers::get_summary))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
