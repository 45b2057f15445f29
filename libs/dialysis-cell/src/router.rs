use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::DialysisState;

pub fn dialysis_routes(state: Arc<DialysisState>) -> Router {
    Router::new()
        .route("/patients", get(handlers::list_dialysis_patients).post(handlers::create_dialysis_patient))
        .route("/patients/{id}", get(handlers::get_dialysis_patient).put(handlers::update_dialysis_patient))
        .route("/patients/{id}/protocols", get(handlers::list_protocols).post(handlers::create_protocol))
        .route("/protocols/{protocol_id}", put(handlers::update_protocol))
        .route("/sessions", get(handlers::list_sessions).post(handlers::create_session))
        .route("/sessions/{session_id}", get(handlers::get_session))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::CLINICAL, require_roles))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
