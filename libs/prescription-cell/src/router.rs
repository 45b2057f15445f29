use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::PrescriptionState;

pub fn prescription_routes(state: Arc<PrescriptionState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_prescription))
        .route("/{id}", get(handlers::get_prescription).delete(handlers::delete_prescription))
        .route("/patient/{patient_id}", get(handlers::list_patient_prescriptions))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::CLINICAL, require_roles))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
