use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers::{self, MedicalFileState};

pub fn medical_file_routes(state: Arc<MedicalFileState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_medical_files).post(handlers::create_medical_file))
        .route("/patient/{patient_id}", get(handlers::get_patient_medical_file))
        .route("/{file_id}", get(handlers::get_medical_file).put(handlers::update_medical_file))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::CLINICAL, require_roles))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
