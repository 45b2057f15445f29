use std::sync::Arc;
use axum::{middleware, routing::{delete, get}, Router};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers::*;

pub fn patient_routes(state: Arc<PatientState>) -> Router {
    let staff_routes = Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/{id}", get(get_patient).put(update_patient))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::STAFF, require_roles));

    let admin_routes = Router::new()
        .route("/{id}", delete(delete_patient))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles));

    Router::new()
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
