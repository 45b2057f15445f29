use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::DoctorState;

pub fn doctor_routes(state: Arc<DoctorState>) -> Router {
    let staff_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::STAFF, require_roles));

    let admin_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor).delete(handlers::delete_doctor))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles));

    Router::new()
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
