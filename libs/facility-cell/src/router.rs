use std::sync::Arc;
use axum::{middleware, routing::{get, post, put}, Router};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers::*;

pub fn room_routes(state: Arc<FacilityState>) -> Router {
    let staff_routes = Router::new()
        .route("/", get(list_rooms))
        .route("/{id}", get(get_room))
        .route("/{id}/availability", get(room_availability))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::STAFF, require_roles));

    let admin_routes = Router::new()
        .route("/", post(create_room))
        .route("/{id}", put(update_room).delete(delete_room))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles));

    Router::new()
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}

pub fn machine_routes(state: Arc<FacilityState>) -> Router {
    let staff_routes = Router::new()
        .route("/", get(list_machines))
        .route("/machine-stats", get(machine_stats))
        .route("/{id}", get(get_machine))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::STAFF, require_roles));

    let admin_routes = Router::new()
        .route("/", post(create_machine))
        .route("/{id}", put(update_machine).delete(delete_machine))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles));

    Router::new()
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
