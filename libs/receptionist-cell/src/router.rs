use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::ReceptionistState;

pub fn receptionist_routes(state: Arc<ReceptionistState>) -> Router {
    let front_desk_routes = Router::new()
        .route("/", get(handlers::list_receptionists))
        .route("/{receptionist_id}", get(handlers::get_receptionist))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::FRONT_DESK, require_roles));

    let admin_routes = Router::new()
        .route("/", post(handlers::create_receptionist))
        .route("/{receptionist_id}", put(handlers::update_receptionist).delete(handlers::delete_receptionist))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, require_roles));

    Router::new()
        .merge(front_desk_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
