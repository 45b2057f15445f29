use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_models::auth::AllowedRoles;
use shared_utils::extractor::{auth_middleware, require_roles};

use crate::handlers;
use crate::handlers::AppointmentState;

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    let booking_routes = Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment).put(handlers::update_appointment))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::BOOKING, require_roles));

    let front_desk_routes = Router::new()
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::FRONT_DESK, require_roles));

    let clinical_routes = Router::new()
        .route("/{appointment_id}/history", get(handlers::get_appointment_history))
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .route_layer(middleware::from_fn_with_state(AllowedRoles::CLINICAL, require_roles));

    Router::new()
        .merge(booking_routes)
        .merge(front_desk_routes)
        .merge(clinical_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
