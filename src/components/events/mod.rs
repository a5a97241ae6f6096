pub mod handlers;
pub mod schemas;
pub mod service;

pub use service::EventService;

use axum::{
    middleware,
    routing::{post, put},
    Router,
};

use crate::startup::AppState;
use handlers::{create_event_handler, delete_event_handler, token_middleware, update_event_handler};

/// Routes mounted under `/events`; each one acquires a token first
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_event_handler))
        .route("/{event_id}", put(update_event_handler))
        .route("/{event_id}/delete", post(delete_event_handler))
        .route_layer(middleware::from_fn_with_state(state, token_middleware))
}
