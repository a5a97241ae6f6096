use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, Request, State,
    },
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::schemas::{
    parse_body, validated, CreateEventQuery, DeleteEventQuery, EventData, EventDataRequest,
    PartialEventData, PartialEventDataRequest, UpdateEventQuery,
};
use crate::error::{AppResult, Error};
use crate::startup::AppState;
use crate::utils::validation::format_lines;

/// Bearer token obtained for the current request
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Obtain a calendar token before any event handler runs
pub async fn token_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = state.tokens.access_token().await?;
    debug!("Access token acquired for {}", req.uri().path());
    req.extensions_mut().insert(AccessToken(token));
    Ok(next.run(req).await)
}

fn query_params<T: validator::Validate>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    let Query(params) = query
        .map_err(|e| Error::Validation(format_lines(&[format!("- query {}", e.body_text())])))?;
    validated(params)
}

fn json_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> AppResult<T> {
    let Json(value) =
        body.map_err(|e| Error::Validation(format_lines(&[format!("- body {}", e.body_text())])))?;
    parse_body(value)
}

/// Handler for the root health check
pub async fn hello_handler() -> &'static str {
    "Hello"
}

/// `POST /events?to=<calendar id>`
pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    query: Result<Query<CreateEventQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<String> {
    let query = query_params(query)?;
    let data = EventData::try_from(json_body::<EventDataRequest>(body)?)?;
    let calendar_id = query.to.unwrap_or_default();

    state.events.create_event(&token, &calendar_id, data).await
}

/// `PUT /events/{event_id}?from=<calendar id>[&to=<calendar id>]`
pub async fn update_event_handler(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    Path(event_id): Path<String>,
    query: Result<Query<UpdateEventQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<String> {
    let query = query_params(query)?;
    let data = PartialEventData::try_from(json_body::<PartialEventDataRequest>(body)?)?;
    let from_calendar_id = query.from.unwrap_or_default();

    state
        .events
        .update_event(
            &token,
            &from_calendar_id,
            &event_id,
            data,
            query.to.as_deref(),
        )
        .await
}

/// `POST /events/{event_id}/delete?from=<calendar id>`
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    Path(event_id): Path<String>,
    query: Result<Query<DeleteEventQuery>, QueryRejection>,
) -> AppResult<String> {
    let query = query_params(query)?;
    let calendar_id = query.from.unwrap_or_default();

    let success = state
        .events
        .delete_event(&token, &calendar_id, &event_id)
        .await?;

    Ok(if success {
        format!("Event deleted successfully: {}", event_id)
    } else {
        format!("Failed to delete event: {}", event_id)
    })
}
