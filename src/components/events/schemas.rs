//! Request shapes for the event routes and their validation.
//!
//! Raw requests deserialize with every field optional so that a missing field is
//! reported through the same field-by-field message as a malformed one.

use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::{AppResult, Error};
use crate::utils::tana_date::{validate_tana_date_value, TanaDateInfo, INVALID_TANA_DATE_MESSAGE};
use crate::utils::validation::{format_lines, format_validation_errors_renamed, validation_error};

/// Zone used when a request does not name one
pub const DEFAULT_TIME_ZONE: &str = "Etc/UTC";

/// Longest location the gateway forwards
pub const MAX_LOCATION_LENGTH: u64 = 1024;

/// Body fields as clients send them; all are strings when present
const BODY_FIELDS: [&str; 5] = ["name", "date", "description", "timeZone", "location"];

/// Rust field names that differ from their request names
const WIRE_NAMES: [(&str, &str); 1] = [("time_zone", "timeZone")];

fn validate_tana_date(value: &str) -> Result<(), ValidationError> {
    if validate_tana_date_value(value) {
        Ok(())
    } else {
        Err(validation_error("tana_date", INVALID_TANA_DATE_MESSAGE))
    }
}

fn validate_time_zone(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(validation_error("time_zone", "Time zone cannot be empty"));
    }
    Tz::from_str_insensitive(value)
        .map(|_| ())
        .map_err(|_| validation_error("time_zone", "Invalid timezone format"))
}

/// Canonical spelling of an already validated zone, so `utc` is sent as `UTC`
fn canonical_time_zone(value: String) -> String {
    match Tz::from_str_insensitive(&value) {
        Ok(tz) => tz.name().to_string(),
        Err(_) => value,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a JSON body into a request shape, reporting wrong-typed fields by name.
///
/// `null` is a type error like any other non-string value.
pub fn parse_body<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    let Some(object) = value.as_object() else {
        return Err(Error::Validation(format_lines(&[format!(
            "- body Expected object, received {}",
            json_type(&value)
        )])));
    };

    let mut lines: Vec<String> = BODY_FIELDS
        .iter()
        .filter_map(|field| match object.get(*field) {
            None | Some(Value::String(_)) => None,
            Some(other) => Some(format!(
                "- {} Expected string, received {}",
                field,
                json_type(other)
            )),
        })
        .collect();
    if !lines.is_empty() {
        lines.sort();
        return Err(Error::Validation(format_lines(&lines)));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Validation(format_lines(&[format!("- body {}", e)])))
}

/// Run `validator` checks, turning failures into a 400-class error
pub fn validated<T: Validate>(value: T) -> AppResult<T> {
    value
        .validate()
        .map_err(|errors| {
            Error::Validation(format_validation_errors_renamed(&errors, &WIRE_NAMES))
        })?;
    Ok(value)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// `POST /events?to=<calendar id>`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateEventQuery {
    #[validate(
        required(message = "to(Calendar ID) is required"),
        length(min = 1, message = "to(Calendar ID) cannot be empty")
    )]
    pub to: Option<String>,
}

/// `PUT /events/{event_id}?from=<calendar id>[&to=<calendar id>]`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventQuery {
    #[validate(
        required(message = "from(Calendar ID) is required"),
        length(min = 1, message = "from(Calendar ID) cannot be empty")
    )]
    pub from: Option<String>,
    #[validate(length(min = 1, message = "to(Calendar ID) cannot be empty"))]
    pub to: Option<String>,
}

/// `POST /events/{event_id}/delete?from=<calendar id>`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DeleteEventQuery {
    #[validate(
        required(message = "from(Calendar ID) is required"),
        length(min = 1, message = "from(Calendar ID) cannot be empty")
    )]
    pub from: Option<String>,
}

/// Body of a create request, before validation
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EventDataRequest {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Event name is required")
    )]
    pub name: Option<String>,
    #[validate(required(message = "Required"), custom(function = "validate_tana_date"))]
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "timeZone")]
    #[validate(custom(function = "validate_time_zone"))]
    pub time_zone: Option<String>,
    #[validate(length(max = 1024, message = "Location is too long"))]
    pub location: Option<String>,
}

/// Body of an update request, before validation. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PartialEventDataRequest {
    #[validate(length(min = 1, message = "Event name is required"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_tana_date"))]
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "timeZone")]
    #[validate(custom(function = "validate_time_zone"))]
    pub time_zone: Option<String>,
    #[validate(length(max = 1024, message = "Location is too long"))]
    pub location: Option<String>,
}

/// A validated create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub name: String,
    pub date: TanaDateInfo,
    pub description: String,
    pub time_zone: String,
    pub location: String,
}

/// A validated update request; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialEventData {
    pub name: Option<String>,
    pub date: Option<TanaDateInfo>,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub location: Option<String>,
}

impl PartialEventData {
    /// True when the request carried no field at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.time_zone.is_none()
            && self.location.is_none()
    }
}

impl TryFrom<EventDataRequest> for EventData {
    type Error = Error;

    fn try_from(request: EventDataRequest) -> AppResult<Self> {
        let request = validated(EventDataRequest {
            name: trimmed(request.name),
            description: trimmed(request.description),
            location: trimmed(request.location),
            ..request
        })?;

        let date = request.date.unwrap_or_default().parse::<TanaDateInfo>()?;

        Ok(EventData {
            name: request.name.unwrap_or_default(),
            date,
            description: request.description.unwrap_or_default(),
            time_zone: request
                .time_zone
                .map(canonical_time_zone)
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
            location: request.location.unwrap_or_default(),
        })
    }
}

impl TryFrom<PartialEventDataRequest> for PartialEventData {
    type Error = Error;

    fn try_from(request: PartialEventDataRequest) -> AppResult<Self> {
        let request = validated(PartialEventDataRequest {
            name: trimmed(request.name),
            description: trimmed(request.description),
            location: trimmed(request.location),
            ..request
        })?;

        let date = request
            .date
            .map(|date| date.parse::<TanaDateInfo>())
            .transpose()?;

        Ok(PartialEventData {
            name: request.name,
            date,
            description: request.description,
            time_zone: request.time_zone.map(canonical_time_zone),
            location: request.location,
        })
    }
}
