use std::sync::Arc;

use tracing::info;

use super::schemas::{EventData, PartialEventData, DEFAULT_TIME_ZONE};
use crate::components::google_calendar::client::CalendarApi;
use crate::components::google_calendar::models::CalendarEvent;
use crate::error::AppResult;
use crate::utils::tana_date::build_event_date_time_info;

/// Render the Tana paste snippet pointing at an event
pub fn build_tana_paste(event: &CalendarEvent, calendar_id: &str) -> String {
    format!(
        "Event URL::{}\nEvent ID::{}\nSynced Calendar ID::{}",
        event.html_link.as_deref().unwrap_or_default(),
        event.id.as_deref().unwrap_or_default(),
        calendar_id
    )
}

/// Overlay the fields set in `data` onto a fetched event.
///
/// A new date is always placed in `data.time_zone`, or `Etc/UTC` when absent;
/// the zone already stored on the event is not consulted.
pub fn merge_event(mut event: CalendarEvent, data: &PartialEventData) -> CalendarEvent {
    if let Some(name) = &data.name {
        event.summary = Some(name.clone());
    }
    if let Some(description) = &data.description {
        event.description = Some(description.clone());
    }
    if let Some(location) = &data.location {
        event.location = Some(location.clone());
    }
    if let Some(date) = &data.date {
        let time_zone = data.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE);
        event.set_times(build_event_date_time_info(date, time_zone));
    }
    event
}

/// Where an update stands after the move step
struct UpdateProgress {
    calendar_id: String,
    event: Option<CalendarEvent>,
}

/// Create, update and delete calendar events on behalf of Tana
#[derive(Clone)]
pub struct EventService {
    calendar: Arc<dyn CalendarApi>,
}

impl EventService {
    pub fn new(calendar: Arc<dyn CalendarApi>) -> Self {
        Self { calendar }
    }

    /// Create an event and return its Tana paste snippet
    pub async fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        data: EventData,
    ) -> AppResult<String> {
        let times = build_event_date_time_info(&data.date, &data.time_zone);
        let payload = CalendarEvent::new(&data.name, &data.description, &data.location, times);

        let event = self
            .calendar
            .insert_event(access_token, calendar_id, &payload)
            .await?;

        info!(
            "Created event {} in calendar {}",
            event.id.as_deref().unwrap_or("?"),
            calendar_id
        );
        Ok(build_tana_paste(&event, calendar_id))
    }

    /// Update an event, optionally moving it to another calendar first.
    ///
    /// Runs as a short pipeline: move, then fetch-merge-replace, then a final
    /// fetch if neither step produced the event. Calls are sequential and nothing
    /// is rolled back: if the move succeeds and the replace fails, the event stays
    /// in the destination calendar with its old fields.
    pub async fn update_event(
        &self,
        access_token: &str,
        from_calendar_id: &str,
        event_id: &str,
        data: PartialEventData,
        to_calendar_id: Option<&str>,
    ) -> AppResult<String> {
        let progress = self
            .move_step(access_token, from_calendar_id, event_id, to_calendar_id)
            .await?;
        let progress = self
            .field_update_step(access_token, event_id, &data, progress)
            .await?;

        let event = match progress.event {
            Some(event) => event,
            None => {
                self.calendar
                    .get_event(access_token, &progress.calendar_id, event_id)
                    .await?
            }
        };

        Ok(build_tana_paste(&event, &progress.calendar_id))
    }

    async fn move_step(
        &self,
        access_token: &str,
        from_calendar_id: &str,
        event_id: &str,
        to_calendar_id: Option<&str>,
    ) -> AppResult<UpdateProgress> {
        match to_calendar_id {
            Some(destination) if destination != from_calendar_id => {
                let event = self
                    .calendar
                    .move_event(access_token, from_calendar_id, event_id, destination)
                    .await?;
                info!(
                    "Moved event {} from {} to {}",
                    event_id, from_calendar_id, destination
                );
                Ok(UpdateProgress {
                    calendar_id: destination.to_string(),
                    event: Some(event),
                })
            }
            _ => Ok(UpdateProgress {
                calendar_id: from_calendar_id.to_string(),
                event: None,
            }),
        }
    }

    async fn field_update_step(
        &self,
        access_token: &str,
        event_id: &str,
        data: &PartialEventData,
        progress: UpdateProgress,
    ) -> AppResult<UpdateProgress> {
        if data.is_empty() {
            return Ok(progress);
        }

        let current = match progress.event {
            Some(event) => event,
            None => {
                self.calendar
                    .get_event(access_token, &progress.calendar_id, event_id)
                    .await?
            }
        };

        let merged = merge_event(current, data);
        let updated = self
            .calendar
            .update_event(access_token, &progress.calendar_id, event_id, &merged)
            .await?;

        info!(
            "Updated event {} in calendar {}",
            event_id, progress.calendar_id
        );
        Ok(UpdateProgress {
            calendar_id: progress.calendar_id,
            event: Some(updated),
        })
    }

    /// Delete an event. Upstream failures propagate instead of yielding `false`.
    pub async fn delete_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<bool> {
        let deleted = self
            .calendar
            .delete_event(access_token, calendar_id, event_id)
            .await?;
        info!("Deleted event {} from calendar {}", event_id, calendar_id);
        Ok(deleted)
    }
}
