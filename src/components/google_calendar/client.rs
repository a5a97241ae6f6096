use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error, instrument};
use url::Url;

use super::models::{CalendarEvent, CalendarEvents, ListEventsParams};
use crate::error::{google_calendar_error, AppResult, Error};

/// Default REST endpoint of the Calendar API
pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Operations the gateway needs from the calendar service.
///
/// Every call takes the bearer token explicitly; implementations hold no per-request state.
#[async_trait]
pub trait CalendarApi: Send + Sync + 'static {
    /// List events on a calendar
    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> AppResult<CalendarEvents>;

    /// Fetch one event by its calendar event id
    async fn get_event(&self, token: &str, calendar_id: &str, event_id: &str)
        -> AppResult<CalendarEvent>;

    /// Create an event. Attendees are never sent.
    async fn insert_event(
        &self,
        token: &str,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent>;

    /// Replace an event in full; this is not a patch
    async fn update_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent>;

    /// Move an event to another calendar, changing its organizer
    async fn move_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> AppResult<CalendarEvent>;

    /// Delete an event; `true` once the service accepted the delete
    async fn delete_event(&self, token: &str, calendar_id: &str, event_id: &str)
        -> AppResult<bool>;
}

/// REST client for the Google Calendar v3 API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new(GOOGLE_API_BASE)
    }
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        )
    }

    fn parse_url(url: &str) -> AppResult<Url> {
        Url::parse(url).map_err(|e| Error::Other(format!("Failed to parse URL {}: {}", url, e)))
    }

    /// Attach auth headers, send, and turn non-success statuses into errors
    async fn send(&self, token: &str, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!("Google Calendar API returned HTTP {}: {}", status, error_body);
            return Err(google_calendar_error(status.as_u16(), &error_body));
        }

        Ok(response)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    #[instrument(skip(self, token, params), level = "info")]
    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> AppResult<CalendarEvents> {
        let mut url = Self::parse_url(&self.events_url(calendar_id))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(time_min) = &params.time_min {
                query.append_pair("timeMin", time_min);
            }
            if let Some(time_max) = &params.time_max {
                query.append_pair("timeMax", time_max);
            }
            if let Some(max_results) = params.max_results {
                query.append_pair("maxResults", &max_results.to_string());
            }
            if let Some(order_by) = params.order_by {
                query.append_pair("orderBy", order_by.as_str());
            }
            if let Some(true) = params.single_events {
                query.append_pair("singleEvents", "true");
            }
        }

        let response = self.send(token, self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, token), level = "info")]
    async fn get_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<CalendarEvent> {
        let url = self.event_url(calendar_id, event_id);
        let response = self.send(token, self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, token, event), level = "info")]
    async fn insert_event(
        &self,
        token: &str,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent> {
        // Service accounts cannot invite attendees without domain-wide delegation
        let mut payload = event.clone();
        if payload.extra.remove("attendees").is_some() {
            debug!("Dropped attendees from insert payload");
        }

        let url = self.events_url(calendar_id);
        let response = self
            .send(token, self.client.post(url).json(&payload))
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, token, event), level = "info")]
    async fn update_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent> {
        let url = self.event_url(calendar_id, event_id);
        let response = self.send(token, self.client.put(url).json(event)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, token), level = "info")]
    async fn move_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> AppResult<CalendarEvent> {
        let mut url = Self::parse_url(&format!("{}/move", self.event_url(calendar_id, event_id)))?;
        url.query_pairs_mut()
            .append_pair("destination", destination_calendar_id);

        let response = self.send(token, self.client.post(url)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, token), level = "info")]
    async fn delete_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<bool> {
        let url = self.event_url(calendar_id, event_id);
        self.send(token, self.client.delete(url)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::{EventDateTime, EventDateTimeInfo, OrderBy};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_event() -> serde_json::Value {
        json!({
            "id": "evt1",
            "htmlLink": "https://www.google.com/calendar/event?eid=evt1",
            "summary": "Lunch",
            "start": {"date": "2025-06-18", "timeZone": "Etc/UTC"},
            "end": {"date": "2025-06-18", "timeZone": "Etc/UTC"}
        })
    }

    #[tokio::test]
    async fn get_event_sends_bearer_token_and_encodes_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/team%40group.calendar.google.com/events/evt1"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_event()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::new(&mock_server.uri());
        let event = client
            .get_event("test_token", "team@group.calendar.google.com", "evt1")
            .await
            .unwrap();

        assert_eq!(event.id.as_deref(), Some("evt1"));
        assert_eq!(event.summary.as_deref(), Some("Lunch"));
    }

    #[tokio::test]
    async fn insert_event_strips_attendees() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(body_json(json!({
                "summary": "Lunch",
                "description": "",
                "location": "",
                "start": {"date": "2025-06-18", "timeZone": "Etc/UTC"},
                "end": {"date": "2025-06-18", "timeZone": "Etc/UTC"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_event()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let times = EventDateTimeInfo {
            start: EventDateTime::all_day("2025-06-18", "Etc/UTC"),
            end: EventDateTime::all_day("2025-06-18", "Etc/UTC"),
        };
        let mut event = CalendarEvent::new("Lunch", "", "", times);
        event
            .extra
            .insert("attendees".to_string(), json!([{"email": "a@example.com"}]));

        let client = GoogleCalendarClient::new(&mock_server.uri());
        let created = client.insert_event("t", "primary", &event).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("evt1"));
    }

    #[tokio::test]
    async fn update_event_uses_put_with_full_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendars/primary/events/evt1"))
            .and(body_json(sample_event()))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_event()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let event: CalendarEvent = serde_json::from_value(sample_event()).unwrap();
        let client = GoogleCalendarClient::new(&mock_server.uri());
        client
            .update_event("t", "primary", "evt1", &event)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn move_event_passes_destination() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events/evt1/move"))
            .and(query_param("destination", "work@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_event()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::new(&mock_server.uri());
        client
            .move_event("t", "primary", "evt1", "work@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_events_only_sends_set_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("orderBy", "startTime"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("maxResults", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [sample_event()]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let params = ListEventsParams {
            max_results: Some(10),
            order_by: Some(OrderBy::StartTime),
            single_events: Some(true),
            ..Default::default()
        };
        let client = GoogleCalendarClient::new(&mock_server.uri());
        let events = client.list_events("t", "primary", &params).await.unwrap();

        assert_eq!(events.items.len(), 1);
        let request = &mock_server.received_requests().await.unwrap()[0];
        assert!(!request.url.query().unwrap_or_default().contains("timeMin"));
    }

    #[tokio::test]
    async fn delete_event_returns_true_on_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/evt1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::new(&mock_server.uri());
        assert!(client.delete_event("t", "primary", "evt1").await.unwrap());
    }

    #[tokio::test]
    async fn non_success_status_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/missing"))
            .respond_with(ResponseTemplate::new(410).set_body_string("Resource has been deleted"))
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::new(&mock_server.uri());
        let err = client
            .delete_event("t", "primary", "missing")
            .await
            .unwrap_err();

        match err {
            Error::GoogleCalendar { status, body } => {
                assert_eq!(status, 410);
                assert_eq!(body, "Resource has been deleted");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
