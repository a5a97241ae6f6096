#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tanacal::components::google_calendar::models::{
    CalendarEvent, CalendarEvents, ListEventsParams,
};
use tanacal::components::google_calendar::{CalendarApi, TokenProvider};
use tanacal::error::{auth_error, google_calendar_error, AppResult};
use tanacal::startup::AppState;

/// One recorded call against the calendar mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List { calendar_id: String },
    Get { calendar_id: String, event_id: String },
    Insert { calendar_id: String, event: CalendarEvent },
    Update { calendar_id: String, event_id: String, event: CalendarEvent },
    Move { calendar_id: String, event_id: String, destination: String },
    Delete { calendar_id: String, event_id: String },
}

/// In-memory stand-in for the Google Calendar API that records every call
#[derive(Debug, Default)]
pub struct MockCalendarApi {
    calls: Mutex<Vec<Call>>,
    stored: CalendarEvent,
    failure: Option<(u16, String)>,
    update_failure: Option<(u16, String)>,
}

impl MockCalendarApi {
    /// Mock holding a single existing event
    pub fn new() -> Self {
        let stored = serde_json::from_value(serde_json::json!({
            "id": "evt1",
            "htmlLink": "https://calendar.example/evt1",
            "summary": "Planning",
            "description": "Quarterly planning",
            "location": "Room 4",
            "start": {"dateTime": "2025-06-18T08:00:00", "timeZone": "Europe/Helsinki"},
            "end": {"dateTime": "2025-06-18T09:00:00", "timeZone": "Europe/Helsinki"},
            "reminders": {"useDefault": true}
        }))
        .expect("stored event fixture");

        Self {
            calls: Mutex::new(Vec::new()),
            stored,
            failure: None,
            update_failure: None,
        }
    }

    /// Mock whose every call fails with the given upstream status
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            failure: Some((status, body.to_string())),
            ..Self::new()
        }
    }

    /// Mock where only full-replacement updates fail
    pub fn failing_updates(status: u16, body: &str) -> Self {
        Self {
            update_failure: Some((status, body.to_string())),
            ..Self::new()
        }
    }

    pub fn stored(&self) -> CalendarEvent {
        self.stored.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some((status, body)) => Err(google_calendar_error(*status, body)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn list_events(
        &self,
        _token: &str,
        calendar_id: &str,
        _params: &ListEventsParams,
    ) -> AppResult<CalendarEvents> {
        self.record(Call::List {
            calendar_id: calendar_id.to_string(),
        })?;
        Ok(CalendarEvents {
            items: vec![self.stored()],
            ..Default::default()
        })
    }

    async fn get_event(
        &self,
        _token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<CalendarEvent> {
        self.record(Call::Get {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })?;
        Ok(self.stored())
    }

    async fn insert_event(
        &self,
        _token: &str,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent> {
        self.record(Call::Insert {
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
        })?;
        let mut created = event.clone();
        created.id = Some("new-event".to_string());
        created.html_link = Some("https://calendar.example/new-event".to_string());
        Ok(created)
    }

    async fn update_event(
        &self,
        _token: &str,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> AppResult<CalendarEvent> {
        self.record(Call::Update {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            event: event.clone(),
        })?;
        if let Some((status, body)) = &self.update_failure {
            return Err(google_calendar_error(*status, body));
        }
        Ok(event.clone())
    }

    async fn move_event(
        &self,
        _token: &str,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> AppResult<CalendarEvent> {
        self.record(Call::Move {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            destination: destination_calendar_id.to_string(),
        })?;
        Ok(self.stored())
    }

    async fn delete_event(
        &self,
        _token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<bool> {
        self.record(Call::Delete {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })?;
        Ok(true)
    }
}

/// Hands out a fixed token
pub struct StaticTokenProvider(pub &'static str);

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

/// Always fails, as a misconfigured deployment would
pub struct FailingTokenProvider;

#[async_trait]
impl TokenProvider for FailingTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        Err(auth_error("Failed to obtain access token from Google OAuth"))
    }
}

/// App state backed by the given mock and a static token
pub fn mock_state(calendar: Arc<MockCalendarApi>) -> AppState {
    AppState::new(calendar, Arc::new(StaticTokenProvider("test_token")))
}
