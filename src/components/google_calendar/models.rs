use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Start or end of an event: either an all-day date or a timed instant, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDateTime {
    #[serde(rename_all = "camelCase")]
    Timed {
        date_time: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AllDay {
        date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
}

impl EventDateTime {
    /// All-day value for a `YYYY-MM-DD` date
    pub fn all_day(date: &str, time_zone: &str) -> Self {
        EventDateTime::AllDay {
            date: date.to_string(),
            time_zone: Some(time_zone.to_string()),
        }
    }

    /// Timed value for a `YYYY-MM-DDTHH:MM` string; seconds are appended
    pub fn timed(date_time: &str, time_zone: &str) -> Self {
        EventDateTime::Timed {
            date_time: format!("{}:00", date_time),
            time_zone: Some(time_zone.to_string()),
        }
    }

    pub fn date(&self) -> Option<&str> {
        match self {
            EventDateTime::AllDay { date, .. } => Some(date),
            EventDateTime::Timed { .. } => None,
        }
    }

    pub fn date_time(&self) -> Option<&str> {
        match self {
            EventDateTime::Timed { date_time, .. } => Some(date_time),
            EventDateTime::AllDay { .. } => None,
        }
    }

    pub fn time_zone(&self) -> Option<&str> {
        match self {
            EventDateTime::Timed { time_zone, .. } | EventDateTime::AllDay { time_zone, .. } => {
                time_zone.as_deref()
            }
        }
    }
}

/// Start and end pair ready to be placed on an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTimeInfo {
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Google Calendar event resource.
///
/// Only the fields this gateway touches are modeled. Everything else the API
/// returns is kept in `extra` so a full-replacement update sends it back intact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarEvent {
    /// Payload for a brand new event
    pub fn new(
        summary: &str,
        description: &str,
        location: &str,
        times: EventDateTimeInfo,
    ) -> Self {
        Self {
            summary: Some(summary.to_string()),
            description: Some(description.to_string()),
            location: Some(location.to_string()),
            start: Some(times.start),
            end: Some(times.end),
            ..Default::default()
        }
    }

    /// Replace both start and end
    pub fn set_times(&mut self, times: EventDateTimeInfo) {
        self.start = Some(times.start);
        self.end = Some(times.end);
    }
}

/// Page of events returned by the list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvents {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Ordering accepted by the list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    StartTime,
    Updated,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::StartTime => "startTime",
            OrderBy::Updated => "updated",
        }
    }
}

/// Optional filters for listing events
#[derive(Debug, Clone, Default)]
pub struct ListEventsParams {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub max_results: Option<u32>,
    pub order_by: Option<OrderBy>,
    pub single_events: Option<bool>,
}
