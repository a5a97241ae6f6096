//! Tana `[[date:...]]` notation.
//!
//! Five shapes are accepted, all wrapped in `[[date:` and `]]`:
//!
//! 1. `2025-06-18` (date only)
//! 2. `2025-06-18T08:00` (date with start time)
//! 3. `2025-06-18/2025-06-19` (date range)
//! 4. `2025-06-18T08:00/2025-06-19` (start time with end date)
//! 5. `2025-06-18T08:00/2025-06-19T08:00` (full date-time range)
//!
//! Validation is purely syntactic. Nothing checks that a range ends after it starts.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::components::google_calendar::models::{EventDateTime, EventDateTimeInfo};
use crate::error::{AppResult, Error};

pub const DATE_PREFIX: &str = "[[date:";
pub const DATE_SUFFIX: &str = "]]";

/// Message reported when a value is not a Tana date
pub const INVALID_TANA_DATE_MESSAGE: &str = "Invalid Tana date pattern. Expected formats: [[date:YYYY-MM-DD]], [[date:YYYY-MM-DDTHH:MM]], [[date:YYYY-MM-DD/YYYY-MM-DD]], [[date:YYYY-MM-DDTHH:MM/YYYY-MM-DD]], or [[date:YYYY-MM-DDTHH:MM/YYYY-MM-DDTHH:MM]]";

lazy_static! {
    static ref TANA_DATE: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles");
    static ref TANA_DATE_TIME: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}$")
            .expect("date-time pattern compiles");
}

/// One side of a Tana date, classified once when parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePart {
    /// `YYYY-MM-DD`
    Date(String),
    /// `YYYY-MM-DDTHH:MM`
    DateTime(String),
}

impl DatePart {
    /// Classify a raw date or date-time substring
    pub fn classify(value: &str) -> AppResult<Self> {
        if TANA_DATE_TIME.is_match(value) {
            Ok(DatePart::DateTime(value.to_string()))
        } else if TANA_DATE.is_match(value) {
            Ok(DatePart::Date(value.to_string()))
        } else {
            Err(Error::InvalidDateFormat(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DatePart::Date(value) | DatePart::DateTime(value) => value,
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, DatePart::DateTime(_))
    }

    /// Calendar representation of this part in the given zone
    pub fn to_event_date_time(&self, time_zone: &str) -> EventDateTime {
        match self {
            DatePart::Date(date) => EventDateTime::all_day(date, time_zone),
            DatePart::DateTime(date_time) => EventDateTime::timed(date_time, time_zone),
        }
    }
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five documented notation shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TanaDateShape {
    DateOnly,
    DateTime,
    DateOnlyRange,
    /// One side carries a time and the other does not
    MixedRange,
    DateTimeRange,
}

/// A validated Tana date with its start and optional end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TanaDateInfo {
    pub original: String,
    pub start: DatePart,
    /// Present iff the notation contained a `/`
    pub end: Option<DatePart>,
}

impl TanaDateInfo {
    /// Assemble from raw substrings, classifying each one
    pub fn from_parts(original: &str, start: &str, end: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            original: original.to_string(),
            start: DatePart::classify(start)?,
            end: end.map(DatePart::classify).transpose()?,
        })
    }

    pub fn shape(&self) -> TanaDateShape {
        match (&self.start, &self.end) {
            (DatePart::Date(_), None) => TanaDateShape::DateOnly,
            (DatePart::DateTime(_), None) => TanaDateShape::DateTime,
            (DatePart::Date(_), Some(DatePart::Date(_))) => TanaDateShape::DateOnlyRange,
            (DatePart::DateTime(_), Some(DatePart::DateTime(_))) => TanaDateShape::DateTimeRange,
            _ => TanaDateShape::MixedRange,
        }
    }
}

impl FromStr for TanaDateInfo {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !validate_tana_date_value(value) {
            return Err(Error::InvalidDateFormat(value.to_string()));
        }
        extract_tana_date_info(value)
    }
}

/// Content between `[[date:` and `]]`, if the envelope is present
fn envelope_content(value: &str) -> Option<&str> {
    value.strip_prefix(DATE_PREFIX)?.strip_suffix(DATE_SUFFIX)
}

fn is_date_or_date_time(part: &str) -> bool {
    TANA_DATE.is_match(part) || TANA_DATE_TIME.is_match(part)
}

/// Check whether a string is well-formed Tana date notation
pub fn validate_tana_date_value(value: &str) -> bool {
    let content = match envelope_content(value) {
        Some(content) => content,
        None => return false,
    };

    if content.trim().is_empty() {
        return false;
    }

    match content.split_once('/') {
        None => is_date_or_date_time(content),
        Some((start, end)) => {
            !start.is_empty()
                && !end.is_empty()
                && is_date_or_date_time(start)
                && is_date_or_date_time(end)
        }
    }
}

/// Strip the envelope and split into start and optional end.
///
/// Expects a value that already passed [`validate_tana_date_value`].
pub fn extract_tana_date_info(value: &str) -> AppResult<TanaDateInfo> {
    let content =
        envelope_content(value).ok_or_else(|| Error::InvalidDateFormat(value.to_string()))?;

    match content.split_once('/') {
        None => TanaDateInfo::from_parts(value, content, None),
        Some((start, end)) => TanaDateInfo::from_parts(value, start, Some(end)),
    }
}

/// Convert a Tana date into calendar start/end times.
///
/// Timed parts get a `:00` seconds suffix. Without an end, the end repeats the start.
pub fn build_event_date_time_info(date: &TanaDateInfo, time_zone: &str) -> EventDateTimeInfo {
    let start = date.start.to_event_date_time(time_zone);
    let end = match &date.end {
        Some(end) => end.to_event_date_time(time_zone),
        None => start.clone(),
    };

    EventDateTimeInfo { start, end }
}
