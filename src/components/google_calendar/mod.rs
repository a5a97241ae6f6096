pub mod client;
pub mod models;
pub mod token;

pub use client::{CalendarApi, GoogleCalendarClient};
pub use models::{CalendarEvent, EventDateTime, EventDateTimeInfo};
pub use token::{ServiceAccountTokenProvider, TokenProvider};
