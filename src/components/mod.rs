// Event routes and their orchestration
pub mod events;
// Google Calendar REST client and service account auth
pub mod google_calendar;

pub use events::EventService;
pub use google_calendar::{CalendarApi, TokenProvider};
