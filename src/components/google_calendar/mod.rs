mod client;
pub mod models;
mod publisher;
pub mod token;

pub use client::{GoogleCalendarClient, GOOGLE_CALENDAR_API};
pub use models::{AccessToken, EventDateTime, InsertedEvent, NormalizedEvent, StoredToken};
pub use publisher::CalendarPublisher;
pub use token::TokenManager;
