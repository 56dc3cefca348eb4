//! Data models for the Travel Essence core
//!
//! - Booking: submission payloads, stored records and outcomes
//! - Weather: per-city snapshots and icons

pub mod booking;
pub mod weather;

pub use booking::{BookingPayload, BookingRecord, BookingStatus, FieldValues, SubmissionResult};
pub use weather::{WeatherIcon, WeatherSnapshot};
