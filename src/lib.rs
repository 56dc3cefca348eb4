//! Travel Essence - booking form wizard and destination weather lookup
//!
//! This library provides the core of a travel booking site: a multi-step
//! booking form with declarative validation rules and auto-persistence,
//! and a cached per-city weather lookup with graceful fallbacks.

pub mod booking;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod random;
pub mod store;
pub mod telemetry;
pub mod weather;

// Re-export core types for public API
pub use booking::{BookingGateway, FieldRule, FormDefinition, FormWizard, Rule, SimulatedGateway};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::TravelError;
pub use models::{BookingRecord, SubmissionResult, WeatherIcon, WeatherSnapshot};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use store::{FjallStore, KeyValueStore, MemoryStore};
pub use weather::{OpenWeatherMapProvider, WeatherLookup, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
