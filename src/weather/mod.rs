//! Per-city weather lookup.
//!
//! Answers from a short-lived in-memory cache when it can, asks the live
//! provider otherwise, and falls back to static or generated readings when
//! the provider fails. `get_weather` never returns an error.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::models::WeatherSnapshot;
use crate::random::{RandomSource, ThreadRandom};

pub mod fallback;
pub mod provider;

pub use provider::{OpenWeatherMapProvider, ProviderError, ProviderPayload, WeatherProvider};

pub const DEFAULT_TTL: TimeDelta = TimeDelta::minutes(10);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub snapshot: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.fetched_at < ttl
    }
}

fn cache_key(city: &str) -> String {
    city.trim().to_lowercase()
}

pub struct WeatherLookup<P> {
    provider: P,
    cache: HashMap<String, CacheEntry>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource>,
}

impl<P: WeatherProvider> WeatherLookup<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
            ttl: DEFAULT_TTL,
            clock: Arc::new(SystemClock),
            rng: Box::new(ThreadRandom),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Current conditions for `city`.
    ///
    /// Cached live readings are reused until they are `ttl` old. Provider
    /// failures are logged by kind and answered with fallback data, which is
    /// never cached.
    #[instrument(skip(self))]
    pub async fn get_weather(&mut self, city: &str) -> WeatherSnapshot {
        let key = cache_key(city);
        if let Some(entry) = self.cache.get(&key) {
            if entry.is_fresh(self.clock.now(), self.ttl) {
                debug!("Cache hit");
                return entry.snapshot.clone();
            }
            debug!("Cache entry expired");
        }

        let fetched = self
            .provider
            .current_weather(city)
            .await
            .and_then(|payload| WeatherSnapshot::from_payload(&payload));

        match fetched {
            Ok(snapshot) => {
                self.cache.insert(
                    key,
                    CacheEntry {
                        snapshot: snapshot.clone(),
                        fetched_at: self.clock.now(),
                    },
                );
                snapshot
            }
            Err(e) => {
                warn!(kind = e.kind(), "Weather API error for {city}: {e}");
                fallback::snapshot_for(city, self.rng.as_mut())
            }
        }
    }

    /// Drops every cached reading.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Cache keys (lower-cased city names) currently held
    pub fn cached_cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.cache.keys().cloned().collect();
        cities.sort();
        cities
    }
}
