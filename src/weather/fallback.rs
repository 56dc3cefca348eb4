//! Readings used when the live provider cannot answer.

use crate::models::{WeatherIcon, WeatherSnapshot};
use crate::random::RandomSource;

struct KnownCity {
    city: &'static str,
    country: &'static str,
    temperature_c: i32,
    feels_like_c: i32,
    description: &'static str,
    icon: WeatherIcon,
    humidity_pct: u8,
    wind_kmh: u32,
    pressure_hpa: u32,
    visibility_km: u32,
    cloudiness_pct: u8,
}

const fn known(
    city: &'static str,
    country: &'static str,
    temperatures: (i32, i32),
    description: &'static str,
    icon: WeatherIcon,
    readings: (u8, u32, u32, u32, u8),
) -> KnownCity {
    KnownCity {
        city,
        country,
        temperature_c: temperatures.0,
        feels_like_c: temperatures.1,
        description,
        icon,
        humidity_pct: readings.0,
        wind_kmh: readings.1,
        pressure_hpa: readings.2,
        visibility_km: readings.3,
        cloudiness_pct: readings.4,
    }
}

// (humidity %, wind km/h, pressure hPa, visibility km, cloudiness %)
const KNOWN_CITIES: &[KnownCity] = &[
    known("Paris", "FR", (18, 20), "partly cloudy", WeatherIcon::CloudSun, (65, 12, 1013, 10, 40)),
    known("Tokyo", "JP", (22, 24), "clear sky", WeatherIcon::Sun, (58, 8, 1018, 15, 10)),
    known("New York", "US", (15, 13), "light rain", WeatherIcon::CloudRain, (78, 15, 1008, 8, 80)),
    known("London", "GB", (12, 10), "overcast clouds", WeatherIcon::Cloud, (72, 10, 1015, 12, 90)),
    known("Bali", "ID", (28, 32), "tropical sunny", WeatherIcon::Sun, (75, 6, 1010, 20, 20)),
    known("Santorini", "GR", (24, 26), "clear sky", WeatherIcon::Sun, (60, 14, 1020, 25, 5)),
    known("Maldives", "MV", (30, 35), "sunny", WeatherIcon::Sun, (80, 8, 1012, 30, 15)),
    known("Kyoto", "JP", (20, 22), "partly cloudy", WeatherIcon::CloudSun, (68, 7, 1016, 18, 30)),
    known("Dubai", "AE", (35, 42), "clear sky", WeatherIcon::Sun, (45, 12, 1008, 20, 0)),
    known("Sydney", "AU", (25, 27), "sunny", WeatherIcon::Sun, (55, 18, 1022, 25, 10)),
    known("Amsterdam", "NL", (16, 14), "light drizzle", WeatherIcon::CloudDrizzle, (85, 13, 1011, 9, 75)),
    known("Reykjavik", "IS", (8, 5), "cloudy", WeatherIcon::Cloud, (82, 22, 995, 15, 95)),
    known("Cape Town", "ZA", (22, 24), "clear sky", WeatherIcon::Sun, (62, 16, 1024, 30, 5)),
];

const RANDOM_CONDITIONS: &[(&str, WeatherIcon)] = &[
    ("clear sky", WeatherIcon::Sun),
    ("partly cloudy", WeatherIcon::CloudSun),
    ("cloudy", WeatherIcon::Cloud),
    ("light rain", WeatherIcon::CloudRain),
];

pub const TEMPERATURE_RANGE_C: (u32, u32) = (5, 35);
pub const HUMIDITY_RANGE_PCT: (u32, u32) = (40, 80);
pub const WIND_RANGE_KMH: (u32, u32) = (5, 25);
pub const PRESSURE_RANGE_HPA: (u32, u32) = (990, 1040);
pub const VISIBILITY_RANGE_KM: (u32, u32) = (5, 25);
pub const CLOUDINESS_RANGE_PCT: (u32, u32) = (0, 100);

/// Static reading for one of the featured destinations, matched case-insensitively
#[must_use]
pub fn known_city(city: &str) -> Option<WeatherSnapshot> {
    let wanted = city.trim();
    KNOWN_CITIES
        .iter()
        .find(|known| known.city.eq_ignore_ascii_case(wanted))
        .map(|known| WeatherSnapshot {
            city: known.city.to_string(),
            country: known.country.to_string(),
            temperature_c: known.temperature_c,
            feels_like_c: known.feels_like_c,
            description: known.description.to_string(),
            icon: known.icon,
            humidity_pct: known.humidity_pct,
            wind_kmh: known.wind_kmh,
            pressure_hpa: known.pressure_hpa,
            visibility_km: Some(known.visibility_km),
            cloudiness_pct: known.cloudiness_pct,
        })
}

fn draw(rng: &mut dyn RandomSource, (low, high): (u32, u32)) -> u32 {
    rng.below(low, high)
}

/// Plausible made-up reading for a city nobody has data for
pub fn generated(city: &str, rng: &mut dyn RandomSource) -> WeatherSnapshot {
    let pick = rng.below(0, RANDOM_CONDITIONS.len() as u32) as usize;
    let (description, icon) = RANDOM_CONDITIONS[pick];

    WeatherSnapshot {
        city: city.to_string(),
        country: "XX".to_string(),
        temperature_c: draw(rng, TEMPERATURE_RANGE_C) as i32,
        feels_like_c: draw(rng, TEMPERATURE_RANGE_C) as i32,
        description: description.to_string(),
        icon,
        humidity_pct: draw(rng, HUMIDITY_RANGE_PCT) as u8,
        wind_kmh: draw(rng, WIND_RANGE_KMH),
        pressure_hpa: draw(rng, PRESSURE_RANGE_HPA),
        visibility_km: Some(draw(rng, VISIBILITY_RANGE_KM)),
        cloudiness_pct: draw(rng, CLOUDINESS_RANGE_PCT) as u8,
    }
}

/// Static data when we have it, generated data otherwise
pub fn snapshot_for(city: &str, rng: &mut dyn RandomSource) -> WeatherSnapshot {
    known_city(city).unwrap_or_else(|| generated(city, rng))
}
