//! Weather snapshot model and display methods

use serde::{Deserialize, Serialize};

/// Icon shown next to a weather reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    Cloud,
    CloudRain,
    CloudDrizzle,
    Bolt,
    Snowflake,
    Smog,
    Moon,
}

impl WeatherIcon {
    /// Icon key understood by the presentation layer's icon font
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "fas fa-sun",
            WeatherIcon::CloudSun => "fas fa-cloud-sun",
            WeatherIcon::Cloud => "fas fa-cloud",
            WeatherIcon::CloudRain => "fas fa-cloud-rain",
            WeatherIcon::CloudDrizzle => "fas fa-cloud-drizzle",
            WeatherIcon::Bolt => "fas fa-bolt",
            WeatherIcon::Snowflake => "fas fa-snowflake",
            WeatherIcon::Smog => "fas fa-smog",
            WeatherIcon::Moon => "fas fa-moon",
        }
    }

    /// Pick the icon for a provider condition category such as `Clear` or `Rain`.
    ///
    /// The night flag only changes `Clear` (to the moon). Every other category
    /// keeps its day icon, and unknown categories show a cloud.
    #[must_use]
    pub fn for_condition(category: &str, night: bool) -> Self {
        match category {
            "Clear" if night => WeatherIcon::Moon,
            "Clear" => WeatherIcon::Sun,
            "Clouds" => WeatherIcon::Cloud,
            "Rain" => WeatherIcon::CloudRain,
            "Drizzle" => WeatherIcon::CloudDrizzle,
            "Thunderstorm" => WeatherIcon::Bolt,
            "Snow" => WeatherIcon::Snowflake,
            "Mist" | "Fog" | "Haze" => WeatherIcon::Smog,
            _ => WeatherIcon::Cloud,
        }
    }
}

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    /// ISO country code, `XX` for generated readings
    pub country: String,
    /// Temperature in Celsius
    pub temperature_c: i32,
    /// Apparent temperature in Celsius
    pub feels_like_c: i32,
    /// Human-readable description of weather conditions
    pub description: String,
    pub icon: WeatherIcon,
    pub humidity_pct: u8,
    /// Wind speed in km/h
    pub wind_kmh: u32,
    /// Atmospheric pressure in hPa
    pub pressure_hpa: u32,
    /// Visibility in kilometers, `None` when the provider did not report it
    pub visibility_km: Option<u32>,
    pub cloudiness_pct: u8,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_c)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h", self.wind_kmh)
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{} hPa", self.pressure_hpa)
    }

    #[must_use]
    pub fn format_visibility(&self) -> String {
        match self.visibility_km {
            Some(km) => format!("{km} km"),
            None => "N/A".to_string(),
        }
    }
}
