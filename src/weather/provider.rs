//! Live weather provider and its payload.
//!
//! The payload mirrors OpenWeatherMap's `/weather` response with metric units.

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::WeatherConfig;
use crate::models::{WeatherIcon, WeatherSnapshot};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("City \"{0}\" not found")]
    NotFound(String),

    #[error("Invalid API key")]
    Unauthorized,

    #[error("No API key configured")]
    MissingCredential,

    #[error("Weather data unavailable ({0})")]
    Unavailable(u16),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Short label used when logging the failure
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotFound(_) => "not_found",
            ProviderError::Unauthorized | ProviderError::MissingCredential => "unauthorized",
            ProviderError::Unavailable(_)
            | ProviderError::Transport(_)
            | ProviderError::Decode(_) => "unavailable",
        }
    }
}

pub trait WeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<ProviderPayload, ProviderError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderPayload {
    pub name: String,
    pub sys: SysData,
    pub main: MainData,
    pub weather: Vec<ConditionData>,
    pub wind: WindData,
    /// Meters; absent for some stations, and zero is treated as not reported
    pub visibility: Option<f64>,
    pub clouds: CloudData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SysData {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainData {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionData {
    /// Condition category, e.g. `Clear`, `Rain`
    pub main: String,
    pub description: String,
    /// Icon code such as `01d`; a trailing `n` marks night
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindData {
    /// Meters per second
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudData {
    pub all: u8,
}

/// Rounds half-way values up, so -0.5 becomes 0 and 2.5 becomes 3
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

fn to_i32(value: f64) -> i32 {
    round_half_up(value) as i32
}

fn to_u32(value: f64) -> u32 {
    round_half_up(value).max(0.0) as u32
}

impl WeatherSnapshot {
    /// Map a provider payload into a snapshot, converting units.
    pub fn from_payload(payload: &ProviderPayload) -> Result<Self, ProviderError> {
        let condition = payload
            .weather
            .first()
            .ok_or_else(|| ProviderError::Decode("no weather condition in response".to_string()))?;
        let night = condition.icon.as_deref().is_some_and(|code| code.contains('n'));

        Ok(Self {
            city: payload.name.clone(),
            country: payload.sys.country.clone(),
            temperature_c: to_i32(payload.main.temp),
            feels_like_c: to_i32(payload.main.feels_like),
            description: condition.description.clone(),
            icon: WeatherIcon::for_condition(&condition.main, night),
            humidity_pct: payload.main.humidity,
            wind_kmh: to_u32(payload.wind.speed * 3.6),
            pressure_hpa: to_u32(payload.main.pressure),
            visibility_km: payload
                .visibility
                .filter(|meters| *meters > 0.0)
                .map(|meters| to_u32(meters / 1000.0)),
            cloudiness_pct: payload.clouds.all,
        })
    }
}

/// Client for OpenWeatherMap's current weather endpoint
pub struct OpenWeatherMapProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherMapProvider {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("travel-essence/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }
}

impl WeatherProvider for OpenWeatherMapProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<ProviderPayload, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::MissingCredential);
        };

        let url = format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(api_key)
        );
        debug!("Calling the weather API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<ProviderPayload>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound(city.to_string())),
            StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
            status => Err(ProviderError::Unavailable(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PARIS_NIGHT: &str = r#"{
        "name": "Paris",
        "sys": {"country": "FR"},
        "main": {"temp": 17.5, "feels_like": -0.5, "humidity": 64, "pressure": 1012},
        "weather": [{"main": "Clear", "description": "clear sky", "icon": "01n"}],
        "wind": {"speed": 4.1},
        "visibility": 9500,
        "clouds": {"all": 0}
    }"#;

    #[test]
    fn test_payload_mapping_converts_units() {
        let payload: ProviderPayload = serde_json::from_str(PARIS_NIGHT).unwrap();
        let snapshot = WeatherSnapshot::from_payload(&payload).unwrap();

        assert_eq!(snapshot.city, "Paris");
        assert_eq!(snapshot.country, "FR");
        assert_eq!(snapshot.temperature_c, 18);
        assert_eq!(snapshot.feels_like_c, 0);
        assert_eq!(snapshot.wind_kmh, 15);
        assert_eq!(snapshot.pressure_hpa, 1012);
        assert_eq!(snapshot.visibility_km, Some(10));
        assert_eq!(snapshot.icon, WeatherIcon::Moon);
    }

    #[test]
    fn test_missing_visibility_is_unavailable() {
        let json = PARIS_NIGHT.replace(r#""visibility": 9500,"#, "");
        let payload: ProviderPayload = serde_json::from_str(&json).unwrap();
        let snapshot = WeatherSnapshot::from_payload(&payload).unwrap();
        assert_eq!(snapshot.visibility_km, None);
        assert_eq!(snapshot.format_visibility(), "N/A");
    }

    #[test]
    fn test_zero_visibility_is_unavailable() {
        let json = PARIS_NIGHT.replace(r#""visibility": 9500"#, r#""visibility": 0"#);
        let payload: ProviderPayload = serde_json::from_str(&json).unwrap();
        let snapshot = WeatherSnapshot::from_payload(&payload).unwrap();
        assert_eq!(snapshot.visibility_km, None);
    }

    #[rstest]
    #[case(2.5, 3.0)]
    #[case(-0.5, 0.0)]
    #[case(-1.5, -1.0)]
    #[case(0.499_999_999_999_999_94, 0.0)]
    #[case(17.49, 17.0)]
    fn test_round_half_up(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_half_up(value), expected);
    }

    #[test]
    fn test_payload_without_condition_rejected() {
        let json = PARIS_NIGHT.replace(
            r#"[{"main": "Clear", "description": "clear sky", "icon": "01n"}]"#,
            "[]",
        );
        let payload: ProviderPayload = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            WeatherSnapshot::from_payload(&payload),
            Err(ProviderError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_never_hits_network() {
        let config = WeatherConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
            cache_ttl_minutes: 10,
        };
        let provider = OpenWeatherMapProvider::new(&config).unwrap();
        let err = provider.current_weather("Paris").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
        assert_eq!(err.kind(), "unauthorized");
    }

    /// Answers each request with a status picked from the queried city
    async fn status_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0u8; 4096];
                let read = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..read]);
                let status = if request.contains("q=Atlantis") {
                    "404 Not Found"
                } else if request.contains("q=Locked") {
                    "401 Unauthorized"
                } else {
                    "503 Service Unavailable"
                };
                let response =
                    format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_http_status_classification() {
        let config = WeatherConfig {
            api_key: Some("test-key".to_string()),
            base_url: status_server().await,
            timeout_seconds: 5,
            cache_ttl_minutes: 10,
        };
        let provider = OpenWeatherMapProvider::new(&config).unwrap();

        let err = provider.current_weather("Atlantis").await.unwrap_err();
        assert!(matches!(&err, ProviderError::NotFound(city) if city == "Atlantis"));
        assert_eq!(err.kind(), "not_found");

        let err = provider.current_weather("Locked").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unauthorized));
        assert_eq!(err.kind(), "unauthorized");

        let err = provider.current_weather("Paris").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(503)));
        assert_eq!(err.kind(), "unavailable");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProviderError::NotFound("X".into()).kind(), "not_found");
        assert_eq!(ProviderError::Unavailable(503).to_string(), "Weather data unavailable (503)");
        assert_eq!(ProviderError::Transport("reset".into()).kind(), "unavailable");
    }
}
