use anyhow::{Context, Result};
use tracing::info;

use travel_essence::booking::FormDefinition;
use travel_essence::{
    AppConfig, FjallStore, FormWizard, OpenWeatherMapProvider, SimulatedGateway, WeatherLookup,
};

const DEFAULT_CITIES: &[&str] = &["Paris", "Tokyo", "Cape Town"];

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().with_context(|| "Failed to load configuration")?;
    travel_essence::telemetry::init(&config.logging)?;
    info!(version = travel_essence::VERSION, "Starting travel-essence");

    let store = FjallStore::open(&config.booking.storage_path)?;
    let gateway = SimulatedGateway::new(
        config.booking.submit_latency(),
        config.booking.failure_rate,
    );
    let wizard = FormWizard::new(FormDefinition::booking(), store, gateway)
        .with_reference_prefix(config.booking.reference_prefix.clone());

    let bookings = wizard.saved_bookings()?;
    println!("{} booking(s) saved in {}", bookings.len(), config.booking.storage_path);
    for booking in &bookings {
        println!(
            "  - {} to {} ({})",
            booking.reference,
            booking.data.fields.get("destination").map_or("?", String::as_str),
            booking.submission_date.format("%Y-%m-%d")
        );
    }
    if !wizard.values().is_empty() {
        println!(
            "Unfinished booking form on step {} of {}",
            wizard.current_step(),
            wizard.total_steps()
        );
    }

    let provider = OpenWeatherMapProvider::new(&config.weather)?;
    let mut lookup = WeatherLookup::new(provider).with_ttl(config.weather.cache_ttl());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cities: Vec<&str> = if args.is_empty() {
        DEFAULT_CITIES.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for city in cities {
        let weather = lookup.get_weather(city).await;
        println!(
            "{}, {}: {} {}, feels like {}°C",
            weather.city,
            weather.country,
            weather.format_temperature(),
            weather.description,
            weather.feels_like_c
        );
        println!(
            "  humidity {}%, wind {}, pressure {}, visibility {}, clouds {}% [{}]",
            weather.humidity_pct,
            weather.format_wind(),
            weather.format_pressure(),
            weather.format_visibility(),
            weather.cloudiness_pct,
            weather.icon.key()
        );
    }

    Ok(())
}
