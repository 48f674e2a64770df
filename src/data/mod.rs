//! Core data models for the Skycast weather engine
//!
//! This module contains the unified internal schema that all provider
//! payloads are normalized into: location, current conditions, multi-day
//! forecast with per-interval breakdown, air quality and alerts.

pub mod normalize;
pub mod openweather;
pub mod units;

pub use openweather::{OpenWeatherClient, WeatherError};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete weather record for a single location
///
/// This is the one shape every downstream consumer works with. It is
/// replaced wholesale on each new query; no field-level patching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherData {
    /// The location this data is for
    pub location: Location,
    /// Current conditions at the location
    pub current: CurrentConditions,
    /// Multi-day forecast, one entry per calendar date, ascending
    pub forecast: Vec<ForecastDay>,
    /// Active weather alerts; empty when none are in effect
    pub alerts: Vec<Alert>,
    /// When this record was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Geographic location metadata, immutable once fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Place name (e.g. "Vancouver")
    pub name: String,
    /// Administrative region or state, when known
    pub region: String,
    /// ISO country code or country name
    pub country: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
    /// Local time at the location, "YYYY-MM-DD HH:MM"
    pub localtime: String,
    /// UTC offset identifier (e.g. "UTC+02:00")
    pub timezone: String,
}

/// Weather condition as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Human-readable condition text (e.g. "light rain")
    pub text: String,
    /// Icon identifier resolvable against the provider's icon set
    pub icon: String,
    /// Provider condition code
    pub code: i64,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Temperature in Fahrenheit
    pub temp_f: f64,
    /// Current condition
    pub condition: Condition,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Wind speed in mph
    pub wind_mph: f64,
    /// 16-point compass wind direction (e.g. "WSW")
    pub wind_dir: String,
    /// Atmospheric pressure in millibars
    pub pressure_mb: f64,
    /// Atmospheric pressure in inches of mercury
    pub pressure_in: f64,
    /// Precipitation over the last hour in millimeters
    pub precip_mm: f64,
    /// Precipitation over the last hour in inches
    pub precip_in: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Cloud cover percentage (0-100)
    pub cloud: u8,
    /// Feels-like temperature in Celsius
    pub feelslike_c: f64,
    /// Feels-like temperature in Fahrenheit
    pub feelslike_f: f64,
    /// Visibility in kilometers
    pub vis_km: f64,
    /// Visibility in miles
    pub vis_miles: f64,
    /// UV index; zero when the provider does not supply it
    pub uv: f64,
    /// Air quality snapshot; zeroed placeholder when unavailable
    pub air_quality: AirQuality,
}

/// Pollutant concentrations (µg/m³) plus two index scales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    /// Carbon monoxide
    pub co: f64,
    /// Nitrogen dioxide
    pub no2: f64,
    /// Ozone
    pub o3: f64,
    /// Sulphur dioxide
    pub so2: f64,
    /// Fine particulates (≤2.5µm)
    pub pm2_5: f64,
    /// Coarse particulates (≤10µm)
    pub pm10: f64,
    /// US EPA index (1-5)
    pub us_epa_index: u8,
    /// UK DEFRA index (1-10)
    pub gb_defra_index: u8,
}

impl AirQuality {
    /// Returns a fully-populated zeroed placeholder
    ///
    /// Used when the air-pollution fetch fails so that downstream
    /// consumers never see an absent field.
    pub fn placeholder() -> Self {
        Self {
            co: 0.0,
            no2: 0.0,
            o3: 0.0,
            so2: 0.0,
            pm2_5: 0.0,
            pm10: 0.0,
            us_epa_index: 0,
            gb_defra_index: 0,
        }
    }
}

/// Aggregated forecast for a single calendar date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// The calendar date this entry covers
    pub date: NaiveDate,
    /// Aggregated day statistics
    pub day: DaySummary,
    /// Astronomical data for the day
    pub astro: Astro,
    /// Ordered per-interval samples within the day
    pub hours: Vec<HourSlot>,
}

/// Day-level statistics aggregated from the interval samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    /// Maximum temperature in Celsius
    pub maxtemp_c: f64,
    /// Maximum temperature in Fahrenheit
    pub maxtemp_f: f64,
    /// Minimum temperature in Celsius
    pub mintemp_c: f64,
    /// Minimum temperature in Fahrenheit
    pub mintemp_f: f64,
    /// Average temperature in Celsius
    pub avgtemp_c: f64,
    /// Average temperature in Fahrenheit
    pub avgtemp_f: f64,
    /// Maximum wind speed in km/h
    pub maxwind_kph: f64,
    /// Maximum wind speed in mph
    pub maxwind_mph: f64,
    /// Total precipitation in millimeters
    pub totalprecip_mm: f64,
    /// Total precipitation in inches
    pub totalprecip_in: f64,
    /// Average visibility in kilometers
    pub avgvis_km: f64,
    /// Average visibility in miles
    pub avgvis_miles: f64,
    /// Average relative humidity percentage
    pub avghumidity: f64,
    /// Whether rain is expected at any point in the day
    pub daily_will_it_rain: bool,
    /// Maximum per-interval chance of rain (0-100)
    pub daily_chance_of_rain: u8,
    /// Whether snow is expected at any point in the day
    pub daily_will_it_snow: bool,
    /// Maximum per-interval chance of snow (0-100)
    pub daily_chance_of_snow: u8,
    /// Representative condition, preferring the sample closest to noon
    pub condition: Condition,
    /// UV index; zero when the provider does not supply it
    pub uv: f64,
}

/// Astronomical data for a forecast day
///
/// Fields the provider cannot supply are fixed placeholders rather than
/// absent, keeping the record total for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    /// Sunrise time in "hh:mm AM/PM" format
    pub sunrise: String,
    /// Sunset time in "hh:mm AM/PM" format
    pub sunset: String,
    /// Moonrise time; placeholder when unavailable
    pub moonrise: String,
    /// Moonset time; placeholder when unavailable
    pub moonset: String,
    /// Moon phase name; placeholder when unavailable
    pub moon_phase: String,
    /// Moon illumination percentage; zero when unavailable
    pub moon_illumination: u8,
}

impl Astro {
    /// Returns the placeholder astro block used when the provider has no
    /// astronomical data at all.
    pub fn placeholder() -> Self {
        Self {
            sunrise: "N/A".to_string(),
            sunset: "N/A".to_string(),
            moonrise: "N/A".to_string(),
            moonset: "N/A".to_string(),
            moon_phase: "Unknown".to_string(),
            moon_illumination: 0,
        }
    }
}

/// One fixed-interval forecast sample within a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourSlot {
    /// Local timestamp of the sample
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Temperature in Fahrenheit
    pub temp_f: f64,
    /// Condition at this interval
    pub condition: Condition,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Wind speed in mph
    pub wind_mph: f64,
    /// 16-point compass wind direction
    pub wind_dir: String,
    /// Wind gust speed in km/h
    pub gust_kph: f64,
    /// Wind gust speed in mph
    pub gust_mph: f64,
    /// Atmospheric pressure in millibars
    pub pressure_mb: f64,
    /// Atmospheric pressure in inches of mercury
    pub pressure_in: f64,
    /// Precipitation over the interval in millimeters
    pub precip_mm: f64,
    /// Precipitation over the interval in inches
    pub precip_in: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Cloud cover percentage (0-100)
    pub cloud: u8,
    /// Feels-like temperature in Celsius
    pub feelslike_c: f64,
    /// Feels-like temperature in Fahrenheit
    pub feelslike_f: f64,
    /// Dew point in Celsius, derived from temperature and humidity
    pub dewpoint_c: f64,
    /// Dew point in Fahrenheit
    pub dewpoint_f: f64,
    /// Whether rain is expected in this interval
    pub will_it_rain: bool,
    /// Chance of rain (0-100)
    pub chance_of_rain: u8,
    /// Whether snow is expected in this interval
    pub will_it_snow: bool,
    /// Chance of snow (0-100)
    pub chance_of_snow: u8,
    /// Visibility in kilometers
    pub vis_km: f64,
    /// Visibility in miles
    pub vis_miles: f64,
    /// UV index; zero when the provider does not supply it
    pub uv: f64,
}

/// An active weather alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Alert headline
    pub headline: String,
    /// Event name (e.g. "Flood Warning")
    pub event: String,
    /// Severity classification
    pub severity: String,
    /// Affected areas
    pub areas: String,
    /// When the alert takes effect
    pub effective: String,
    /// When the alert expires
    pub expires: String,
    /// Full alert description
    pub desc: String,
    /// Safety instructions, if provided
    pub instruction: String,
}

/// A geocoding search hit
///
/// Ephemeral: results live only until the next query unless explicitly
/// saved. The provider assigns no identifiers, so `id` is a client-assigned
/// composite key stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Client-assigned identifier, stable for a given place
    pub id: String,
    /// Place name
    pub name: String,
    /// Administrative region or state, when known
    pub region: String,
    /// ISO country code or country name
    pub country: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
}

/// A location the user has saved to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    /// Identifier the saved list is keyed by
    pub id: String,
    /// Place name
    pub name: String,
    /// ISO country code or country name
    pub country: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
}

impl From<&SearchResult> for SavedLocation {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id.clone(),
            name: result.name.clone(),
            country: result.country.clone(),
            lat: result.lat,
            lon: result.lon,
        }
    }
}

/// Builds the client-assigned identifier for a place
///
/// Coordinates are truncated to four decimals so the same place resolved
/// twice yields the same key.
pub fn location_key(name: &str, country: &str, lat: f64, lon: f64) -> String {
    format!("{}|{}|{:.4}|{:.4}", name, country, lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_quality_placeholder_is_fully_zeroed() {
        let aq = AirQuality::placeholder();
        assert_eq!(aq.co, 0.0);
        assert_eq!(aq.no2, 0.0);
        assert_eq!(aq.o3, 0.0);
        assert_eq!(aq.so2, 0.0);
        assert_eq!(aq.pm2_5, 0.0);
        assert_eq!(aq.pm10, 0.0);
        assert_eq!(aq.us_epa_index, 0);
        assert_eq!(aq.gb_defra_index, 0);
    }

    #[test]
    fn test_location_key_is_deterministic() {
        let a = location_key("Vancouver", "CA", 49.2827, -123.1207);
        let b = location_key("Vancouver", "CA", 49.2827, -123.1207);
        assert_eq!(a, b);
        assert_eq!(a, "Vancouver|CA|49.2827|-123.1207");
    }

    #[test]
    fn test_location_key_distinguishes_places() {
        let a = location_key("Vancouver", "CA", 49.2827, -123.1207);
        let b = location_key("Vancouver", "US", 45.6387, -122.6615);
        assert_ne!(a, b);
    }

    #[test]
    fn test_saved_location_from_search_result() {
        let result = SearchResult {
            id: location_key("London", "GB", 51.5074, -0.1278),
            name: "London".to_string(),
            region: "England".to_string(),
            country: "GB".to_string(),
            lat: 51.5074,
            lon: -0.1278,
        };

        let saved = SavedLocation::from(&result);
        assert_eq!(saved.id, result.id);
        assert_eq!(saved.name, "London");
        assert_eq!(saved.country, "GB");
        assert!((saved.lat - 51.5074).abs() < 1e-9);
        assert!((saved.lon - (-0.1278)).abs() < 1e-9);
    }

    #[test]
    fn test_air_quality_serialization_roundtrip() {
        let aq = AirQuality {
            co: 230.4,
            no2: 12.8,
            o3: 68.7,
            so2: 1.9,
            pm2_5: 8.2,
            pm10: 11.4,
            us_epa_index: 2,
            gb_defra_index: 1,
        };

        let json = serde_json::to_string(&aq).expect("Failed to serialize AirQuality");
        let deserialized: AirQuality =
            serde_json::from_str(&json).expect("Failed to deserialize AirQuality");

        assert_eq!(deserialized, aq);
    }

    #[test]
    fn test_astro_placeholder_fields_are_defined() {
        let astro = Astro::placeholder();
        assert_eq!(astro.sunrise, "N/A");
        assert_eq!(astro.sunset, "N/A");
        assert_eq!(astro.moon_phase, "Unknown");
        assert_eq!(astro.moon_illumination, 0);
    }
}
