//! OpenWeatherMap API client
//!
//! This module provides the REST client for the four provider endpoints the
//! dashboard consumes: current conditions, 5-day/3-hour forecast, geocoding
//! search and air pollution. Raw payloads are handed to [`super::normalize`]
//! to produce the internal [`WeatherData`] schema.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{location_key, normalize, SearchResult, WeatherData};

/// Base URL for the OpenWeatherMap data endpoints
const OWM_DATA_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Base URL for the OpenWeatherMap geocoding endpoints
const OWM_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Maximum number of geocoding hits requested per search
const SEARCH_RESULT_LIMIT: u8 = 5;

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Client for the OpenWeatherMap REST API
///
/// Holds the API key credential supplied out of band. Base URLs are
/// overridable so tests can point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    data_base_url: String,
    geo_base_url: String,
}

impl OpenWeatherClient {
    /// Creates a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            data_base_url: OWM_DATA_BASE_URL.to_string(),
            geo_base_url: OWM_GEO_BASE_URL.to_string(),
        }
    }

    /// Creates a new client with custom base URLs (for testing)
    pub fn with_base_urls(
        api_key: impl Into<String>,
        data_base_url: impl Into<String>,
        geo_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            data_base_url: data_base_url.into(),
            geo_base_url: geo_base_url.into(),
        }
    }

    /// Fetches and normalizes the complete weather record for a coordinate
    ///
    /// Current conditions and the forecast are fetched concurrently; failure
    /// of either is fatal and surfaces to the caller with no partial result.
    /// The air-pollution fetch is non-fatal: on failure a warning is logged
    /// and the zeroed placeholder is merged instead.
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(WeatherData)` - The normalized weather record
    /// * `Err(WeatherError)` - If a primary fetch or normalization fails
    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Result<WeatherData, WeatherError> {
        let (current, forecast, air) = futures::future::join3(
            self.fetch_current(lat, lon),
            self.fetch_forecast(lat, lon),
            self.fetch_air_quality(lat, lon),
        )
        .await;

        let current = current?;
        let forecast = forecast?;
        let air = match air {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!("Air quality fetch failed, using placeholder: {}", e);
                None
            }
        };

        normalize::build_weather_data(current, forecast, air)
    }

    /// Searches for locations matching a free-text query
    ///
    /// A whitespace-only query returns an empty result set without issuing
    /// a request.
    ///
    /// # Arguments
    /// * `query` - Free-text place name
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Matching places, at most five
    /// * `Err(WeatherError)` - If the request or parsing fails
    pub async fn search_locations(&self, query: &str) -> Result<Vec<SearchResult>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/direct", self.geo_base_url);
        let limit = SEARCH_RESULT_LIMIT.to_string();
        let hits: Vec<GeoHit> = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(hits.into_iter().map(SearchResult::from).collect())
    }

    /// Fetches raw current conditions for a coordinate
    pub(crate) async fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentResponse, WeatherError> {
        let url = format!(
            "{}/weather?lat={}&lon={}&units=metric&appid={}",
            self.data_base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetches the raw 5-day/3-hour forecast for a coordinate
    pub(crate) async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ForecastResponse, WeatherError> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&units=metric&appid={}",
            self.data_base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetches the raw air pollution time series for a coordinate
    pub(crate) async fn fetch_air_quality(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<AirPollutionResponse, WeatherError> {
        let url = format!(
            "{}/air_pollution?lat={}&lon={}&appid={}",
            self.data_base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Wire format: structs mirroring the provider JSON, consumed by `normalize`
// ---------------------------------------------------------------------------

/// Current conditions response from the provider
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentResponse {
    pub coord: Coord,
    pub weather: Vec<WireCondition>,
    pub main: MainBlock,
    /// Visibility in meters; the provider caps it at 10km
    pub visibility: Option<f64>,
    pub wind: WindBlock,
    pub clouds: CloudsBlock,
    pub rain: Option<PrecipBlock>,
    pub snow: Option<PrecipBlock>,
    /// Observation time, unix UTC
    pub dt: i64,
    /// Shift from UTC in seconds
    pub timezone: i64,
    pub name: String,
    pub sys: SysBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One condition entry from the provider's `weather` array
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCondition {
    pub id: i64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MainBlock {
    pub temp: f64,
    pub feels_like: f64,
    /// Pressure in hPa
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WindBlock {
    /// Wind speed in m/s (metric units requested)
    pub speed: f64,
    /// Direction in meteorological degrees
    #[serde(default)]
    pub deg: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CloudsBlock {
    /// Cloud cover percentage
    pub all: f64,
}

/// Rain or snow volume block; the provider keys it by accumulation window
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PrecipBlock {
    #[serde(rename = "1h")]
    pub one_h: Option<f64>,
    #[serde(rename = "3h")]
    pub three_h: Option<f64>,
}

impl PrecipBlock {
    /// Returns the accumulation volume in millimeters, whichever window is set
    pub fn volume(&self) -> f64 {
        self.one_h.or(self.three_h).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SysBlock {
    pub country: Option<String>,
}

/// 5-day/3-hour forecast response from the provider
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    pub city: CityBlock,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastEntry {
    pub main: MainBlock,
    pub weather: Vec<WireCondition>,
    pub clouds: CloudsBlock,
    pub wind: WindBlock,
    /// Visibility in meters
    pub visibility: Option<f64>,
    /// Probability of precipitation, 0.0-1.0
    #[serde(default)]
    pub pop: f64,
    pub rain: Option<PrecipBlock>,
    pub snow: Option<PrecipBlock>,
    /// Local sample time, "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CityBlock {
    pub name: String,
    pub country: Option<String>,
    /// Shift from UTC in seconds
    pub timezone: i64,
    /// Sunrise, unix UTC
    pub sunrise: i64,
    /// Sunset, unix UTC
    pub sunset: i64,
}

/// Air pollution response from the provider
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirPollutionResponse {
    pub list: Vec<AirSample>,
}

/// One air quality sample
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirSample {
    pub main: AirMain,
    pub components: AirComponents,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirMain {
    /// Provider air quality index, 1 (good) to 5 (very poor)
    pub aqi: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirComponents {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// One geocoding hit
#[derive(Debug, Clone, Deserialize)]
struct GeoHit {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<GeoHit> for SearchResult {
    fn from(hit: GeoHit) -> Self {
        let country = hit.country.unwrap_or_default();
        Self {
            id: location_key(&hit.name, &country, hit.lat, hit.lon),
            name: hit.name,
            region: hit.state.unwrap_or_default(),
            country,
            lat: hit.lat,
            lon: hit.lon,
        }
    }
}
