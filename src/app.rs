//! Dashboard state management
//!
//! The [`Dashboard`] struct is the single owner of all UI-facing state:
//! the latest weather record, loading/error flags and the saved-locations
//! store. All mutation happens through its methods; there is no shared
//! state or locking.

use chrono::{DateTime, Utc};

use crate::data::{
    OpenWeatherClient, SavedLocation, SearchResult, WeatherData, WeatherError,
};
use crate::outfit::{self, OutfitCategory, OutfitSuggestion};
use crate::store::LocationStore;

/// Main dashboard state container
pub struct Dashboard {
    /// Latest weather record; retained when a refresh fails
    pub weather: Option<WeatherData>,
    /// Whether a weather fetch is in flight
    pub loading: bool,
    /// Last user-visible error, cleared on the next successful fetch
    pub last_error: Option<String>,
    /// Timestamp of the last successful fetch
    pub last_refresh: Option<DateTime<Utc>>,
    /// Weather API client
    client: OpenWeatherClient,
    /// Saved locations store; `None` when no data directory is available
    store: Option<LocationStore>,
}

impl Dashboard {
    /// Creates a new dashboard backed by the default store location
    ///
    /// # Arguments
    /// * `api_key` - OpenWeatherMap API key supplied out of band
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            weather: None,
            loading: false,
            last_error: None,
            last_refresh: None,
            client: OpenWeatherClient::new(api_key),
            store: LocationStore::new(),
        }
    }

    /// Creates a dashboard with custom components (for testing)
    pub fn with_components(client: OpenWeatherClient, store: LocationStore) -> Self {
        Self {
            weather: None,
            loading: false,
            last_error: None,
            last_refresh: None,
            client,
            store: Some(store),
        }
    }

    /// Fetches and replaces the weather record for a coordinate
    ///
    /// On success the previous record is replaced wholesale and any prior
    /// error is cleared. On failure the error is surfaced as retryable and
    /// the previous record, if any, is retained.
    pub async fn load_weather(&mut self, lat: f64, lon: f64) {
        self.loading = true;

        match self.client.fetch_weather(lat, lon).await {
            Ok(data) => {
                self.weather = Some(data);
                self.last_error = None;
                self.last_refresh = Some(Utc::now());
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Searches for locations matching a free-text query
    ///
    /// Results are ephemeral; call [`Dashboard::save_location`] to keep one.
    pub async fn search_locations(
        &self,
        query: &str,
    ) -> Result<Vec<SearchResult>, WeatherError> {
        self.client.search_locations(query).await
    }

    /// Saves a search result to the persisted locations list
    ///
    /// # Returns
    /// * `Ok(true)` if the location was added
    /// * `Ok(false)` if it was already saved or no store is available
    /// * `Err` if persisting fails
    pub fn save_location(&mut self, result: &SearchResult) -> std::io::Result<bool> {
        match self.store.as_mut() {
            Some(store) => store.add(SavedLocation::from(result)),
            None => Ok(false),
        }
    }

    /// Removes a saved location by identifier
    ///
    /// # Returns
    /// * `Ok(true)` if a location was removed
    /// * `Ok(false)` if none matched or no store is available
    /// * `Err` if persisting fails
    pub fn remove_location(&mut self, id: &str) -> std::io::Result<bool> {
        match self.store.as_mut() {
            Some(store) => store.remove(id),
            None => Ok(false),
        }
    }

    /// Returns the saved locations in insertion order
    pub fn saved_locations(&self) -> &[SavedLocation] {
        self.store
            .as_ref()
            .map(|store| store.locations())
            .unwrap_or(&[])
    }

    /// Builds an outfit suggestion from the current conditions
    ///
    /// Returns `None` until a weather record has been loaded.
    pub fn outfit(&self, category: OutfitCategory) -> Option<OutfitSuggestion> {
        self.weather
            .as_ref()
            .map(|data| outfit::suggest_outfit(category, &data.current))
    }
}
