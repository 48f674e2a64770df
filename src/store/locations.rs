//! Saved locations store
//!
//! A deduplicated, insertion-ordered list of locations the user has saved,
//! persisted verbatim to a JSON file on every change and rehydrated at
//! startup. Corrupt or missing payloads are silently discarded and the
//! store starts empty.

use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

use crate::data::SavedLocation;

/// File name of the persisted saved-locations list
const STORE_FILE: &str = "locations.json";

/// Store for the user's saved locations
///
/// Locations are unique by identifier and kept in insertion order. Every
/// mutation writes the full list back to disk; reads are served from the
/// in-memory copy loaded at construction.
#[derive(Debug, Clone)]
pub struct LocationStore {
    /// Path of the persisted JSON file
    path: PathBuf,
    /// In-memory list, insertion-ordered
    locations: Vec<SavedLocation>,
}

impl LocationStore {
    /// Creates a store backed by the XDG-compliant data directory
    ///
    /// Uses `~/.local/share/skycast/locations.json` on Linux, or the
    /// equivalent path on other platforms. Returns `None` if the data
    /// directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "skycast")?;
        let path = project_dirs.data_dir().join(STORE_FILE);
        Some(Self::with_path(path))
    }

    /// Creates a store backed by a specific file path
    ///
    /// Useful for testing or when a custom location is needed. The file is
    /// read immediately; a missing or unparseable file yields an empty store.
    pub fn with_path(path: PathBuf) -> Self {
        let locations = Self::load(&path);
        Self { path, locations }
    }

    /// Reads the persisted list, falling back to empty on any failure
    fn load(path: &PathBuf) -> Vec<SavedLocation> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(locations) => locations,
            Err(e) => {
                tracing::debug!("Discarding corrupt saved-locations payload: {}", e);
                Vec::new()
            }
        }
    }

    /// Returns the saved locations in insertion order
    pub fn locations(&self) -> &[SavedLocation] {
        &self.locations
    }

    /// Returns whether a location with the given identifier is saved
    pub fn contains(&self, id: &str) -> bool {
        self.locations.iter().any(|loc| loc.id == id)
    }

    /// Returns the number of saved locations
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Adds a location to the end of the list
    ///
    /// Adding an identifier that is already present is a no-op: the list is
    /// unchanged and nothing is written.
    ///
    /// # Arguments
    /// * `location` - The location to save
    ///
    /// # Returns
    /// * `Ok(true)` if the location was added and persisted
    /// * `Ok(false)` if the identifier was already present
    /// * `Err` if persisting the updated list fails
    pub fn add(&mut self, location: SavedLocation) -> std::io::Result<bool> {
        if self.contains(&location.id) {
            return Ok(false);
        }

        self.locations.push(location);
        self.persist()?;
        Ok(true)
    }

    /// Removes the location with the given identifier
    ///
    /// # Arguments
    /// * `id` - Identifier of the location to remove
    ///
    /// # Returns
    /// * `Ok(true)` if a location was removed and the list persisted
    /// * `Ok(false)` if no location had that identifier
    /// * `Err` if persisting the updated list fails
    pub fn remove(&mut self, id: &str) -> std::io::Result<bool> {
        let before = self.locations.len();
        self.locations.retain(|loc| loc.id != id);

        if self.locations.len() == before {
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Writes the full list back to disk
    fn persist(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.locations)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json)
    }
}
