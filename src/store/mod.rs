//! Persisted dashboard state
//!
//! Currently a single store: the user's saved locations list.

pub mod locations;

pub use locations::LocationStore;
