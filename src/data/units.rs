//! Unit conversions and derived meteorological quantities
//!
//! All conversions use fixed factors so that normalization is deterministic:
//! identical inputs always produce identical outputs.

/// Kilometers per mile
const KM_PER_MILE: f64 = 1.609_344;

/// Millimeters per inch
const MM_PER_INCH: f64 = 25.4;

/// Inches of mercury per hectopascal
const INHG_PER_HPA: f64 = 0.029_529_98;

/// The 16 compass points in clockwise order starting at north
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Converts Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Converts meters per second to kilometers per hour
pub fn mps_to_kph(mps: f64) -> f64 {
    mps * 3.6
}

/// Converts kilometers per hour to miles per hour
pub fn kph_to_mph(kph: f64) -> f64 {
    kph / KM_PER_MILE
}

/// Converts kilometers to miles
pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// Converts millimeters to inches
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Converts hectopascals (millibars) to inches of mercury
pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa * INHG_PER_HPA
}

/// Approximates the dew point from temperature and relative humidity
///
/// Uses the linear rule `Td = T - (100 - RH) / 5`, accurate to within about
/// a degree for humidity above 50%.
pub fn dew_point(temp_c: f64, humidity: f64) -> f64 {
    temp_c - (100.0 - humidity) / 5.0
}

/// Maps wind direction in degrees to a 16-point compass label
///
/// Degrees are taken meteorologically (0 = north, clockwise). Values
/// outside 0-360 are wrapped.
pub fn compass_point(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    // Each sector spans 22.5 degrees, centered on the point
    let index = ((normalized / 22.5) + 0.5).floor() as usize % 16;
    COMPASS_POINTS[index]
}
