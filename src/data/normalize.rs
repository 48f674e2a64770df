//! Weather data normalizer
//!
//! Converts raw provider payloads (current conditions, 3-hour forecast list,
//! optional air quality) into the unified [`WeatherData`] schema. The
//! transformation is pure and deterministic: identical inputs always produce
//! identical outputs, with no randomness or external state.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use super::openweather::{
    AirPollutionResponse, CityBlock, CurrentResponse, ForecastEntry, ForecastResponse,
    WireCondition,
};
use super::units;
use super::{
    AirQuality, Astro, Condition, CurrentConditions, DaySummary, ForecastDay, HourSlot, Location,
    WeatherData, WeatherError,
};

/// Minutes from midnight to local noon, used to pick the representative
/// condition for a day
const NOON_MINUTES: i64 = 12 * 60;

/// Probability threshold above which an interval is flagged as rain/snow
const PRECIP_LIKELY_THRESHOLD: u8 = 50;

/// Builds the complete internal weather record from raw provider payloads
///
/// # Arguments
/// * `current` - Current conditions payload (required)
/// * `forecast` - 5-day/3-hour forecast payload (required)
/// * `air` - Air pollution payload; `None` degrades to a zeroed placeholder
///
/// # Returns
/// * `Ok(WeatherData)` - The normalized record
/// * `Err(WeatherError)` - If a required field is missing or a timestamp
///   cannot be parsed
pub(crate) fn build_weather_data(
    current: CurrentResponse,
    forecast: ForecastResponse,
    air: Option<AirPollutionResponse>,
) -> Result<WeatherData, WeatherError> {
    let location = build_location(&current, &forecast.city);
    let air_quality = build_air_quality(air);
    let conditions = build_current(&current, air_quality)?;
    let days = build_forecast_days(&forecast)?;

    Ok(WeatherData {
        location,
        current: conditions,
        forecast: days,
        // The provider serves no alert feed; the field stays total
        alerts: Vec::new(),
        fetched_at: Utc::now(),
    })
}

/// Builds the location record from the current payload
fn build_location(current: &CurrentResponse, city: &CityBlock) -> Location {
    let country = current
        .sys
        .country
        .clone()
        .or_else(|| city.country.clone())
        .unwrap_or_default();

    Location {
        name: if current.name.is_empty() {
            city.name.clone()
        } else {
            current.name.clone()
        },
        // The data endpoints carry no administrative region
        region: String::new(),
        country,
        lat: current.coord.lat,
        lon: current.coord.lon,
        localtime: local_time_string(current.dt, current.timezone),
        timezone: format_utc_offset(current.timezone),
    }
}

/// Builds the current-conditions record, merging the air quality snapshot
fn build_current(
    current: &CurrentResponse,
    air_quality: AirQuality,
) -> Result<CurrentConditions, WeatherError> {
    let condition = condition_from(&current.weather)?;
    let temp_c = current.main.temp;
    let feelslike_c = current.main.feels_like;
    let wind_kph = units::mps_to_kph(current.wind.speed);
    let vis_km = current.visibility.unwrap_or(0.0) / 1000.0;
    let precip_mm = current.rain.as_ref().map(|r| r.volume()).unwrap_or(0.0)
        + current.snow.as_ref().map(|s| s.volume()).unwrap_or(0.0);

    Ok(CurrentConditions {
        temp_c,
        temp_f: units::celsius_to_fahrenheit(temp_c),
        condition,
        wind_kph,
        wind_mph: units::kph_to_mph(wind_kph),
        wind_dir: units::compass_point(current.wind.deg).to_string(),
        pressure_mb: current.main.pressure,
        pressure_in: units::hpa_to_inhg(current.main.pressure),
        precip_mm,
        precip_in: units::mm_to_inches(precip_mm),
        humidity: current.main.humidity.round() as u8,
        cloud: current.clouds.all.round() as u8,
        feelslike_c,
        feelslike_f: units::celsius_to_fahrenheit(feelslike_c),
        vis_km,
        vis_miles: units::km_to_miles(vis_km),
        // Not served by these endpoints
        uv: 0.0,
        air_quality,
    })
}

/// Merges the first sample of the air pollution series, or the placeholder
///
/// The provider's 1-5 index maps directly onto the US EPA scale; the UK
/// DEFRA 1-10 index is derived from the PM2.5 concentration bands.
fn build_air_quality(air: Option<AirPollutionResponse>) -> AirQuality {
    let sample = match air.and_then(|a| a.list.into_iter().next()) {
        Some(sample) => sample,
        None => return AirQuality::placeholder(),
    };

    AirQuality {
        co: sample.components.co,
        no2: sample.components.no2,
        o3: sample.components.o3,
        so2: sample.components.so2,
        pm2_5: sample.components.pm2_5,
        pm10: sample.components.pm10,
        us_epa_index: sample.main.aqi,
        gb_defra_index: defra_index(sample.components.pm2_5),
    }
}

/// Maps a PM2.5 concentration (µg/m³) to the UK DEFRA 1-10 index bands
fn defra_index(pm2_5: f64) -> u8 {
    match pm2_5 {
        v if v < 12.0 => 1,
        v if v < 24.0 => 2,
        v if v < 36.0 => 3,
        v if v < 42.0 => 4,
        v if v < 48.0 => 5,
        v if v < 54.0 => 6,
        v if v < 59.0 => 7,
        v if v < 65.0 => 8,
        v if v < 71.0 => 9,
        _ => 10,
    }
}

/// Groups forecast entries into day buckets and aggregates each one
///
/// Buckets keep the encounter order of dates; the provider list is
/// chronological, so buckets come out date-ascending with entries in
/// chronological order within each bucket.
fn build_forecast_days(forecast: &ForecastResponse) -> Result<Vec<ForecastDay>, WeatherError> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut buckets: Vec<Vec<HourSlot>> = Vec::new();

    for entry in &forecast.list {
        let slot = build_hour_slot(entry)?;
        let date = slot.time.date();

        match dates.iter().position(|d| *d == date) {
            Some(index) => buckets[index].push(slot),
            None => {
                dates.push(date);
                buckets.push(vec![slot]);
            }
        }
    }

    let astro = build_astro(&forecast.city);

    dates
        .into_iter()
        .zip(buckets)
        .map(|(date, mut hours)| {
            hours.sort_by_key(|slot| slot.time);
            let day = build_day_summary(&hours);
            Ok(ForecastDay {
                date,
                day,
                astro: astro.clone(),
                hours,
            })
        })
        .collect()
}

/// Builds one interval slot from a raw forecast entry
fn build_hour_slot(entry: &ForecastEntry) -> Result<HourSlot, WeatherError> {
    let time = parse_entry_time(&entry.dt_txt)?;
    let condition = condition_from(&entry.weather)?;

    let temp_c = entry.main.temp;
    let feelslike_c = entry.main.feels_like;
    let humidity = entry.main.humidity;
    let dewpoint_c = units::dew_point(temp_c, humidity);
    let wind_kph = units::mps_to_kph(entry.wind.speed);
    let gust_kph = units::mps_to_kph(entry.wind.gust.unwrap_or(entry.wind.speed));
    let vis_km = entry.visibility.unwrap_or(0.0) / 1000.0;

    let rain_mm = entry.rain.as_ref().map(|r| r.volume()).unwrap_or(0.0);
    let snow_mm = entry.snow.as_ref().map(|s| s.volume()).unwrap_or(0.0);
    let precip_mm = rain_mm + snow_mm;

    let chance = (entry.pop.clamp(0.0, 1.0) * 100.0).round() as u8;
    // Probability belongs to snow when the interval carries snow volume
    // and no rain; otherwise it is treated as rain probability.
    let chance_of_snow = if snow_mm > 0.0 { chance } else { 0 };
    let chance_of_rain = if snow_mm > 0.0 && rain_mm <= 0.0 { 0 } else { chance };

    Ok(HourSlot {
        time,
        temp_c,
        temp_f: units::celsius_to_fahrenheit(temp_c),
        condition,
        wind_kph,
        wind_mph: units::kph_to_mph(wind_kph),
        wind_dir: units::compass_point(entry.wind.deg).to_string(),
        gust_kph,
        gust_mph: units::kph_to_mph(gust_kph),
        pressure_mb: entry.main.pressure,
        pressure_in: units::hpa_to_inhg(entry.main.pressure),
        precip_mm,
        precip_in: units::mm_to_inches(precip_mm),
        humidity: humidity.round() as u8,
        cloud: entry.clouds.all.round() as u8,
        feelslike_c,
        feelslike_f: units::celsius_to_fahrenheit(feelslike_c),
        dewpoint_c,
        dewpoint_f: units::celsius_to_fahrenheit(dewpoint_c),
        will_it_rain: chance_of_rain >= PRECIP_LIKELY_THRESHOLD,
        chance_of_rain,
        will_it_snow: chance_of_snow >= PRECIP_LIKELY_THRESHOLD,
        chance_of_snow,
        vis_km,
        vis_miles: units::km_to_miles(vis_km),
        uv: 0.0,
    })
}

/// Aggregates one day bucket into its summary statistics
///
/// Max/min temperatures are tracked as slots are folded in; humidity,
/// visibility and temperature accumulate sums for the per-day averages.
/// Rain/snow probability is the maximum per-interval probability.
fn build_day_summary(hours: &[HourSlot]) -> DaySummary {
    let count = hours.len().max(1) as f64;

    let mut maxtemp_c = f64::MIN;
    let mut mintemp_c = f64::MAX;
    let mut temp_sum = 0.0;
    let mut humidity_sum = 0.0;
    let mut vis_sum = 0.0;
    let mut maxwind_kph: f64 = 0.0;
    let mut totalprecip_mm = 0.0;
    let mut chance_of_rain: u8 = 0;
    let mut chance_of_snow: u8 = 0;

    for slot in hours {
        maxtemp_c = maxtemp_c.max(slot.temp_c);
        mintemp_c = mintemp_c.min(slot.temp_c);
        temp_sum += slot.temp_c;
        humidity_sum += slot.humidity as f64;
        vis_sum += slot.vis_km;
        maxwind_kph = maxwind_kph.max(slot.wind_kph);
        totalprecip_mm += slot.precip_mm;
        chance_of_rain = chance_of_rain.max(slot.chance_of_rain);
        chance_of_snow = chance_of_snow.max(slot.chance_of_snow);
    }

    if hours.is_empty() {
        maxtemp_c = 0.0;
        mintemp_c = 0.0;
    }

    let avgtemp_c = temp_sum / count;
    let avgvis_km = vis_sum / count;

    DaySummary {
        maxtemp_c,
        maxtemp_f: units::celsius_to_fahrenheit(maxtemp_c),
        mintemp_c,
        mintemp_f: units::celsius_to_fahrenheit(mintemp_c),
        avgtemp_c,
        avgtemp_f: units::celsius_to_fahrenheit(avgtemp_c),
        maxwind_kph,
        maxwind_mph: units::kph_to_mph(maxwind_kph),
        totalprecip_mm,
        totalprecip_in: units::mm_to_inches(totalprecip_mm),
        avgvis_km,
        avgvis_miles: units::km_to_miles(avgvis_km),
        avghumidity: humidity_sum / count,
        daily_will_it_rain: chance_of_rain >= PRECIP_LIKELY_THRESHOLD,
        daily_chance_of_rain: chance_of_rain,
        daily_will_it_snow: chance_of_snow >= PRECIP_LIKELY_THRESHOLD,
        daily_chance_of_snow: chance_of_snow,
        condition: representative_condition(hours),
        uv: 0.0,
    }
}

/// Picks the condition of the slot closest to local noon
///
/// Falls back to a cloudless placeholder only for an empty bucket, which
/// cannot occur for buckets produced by grouping.
fn representative_condition(hours: &[HourSlot]) -> Condition {
    hours
        .iter()
        .min_by_key(|slot| {
            let minutes = slot.time.hour() as i64 * 60 + slot.time.minute() as i64;
            (minutes - NOON_MINUTES).abs()
        })
        .map(|slot| slot.condition.clone())
        .unwrap_or(Condition {
            text: String::new(),
            icon: String::new(),
            code: 0,
        })
}

/// Builds the astro block from the city-level sunrise/sunset epochs
///
/// The provider supplies a single sunrise/sunset pair for the forecast
/// city, applied to every day; lunar fields are placeholders.
fn build_astro(city: &CityBlock) -> Astro {
    let sunrise = epoch_to_clock(city.sunrise, city.timezone);
    let sunset = epoch_to_clock(city.sunset, city.timezone);

    match (sunrise, sunset) {
        (Some(sunrise), Some(sunset)) => Astro {
            sunrise,
            sunset,
            ..Astro::placeholder()
        },
        _ => Astro::placeholder(),
    }
}

/// Extracts the first condition entry from the provider's weather array
fn condition_from(weather: &[WireCondition]) -> Result<Condition, WeatherError> {
    let first = weather
        .first()
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))?;

    Ok(Condition {
        text: first.description.clone(),
        icon: first.icon.clone(),
        code: first.id,
    })
}

/// Parses a forecast entry timestamp ("YYYY-MM-DD HH:MM:SS")
fn parse_entry_time(dt_txt: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| WeatherError::InvalidTimeFormat(dt_txt.to_string()))
}

/// Formats a unix timestamp shifted into local time as "YYYY-MM-DD HH:MM"
fn local_time_string(epoch: i64, shift_seconds: i64) -> String {
    match DateTime::from_timestamp(epoch + shift_seconds, 0) {
        Some(dt) => dt.naive_utc().format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Formats a unix timestamp shifted into local time as "hh:mm AM/PM"
fn epoch_to_clock(epoch: i64, shift_seconds: i64) -> Option<String> {
    if epoch <= 0 {
        return None;
    }
    DateTime::from_timestamp(epoch + shift_seconds, 0)
        .map(|dt| dt.naive_utc().format("%I:%M %p").to_string())
}

/// Formats a UTC shift in seconds as a "UTC±HH:MM" identifier
fn format_utc_offset(shift_seconds: i64) -> String {
    let sign = if shift_seconds < 0 { '-' } else { '+' };
    let total_minutes = shift_seconds.abs() / 60;
    format!("UTC{}{:02}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::openweather::{
        AirComponents, AirMain, AirSample, CloudsBlock, Coord, ForecastEntry, MainBlock,
        PrecipBlock, SysBlock, WindBlock,
    };

    fn make_condition(id: i64, description: &str, icon: &str) -> Vec<WireCondition> {
        vec![WireCondition {
            id,
            description: description.to_string(),
            icon: icon.to_string(),
        }]
    }

    fn make_entry(dt_txt: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            main: MainBlock {
                temp,
                feels_like: temp - 1.0,
                pressure: 1015.0,
                humidity: 70.0,
            },
            weather: make_condition(801, "few clouds", "02d"),
            clouds: CloudsBlock { all: 20.0 },
            wind: WindBlock {
                speed: 3.0,
                deg: 250.0,
                gust: Some(5.0),
            },
            visibility: Some(10000.0),
            pop: 0.0,
            rain: None,
            snow: None,
            dt_txt: dt_txt.to_string(),
        }
    }

    fn make_city() -> CityBlock {
        CityBlock {
            name: "Vancouver".to_string(),
            country: Some("CA".to_string()),
            timezone: -25200,
            sunrise: 1721044200,
            sunset: 1721101500,
        }
    }

    fn make_current(temp: f64) -> CurrentResponse {
        CurrentResponse {
            coord: Coord {
                lat: 49.28,
                lon: -123.12,
            },
            weather: make_condition(803, "broken clouds", "04d"),
            main: MainBlock {
                temp,
                feels_like: temp - 0.5,
                pressure: 1016.0,
                humidity: 72.0,
            },
            visibility: Some(10000.0),
            wind: WindBlock {
                speed: 4.6,
                deg: 250.0,
                gust: Some(7.2),
            },
            clouds: CloudsBlock { all: 75.0 },
            rain: None,
            snow: None,
            dt: 1721055600,
            timezone: -25200,
            name: "Vancouver".to_string(),
            sys: SysBlock {
                country: Some("CA".to_string()),
            },
        }
    }

    fn make_air(aqi: u8, pm2_5: f64) -> AirPollutionResponse {
        AirPollutionResponse {
            list: vec![AirSample {
                main: AirMain { aqi },
                components: AirComponents {
                    co: 230.31,
                    no2: 9.25,
                    o3: 68.66,
                    so2: 1.61,
                    pm2_5,
                    pm10: 7.6,
                },
            }],
        }
    }

    /// Temperatures from the aggregation example: one date, eight 3-hour
    /// samples, expected max 20, min 10, avg 14.625.
    const DAY_TEMPS: [f64; 8] = [10.0, 12.0, 15.0, 18.0, 20.0, 17.0, 14.0, 11.0];

    fn eight_sample_day() -> ForecastResponse {
        let list = DAY_TEMPS
            .iter()
            .enumerate()
            .map(|(i, &temp)| make_entry(&format!("2024-07-15 {:02}:00:00", i * 3), temp))
            .collect();
        ForecastResponse {
            list,
            city: make_city(),
        }
    }

    #[test]
    fn test_day_aggregation_example() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        assert_eq!(data.forecast.len(), 1);
        let day = &data.forecast[0].day;
        assert!((day.maxtemp_c - 20.0).abs() < 1e-9);
        assert!((day.mintemp_c - 10.0).abs() < 1e-9);
        assert!((day.avgtemp_c - 14.625).abs() < 1e-9);
        assert_eq!(data.forecast[0].hours.len(), 8);
    }

    #[test]
    fn test_temperature_pairs_are_mutually_derivable() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        let check = |c: f64, f: f64| {
            assert!(
                (f - (c * 9.0 / 5.0 + 32.0)).abs() < 1e-6,
                "pair ({}, {}) violates F = C*9/5+32",
                c,
                f
            );
        };

        check(data.current.temp_c, data.current.temp_f);
        check(data.current.feelslike_c, data.current.feelslike_f);
        for day in &data.forecast {
            check(day.day.maxtemp_c, day.day.maxtemp_f);
            check(day.day.mintemp_c, day.day.mintemp_f);
            check(day.day.avgtemp_c, day.day.avgtemp_f);
            for hour in &day.hours {
                check(hour.temp_c, hour.temp_f);
                check(hour.feelslike_c, hour.feelslike_f);
                check(hour.dewpoint_c, hour.dewpoint_f);
            }
        }
    }

    #[test]
    fn test_bucketing_one_bucket_per_date_ascending() {
        let mut list = Vec::new();
        for day in 15..18 {
            for hour in [0, 6, 12, 18] {
                list.push(make_entry(
                    &format!("2024-07-{} {:02}:00:00", day, hour),
                    15.0,
                ));
            }
        }
        let forecast = ForecastResponse {
            list,
            city: make_city(),
        };

        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");

        assert_eq!(data.forecast.len(), 3);
        for window in data.forecast.windows(2) {
            assert!(window[0].date < window[1].date, "buckets must ascend");
        }
        for day in &data.forecast {
            assert_eq!(day.hours.len(), 4);
            for window in day.hours.windows(2) {
                assert!(window[0].time < window[1].time, "entries must be chronological");
            }
        }
    }

    #[test]
    fn test_representative_condition_prefers_noon() {
        let mut list = vec![
            make_entry("2024-07-15 03:00:00", 12.0),
            make_entry("2024-07-15 12:00:00", 19.0),
            make_entry("2024-07-15 21:00:00", 14.0),
        ];
        list[1].weather = make_condition(500, "light rain", "10d");

        let forecast = ForecastResponse {
            list,
            city: make_city(),
        };
        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");

        assert_eq!(data.forecast[0].day.condition.code, 500);
        assert_eq!(data.forecast[0].day.condition.text, "light rain");
    }

    #[test]
    fn test_representative_condition_falls_back_to_first() {
        // No entry at noon: 09:00 is the closest, beating 18:00
        let mut list = vec![
            make_entry("2024-07-15 06:00:00", 12.0),
            make_entry("2024-07-15 09:00:00", 15.0),
            make_entry("2024-07-15 18:00:00", 14.0),
        ];
        list[1].weather = make_condition(802, "scattered clouds", "03d");

        let forecast = ForecastResponse {
            list,
            city: make_city(),
        };
        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");

        assert_eq!(data.forecast[0].day.condition.code, 802);
    }

    #[test]
    fn test_daily_rain_chance_is_interval_maximum() {
        let mut list = vec![
            make_entry("2024-07-15 06:00:00", 12.0),
            make_entry("2024-07-15 12:00:00", 15.0),
            make_entry("2024-07-15 18:00:00", 14.0),
        ];
        list[0].pop = 0.2;
        list[1].pop = 0.85;
        list[2].pop = 0.4;

        let forecast = ForecastResponse {
            list,
            city: make_city(),
        };
        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");

        let day = &data.forecast[0].day;
        assert_eq!(day.daily_chance_of_rain, 85);
        assert!(day.daily_will_it_rain);
        assert_eq!(day.daily_chance_of_snow, 0);
        assert!(!day.daily_will_it_snow);
    }

    #[test]
    fn test_snow_volume_attributes_probability_to_snow() {
        let mut entry = make_entry("2024-01-10 12:00:00", -3.0);
        entry.pop = 0.7;
        entry.snow = Some(PrecipBlock {
            one_h: None,
            three_h: Some(1.4),
        });

        let forecast = ForecastResponse {
            list: vec![entry],
            city: make_city(),
        };
        let data = build_weather_data(make_current(-2.0), forecast, None)
            .expect("normalization should succeed");

        let hour = &data.forecast[0].hours[0];
        assert_eq!(hour.chance_of_snow, 70);
        assert!(hour.will_it_snow);
        assert_eq!(hour.chance_of_rain, 0);
        assert!(!hour.will_it_rain);
        assert!((hour.precip_mm - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_missing_air_quality_yields_placeholder() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        assert_eq!(data.current.air_quality, AirQuality::placeholder());
    }

    #[test]
    fn test_air_quality_merges_first_sample() {
        let data = build_weather_data(
            make_current(18.4),
            eight_sample_day(),
            Some(make_air(2, 5.12)),
        )
        .expect("normalization should succeed");

        let aq = &data.current.air_quality;
        assert_eq!(aq.us_epa_index, 2);
        assert_eq!(aq.gb_defra_index, 1);
        assert!((aq.pm2_5 - 5.12).abs() < 0.001);
        assert!((aq.co - 230.31).abs() < 0.001);
    }

    #[test]
    fn test_empty_air_quality_list_yields_placeholder() {
        let data = build_weather_data(
            make_current(18.4),
            eight_sample_day(),
            Some(AirPollutionResponse { list: Vec::new() }),
        )
        .expect("normalization should succeed");

        assert_eq!(data.current.air_quality, AirQuality::placeholder());
    }

    #[test]
    fn test_defra_index_bands() {
        assert_eq!(defra_index(0.0), 1);
        assert_eq!(defra_index(11.9), 1);
        assert_eq!(defra_index(12.0), 2);
        assert_eq!(defra_index(35.9), 3);
        assert_eq!(defra_index(36.0), 4);
        assert_eq!(defra_index(70.9), 9);
        assert_eq!(defra_index(71.0), 10);
        assert_eq!(defra_index(200.0), 10);
    }

    #[test]
    fn test_alerts_default_to_empty_never_absent() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");
        assert!(data.alerts.is_empty());

        let json = serde_json::to_string(&data).expect("serialize");
        assert!(json.contains("\"alerts\":[]"));
    }

    #[test]
    fn test_location_fields() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        let loc = &data.location;
        assert_eq!(loc.name, "Vancouver");
        assert_eq!(loc.country, "CA");
        assert_eq!(loc.timezone, "UTC-07:00");
        // 1721055600 is 2024-07-15 15:00 UTC, 08:00 local at -7h
        assert_eq!(loc.localtime, "2024-07-15 08:00");
    }

    #[test]
    fn test_astro_from_city_epochs() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        let astro = &data.forecast[0].astro;
        // 1721044200 is 11:50 UTC, 04:50 AM local at -7h
        assert_eq!(astro.sunrise, "04:50 AM");
        assert_eq!(astro.sunset, "08:45 PM");
        assert_eq!(astro.moon_phase, "Unknown");
    }

    #[test]
    fn test_astro_placeholder_when_epochs_missing() {
        let mut forecast = eight_sample_day();
        forecast.city.sunrise = 0;
        forecast.city.sunset = 0;

        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");

        assert_eq!(data.forecast[0].astro, Astro::placeholder());
    }

    #[test]
    fn test_wind_and_unit_derivations() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        // 4.6 m/s is 16.56 km/h
        assert!((data.current.wind_kph - 16.56).abs() < 0.001);
        assert!((data.current.wind_mph - 10.29).abs() < 0.01);
        assert_eq!(data.current.wind_dir, "WSW");
        assert!((data.current.vis_km - 10.0).abs() < 1e-9);
        assert!((data.current.pressure_in - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_dew_point_derivation_in_hours() {
        let data = build_weather_data(make_current(18.4), eight_sample_day(), None)
            .expect("normalization should succeed");

        let hour = &data.forecast[0].hours[0];
        // Td = 10 - (100 - 70) / 5 = 4
        assert!((hour.dewpoint_c - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_entry_time_is_an_error() {
        let mut forecast = eight_sample_day();
        forecast.list[0].dt_txt = "not a timestamp".to_string();

        let result = build_weather_data(make_current(18.4), forecast, None);
        assert!(matches!(result, Err(WeatherError::InvalidTimeFormat(_))));
    }

    #[test]
    fn test_missing_condition_is_an_error() {
        let mut current = make_current(18.4);
        current.weather.clear();

        let result = build_weather_data(current, eight_sample_day(), None);
        assert!(matches!(result, Err(WeatherError::MissingField(_))));
    }

    #[test]
    fn test_empty_forecast_list_yields_no_days() {
        let forecast = ForecastResponse {
            list: Vec::new(),
            city: make_city(),
        };
        let data = build_weather_data(make_current(18.4), forecast, None)
            .expect("normalization should succeed");
        assert!(data.forecast.is_empty());
    }

    #[test]
    fn test_determinism_given_identical_inputs() {
        let a = build_weather_data(make_current(18.4), eight_sample_day(), Some(make_air(2, 5.12)))
            .expect("normalization should succeed");
        let b = build_weather_data(make_current(18.4), eight_sample_day(), Some(make_air(2, 5.12)))
            .expect("normalization should succeed");

        // fetched_at differs; everything derived from inputs must not
        assert_eq!(
            serde_json::to_value(&a.location).expect("serialize"),
            serde_json::to_value(&b.location).expect("serialize")
        );
        assert_eq!(
            serde_json::to_value(&a.current).expect("serialize"),
            serde_json::to_value(&b.current).expect("serialize")
        );
        assert_eq!(
            serde_json::to_value(&a.forecast).expect("serialize"),
            serde_json::to_value(&b.forecast).expect("serialize")
        );
    }

    #[test]
    fn test_format_utc_offset() {
        assert_eq!(format_utc_offset(0), "UTC+00:00");
        assert_eq!(format_utc_offset(7200), "UTC+02:00");
        assert_eq!(format_utc_offset(-25200), "UTC-07:00");
        assert_eq!(format_utc_offset(19800), "UTC+05:30");
    }
}
