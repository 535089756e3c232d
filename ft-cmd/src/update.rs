//! Daily update - append yesterday's temperature to a city's daily file.
//!
//! OpenWeather's free tier only reports current conditions, so the value
//! recorded for yesterday is the temperature at the time the updater runs.
//! Schedule it early in the morning.

use chrono::{Days, NaiveDate};
use ft_core::city::City;
use ft_core::observation::DailyObservation;
use ft_core::weather::WeatherClient;
use log::{info, warn};
use std::path::Path;

use crate::config::Config;

pub fn yesterday(today: NaiveDate) -> anyhow::Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| anyhow::anyhow!("No day before {}", today))
}

/// Existing rows of a daily file; a file that does not exist yet is empty.
fn read_existing(path: &Path) -> anyhow::Result<Vec<DailyObservation>> {
    if !path.exists() {
        info!("{} does not exist yet, starting a new file", path.display());
        return Ok(Vec::new());
    }
    DailyObservation::read_daily_csv(path)
}

/// Add a row for `date` unless one is already there. Returns `true` when written.
pub fn append_if_missing(path: &Path, date: NaiveDate, temp_f: f64) -> anyhow::Result<bool> {
    let mut observations = read_existing(path)?;
    if DailyObservation::contains_date(&observations, &date) {
        info!("{} already has {}", path.display(), date);
        return Ok(false);
    }
    observations.push(DailyObservation::new(date, Some(temp_f)));
    observations.sort_by_key(|obs| obs.date);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    DailyObservation::write_daily_csv(path, &observations)?;
    Ok(true)
}

/// Fetch and append yesterday's temperature for one city.
///
/// Returns `true` when a row was added. Nothing is fetched when the file
/// already covers yesterday, and nothing is written when every request fails.
pub async fn run_daily_update(
    config: &Config,
    city_code: &str,
    today: NaiveDate,
) -> anyhow::Result<bool> {
    let city = City::find(city_code)?;
    let date = yesterday(today)?;
    let path = config.city_daily_path(&city);
    info!("Checking {} for {} in {}", city.code, date, path.display());

    if DailyObservation::contains_date(&read_existing(&path)?, &date) {
        info!("{} already has {}, nothing to do", city.code, date);
        return Ok(false);
    }

    let client = WeatherClient::new(config.api_key()?, &config.api.base_url)?;
    match client.fetch_temperature(&city).await? {
        Some(temp_f) => {
            let added = append_if_missing(&path, date, temp_f)?;
            if added {
                info!("Appended {} {}°F for {}", date, temp_f, city.code);
            }
            Ok(added)
        }
        None => {
            warn!("No temperature for {} on {}, file left unchanged", city.code, date);
            Ok(false)
        }
    }
}

/// Print the current temperature for every tracked city.
pub async fn run_current(config: &Config) -> anyhow::Result<()> {
    let client = WeatherClient::new(config.api_key()?, &config.api.base_url)?;
    for city in City::get_city_vector()? {
        match client.fetch_temperature(&city).await? {
            Some(temp_f) => println!("{}: {:.1}°F", city.name, temp_f),
            None => println!("{}: unavailable", city.name),
        }
    }
    Ok(())
}
