//! Runtime configuration.
//!
//! Settings come from an optional TOML file (`freeze-tracker.toml` by default).
//! Every key has a default, so a missing file or a partial file is fine. The
//! OpenWeather API key may also be supplied through `OPEN_WEATHER_MAP_API_KEY`,
//! read after loading a local `.env`; the environment wins over the file.
//!
//! ```toml
//! [data]
//! data_folder = "data"
//! raw_subfolder = "1_raw"
//! processed_subfolder = "2_processed"
//!
//! [api]
//! open_weather_map_api_key = "..."
//! ```

use anyhow::Context;
use ft_core::city::City;
use ft_core::season::Season;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "freeze-tracker.toml";
pub const API_KEY_ENV: &str = "OPEN_WEATHER_MAP_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_folder: PathBuf,
    pub raw_subfolder: String,
    pub processed_subfolder: String,
    pub daily_temps_file: String,
    pub season_file_prefix: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            data_folder: PathBuf::from("data"),
            raw_subfolder: "1_raw".to_string(),
            processed_subfolder: "2_processed".to_string(),
            daily_temps_file: "daily_temps.csv".to_string(),
            season_file_prefix: "daily_temps".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub open_weather_map_api_key: Option<String>,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            open_weather_map_api_key: None,
            base_url: ft_core::weather::OPEN_WEATHER_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub api: ApiConfig,
}

impl Config {
    /// Parse a TOML document; absent keys take their defaults.
    pub fn from_toml(contents: &str) -> anyhow::Result<Config> {
        toml::from_str(contents).context("Invalid configuration")
    }

    /// Load `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(p) => {
                let contents = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                Config::from_toml(&contents)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                let contents = std::fs::read_to_string(DEFAULT_CONFIG_FILE)?;
                Config::from_toml(&contents)?
            }
            None => {
                log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Config::default()
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key(key);
        }
        Ok(config)
    }

    fn apply_api_key(&mut self, key: String) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            self.api.open_weather_map_api_key = Some(key);
        }
    }

    pub fn api_key(&self) -> anyhow::Result<&str> {
        self.api
            .open_weather_map_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No OpenWeather API key; set {} or [api] in the config", API_KEY_ENV))
    }

    pub fn raw_path(&self, name: &str) -> PathBuf {
        self.data.data_folder.join(&self.data.raw_subfolder).join(name)
    }

    pub fn processed_path(&self, name: &str) -> PathBuf {
        self.data
            .data_folder
            .join(&self.data.processed_subfolder)
            .join(name)
    }

    /// Raw hourly export for a city, e.g. `1_raw/hourly_temps_ely.csv`.
    pub fn city_hourly_path(&self, city: &City) -> PathBuf {
        self.raw_path(&format!("hourly_temps_{}.csv", city.file_key()))
    }

    /// `daily_temps.csv` becomes `daily_temps_ely.csv` for Ely.
    pub fn city_daily_path(&self, city: &City) -> PathBuf {
        let file = &self.data.daily_temps_file;
        let (stem, ext) = file.rsplit_once('.').unwrap_or((file.as_str(), "csv"));
        self.processed_path(&format!("{}_{}.{}", stem, city.file_key(), ext))
    }

    /// e.g. `daily_temps_2021-2022_ely.csv`.
    pub fn season_path(&self, season: &Season, city: &City) -> PathBuf {
        self.processed_path(&format!(
            "{}_{}_{}.csv",
            self.data.season_file_prefix,
            season.label(),
            city.file_key()
        ))
    }
}
