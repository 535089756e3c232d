use anyhow::anyhow;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded registry of the towns tracked by the dashboard.
pub static CITIES_CSV: &str = include_str!("../../fixtures/cities.csv");

/// A town with its own daily temperature record.
///
/// The code is the short upper-case key used in file names (lower-cased)
/// and chart legends, e.g. `ELY` -> `daily_temps_ely.csv`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct City {
    /// Short identifier (e.g., "ELY")
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl City {
    /// Parse a CSV string of city data into a vector of Cities.
    ///
    /// Expected CSV columns: code, name, latitude, longitude
    pub fn parse_city_csv(csv_object: &str) -> anyhow::Result<Vec<City>> {
        let mut city_list: Vec<City> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let code = record
                .get(0)
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow!("City row without a code: {:?}", record))?;
            let name = record.get(1).unwrap_or("").trim().to_string();
            let latitude = record
                .get(2)
                .unwrap_or("0.0")
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0);
            let longitude = record
                .get(3)
                .unwrap_or("0.0")
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0);
            city_list.push(City {
                code,
                name,
                latitude,
                longitude,
            });
        }
        Ok(city_list)
    }

    /// All tracked cities from the embedded registry.
    pub fn get_city_vector() -> anyhow::Result<Vec<City>> {
        City::parse_city_csv(CITIES_CSV)
    }

    /// Look up a tracked city by code, ignoring case.
    pub fn find(code: &str) -> anyhow::Result<City> {
        let wanted = code.trim().to_uppercase();
        City::get_city_vector()?
            .into_iter()
            .find(|city| city.code == wanted)
            .ok_or_else(|| anyhow!("Unknown city {:?}", code))
    }

    /// Lower-case suffix used in per-city file names.
    pub fn file_key(&self) -> String {
        self.code.to_lowercase()
    }
}
