//! Chart data - bundle everything the dashboard plots into one JSON file.
//!
//! The bundle is built from an in-memory database loaded with the city
//! daily files and whichever frost files exist in the processed folder.

use chrono::NaiveDate;
use ft_core::annotation::{incident_markers, month_markers, today_marker, Marker};
use ft_core::city::City;
use ft_core::season::Season;
use ft_data::frost::{
    average_depth, depth_points, freeze_thaw_points, span_points, FreezeThawPoint,
    FrostDepthPoint, FrostSpanPoint,
};
use ft_data::seasons::{summarize, SeasonSummary};
use ft_db::models::{CityInfo, DateSpan, SeasonDegreeDay};
use ft_db::Database;
use log::info;
use serde::Serialize;
use std::path::Path;

use crate::config::Config;

pub const FROST_DEPTH_FILE: &str = "frost_depth.csv";
pub const FROST_SPAN_FILE: &str = "frost_span.csv";
pub const FREEZE_THAW_FILE: &str = "frost_stlouis.csv";
pub const INCIDENTS_FILE: &str = "incidents.csv";

#[derive(Debug, Serialize)]
pub struct CitySeasons {
    pub city: String,
    /// First and last day on record, whatever the winter selection.
    pub date_span: Option<DateSpan>,
    pub summaries: Vec<SeasonSummary>,
}

#[derive(Debug, Serialize)]
pub struct ChartBundle {
    pub generated_on: NaiveDate,
    pub seasons: Vec<String>,
    pub cities: Vec<CityInfo>,
    pub degree_days: Vec<SeasonDegreeDay>,
    pub summaries: Vec<CitySeasons>,
    pub frost_depths: Vec<FrostDepthPoint>,
    pub average_frost_depth: Option<f64>,
    pub frost_spans: Vec<FrostSpanPoint>,
    pub freeze_thaw: Vec<FreezeThawPoint>,
    pub markers: Vec<Marker>,
}

/// Load every available file for `cities` into a fresh database.
pub fn load_database(config: &Config, cities: &[City]) -> anyhow::Result<Database> {
    let db = Database::new()?;
    db.load_cities(ft_core::city::CITIES_CSV)?;

    for city in cities {
        let path = config.city_daily_path(city);
        if path.exists() {
            db.load_daily_temps(&city.code, &std::fs::read_to_string(&path)?)?;
        } else {
            log::warn!("No daily temps for {} at {}", city.code, path.display());
        }
    }

    let frost_files: [(&str, fn(&Database, &str) -> anyhow::Result<()>); 4] = [
        (FROST_DEPTH_FILE, Database::load_frost_depths),
        (FROST_SPAN_FILE, Database::load_frost_spans),
        (FREEZE_THAW_FILE, Database::load_freeze_thaw),
        (INCIDENTS_FILE, Database::load_incidents),
    ];
    for (name, load) in frost_files {
        let path = config.processed_path(name);
        if path.exists() {
            load(&db, &std::fs::read_to_string(&path)?)?;
        } else {
            info!("Skipping {}, not found", path.display());
        }
    }
    Ok(db)
}

/// Assemble the bundle for the selected cities and winters.
///
/// An empty `seasons` slice selects every winter that has data.
pub fn build_chart_bundle(
    db: &Database,
    cities: &[City],
    seasons: &[Season],
    today: NaiveDate,
) -> anyhow::Result<ChartBundle> {
    let mut degree_days = Vec::new();
    let mut summaries = Vec::new();
    for city in cities {
        let rows = db.query_season_degree_days(&city.code, seasons)?;
        degree_days.extend(rows.iter().map(|row| SeasonDegreeDay::new(&city.code, row)));
        summaries.push(CitySeasons {
            city: city.code.clone(),
            date_span: db.query_date_range(&city.code)?,
            summaries: summarize(&rows),
        });
    }

    let mut season_labels: Vec<String> = degree_days.iter().map(|d| d.season.clone()).collect();
    season_labels.sort();
    season_labels.dedup();

    let in_selection = |season: &Season| seasons.is_empty() || seasons.contains(season);

    // normalized against the selected winters only
    let depths: Vec<_> = db
        .query_frost_depths()?
        .into_iter()
        .filter(|d| in_selection(&d.season))
        .collect();
    let frost_depths = depth_points(&depths);
    let spans: Vec<_> = db
        .query_frost_spans()?
        .into_iter()
        .filter(|s| in_selection(&s.season()))
        .collect();
    let frost_spans = span_points(&spans);
    let readings: Vec<_> = db
        .query_freeze_thaw()?
        .into_iter()
        .filter(|r| in_selection(&Season::for_date(&r.date)))
        .collect();
    let freeze_thaw = freeze_thaw_points(&readings);

    let incidents = db.query_incidents()?;
    let incident_seasons: Vec<Season> = if seasons.is_empty() {
        incidents.iter().map(|i| i.season).collect()
    } else {
        seasons.to_vec()
    };
    let mut markers = month_markers();
    markers.push(today_marker(&today));
    markers.extend(incident_markers(&incidents, &incident_seasons));

    Ok(ChartBundle {
        generated_on: today,
        seasons: season_labels,
        cities: db
            .query_cities()?
            .into_iter()
            .filter(|c| cities.iter().any(|city| city.code == c.code))
            .collect(),
        degree_days,
        summaries,
        average_frost_depth: average_depth(&depths),
        frost_depths,
        frost_spans,
        freeze_thaw,
        markers,
    })
}

/// Write the bundle as pretty JSON. No city codes means every tracked city.
pub fn run_chart_data(
    config: &Config,
    city_codes: &[String],
    winters: &[String],
    output: &Path,
    today: NaiveDate,
) -> anyhow::Result<ChartBundle> {
    let cities = if city_codes.is_empty() {
        City::get_city_vector()?
    } else {
        city_codes
            .iter()
            .map(|code| City::find(code))
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    let seasons = winters
        .iter()
        .map(|w| w.parse::<Season>())
        .collect::<Result<Vec<_>, _>>()?;

    let db = load_database(config, &cities)?;
    let bundle = build_chart_bundle(&db, &cities, &seasons, today)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&bundle)?)?;
    info!(
        "Wrote {} degree-day rows for {} cities to {}",
        bundle.degree_days.len(),
        bundle.cities.len(),
        output.display()
    );
    Ok(bundle)
}
