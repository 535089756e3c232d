//! Per-season files and summaries for one city.

use ft_core::city::City;
use ft_core::date_range::DateRange;
use ft_core::degree_days::{compute_degree_days, missing_days, to_season_csv};
use ft_core::observation::DailyObservation;
use ft_core::season::Season;
use ft_data::seasons::{split_by_season, summarize, SeasonSummary};
use log::{info, warn};
use std::path::PathBuf;

use crate::config::Config;

/// Write one season CSV per winter in `first_year..=last_year` that has data.
///
/// Returns the paths written, oldest season first.
pub fn run_make_seasons(
    config: &Config,
    city_code: &str,
    first_year: i32,
    last_year: i32,
) -> anyhow::Result<Vec<PathBuf>> {
    let city = City::find(city_code)?;
    let mut observations = DailyObservation::read_daily_csv(&config.city_daily_path(&city))?;
    observations.sort_by_key(|obs| obs.date);

    let enriched = compute_degree_days(&observations);
    let by_season = split_by_season(&enriched);

    let mut written = Vec::new();
    for season in Season::range(first_year, last_year) {
        let rows = match by_season.get(&season) {
            Some(rows) if !rows.is_empty() => rows,
            _ => {
                info!("No {} data for {}, skipping", city.code, season);
                continue;
            }
        };

        let gaps = missing_days(&observations, &season);
        if let (Some(first_gap), Some(last)) = (gaps.first(), rows.last()) {
            let expected = DateRange(season.start_date(), last.date).num_days();
            warn!(
                "{} {} is missing {} of {} days (first {}); INDEX will lag days after Jul 1",
                city.code,
                season,
                gaps.len(),
                expected,
                first_gap
            );
        }

        let path = config.season_path(&season, &city);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, to_season_csv(rows)?)?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// One line per season, e.g.
/// `2021-2022  rows 365  missing 0  cold 5120  hot 6890  coldest 2022-01-26 (-21)  HARSHEST`.
pub fn format_summary(summary: &SeasonSummary) -> String {
    let opt = |v: Option<i64>| v.map_or("-".to_string(), |v| v.to_string());
    let mut line = format!(
        "{}  rows {}  missing {}  cold {}  hot {}",
        summary.season_label,
        summary.rows,
        summary.missing_temp_rows,
        opt(summary.final_cumulative_cold),
        opt(summary.final_cumulative_hot),
    );
    if let Some(day) = &summary.coldest_day {
        line.push_str(&format!("  coldest {} ({})", day.date, day.avg_temp_f));
    }
    if let Some(day) = &summary.warmest_day {
        line.push_str(&format!("  warmest {} ({})", day.date, day.avg_temp_f));
    }
    if summary.harshest {
        line.push_str("  HARSHEST");
    }
    if summary.mildest {
        line.push_str("  MILDEST");
    }
    line
}

pub fn run_summary(config: &Config, city_code: &str) -> anyhow::Result<Vec<SeasonSummary>> {
    let city = City::find(city_code)?;
    let mut observations = DailyObservation::read_daily_csv(&config.city_daily_path(&city))?;
    observations.sort_by_key(|obs| obs.date);

    let summaries = summarize(&compute_degree_days(&observations));
    println!("{} ({})", city.name, city.code);
    for summary in &summaries {
        println!("{}", format_summary(summary));
    }
    Ok(summaries)
}
