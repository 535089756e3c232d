//! Winter season cohort assignment and cumulative degree-day accumulation.
//!
//! Each daily average temperature is compared against freezing (32°F). Days
//! below freezing add whole "cold" degrees, days above add "hot" (thaw)
//! degrees. Both are summed within a winter season (July 1 to June 30) and
//! restart at the first row of every season.

use crate::date_range::DateRange;
use crate::observation::DailyObservation;
use crate::season::{days_after_jul_1, Season};
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use csv::WriterBuilder;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Freezing point in degrees Fahrenheit.
pub const FREEZING_F: f64 = 32.0;

/// One daily observation enriched with its season and running degree-day totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedObservation {
    pub date: NaiveDate,
    /// Daily average rounded to a whole degree (ties to even).
    pub avg_temp_f: Option<f64>,
    pub season_label: String,
    /// Position of the row within its season (present rows only, not calendar days).
    pub day_index: usize,
    /// Calendar days since July 1 of the season.
    pub days_after_jul_1: i64,
    pub cold_degrees: Option<i64>,
    pub hot_degrees: Option<i64>,
    pub cumulative_cold: Option<i64>,
    pub cumulative_hot: Option<i64>,
}

#[derive(Debug, Default)]
struct SeasonTally {
    rows: usize,
    cold: i64,
    hot: i64,
}

/// Round to the nearest whole degree, ties to even.
pub fn round_temperature(temp_f: f64) -> f64 {
    temp_f.round_ties_even()
}

/// Whole degrees below freezing, zero at or above freezing.
pub fn cold_degrees(temp_f: f64) -> i64 {
    (FREEZING_F - round_temperature(temp_f)).round().max(0.0) as i64
}

/// Whole degrees above freezing, zero at or below freezing.
pub fn hot_degrees(temp_f: f64) -> i64 {
    (round_temperature(temp_f) - FREEZING_F).round().max(0.0) as i64
}

/// Enrich every record with its season, in-season index and running totals.
///
/// Output has the same length and order as the input. Records are grouped by
/// season; within a season the presentation order is kept, so callers should
/// pass records sorted by date. A record with no temperature gets `None` for
/// its degree fields and running totals, and later records of the same season
/// keep accumulating from the last present value.
pub fn compute_degree_days(records: &[DailyObservation]) -> Vec<EnrichedObservation> {
    let mut tallies: HashMap<Season, SeasonTally> = HashMap::new();
    let mut enriched = Vec::with_capacity(records.len());

    for record in records {
        let season = Season::for_date(&record.date);
        let tally = tallies.entry(season).or_default();
        let day_index = tally.rows;
        tally.rows += 1;

        let avg_temp_f = record.avg_temp_f.map(round_temperature);
        let cold = avg_temp_f.map(cold_degrees);
        let hot = avg_temp_f.map(hot_degrees);
        let (cumulative_cold, cumulative_hot) = match (cold, hot) {
            (Some(c), Some(h)) => {
                // extreme inputs saturate instead of overflowing
                tally.cold = tally.cold.saturating_add(c);
                tally.hot = tally.hot.saturating_add(h);
                (Some(tally.cold), Some(tally.hot))
            }
            _ => (None, None),
        };

        enriched.push(EnrichedObservation {
            date: record.date,
            avg_temp_f,
            season_label: season.label(),
            day_index,
            days_after_jul_1: days_after_jul_1(&record.date),
            cold_degrees: cold,
            hot_degrees: hot,
            cumulative_cold,
            cumulative_hot,
        });
    }

    enriched
}

/// Calendar days of a season with no record, from July 1 up to the last
/// observed date of that season. Gaps compress the `day_index` axis, so
/// callers use this to flag seasons where it differs from `days_after_jul_1`.
pub fn missing_days(records: &[DailyObservation], season: &Season) -> Vec<NaiveDate> {
    let present: HashSet<NaiveDate> = records
        .iter()
        .filter(|r| season.contains(&r.date))
        .map(|r| r.date)
        .collect();
    let last = match present.iter().max() {
        Some(d) => *d,
        None => return Vec::new(),
    };
    DateRange(season.start_date(), last)
        .filter(|d| !present.contains(d))
        .collect()
}

#[derive(Debug, Serialize)]
struct SeasonRow {
    #[serde(rename = "IYEAR")]
    year: i32,
    #[serde(rename = "IMONTH")]
    month: u32,
    #[serde(rename = "IDAY")]
    day: u32,
    #[serde(rename = "AVG_DAILY_TEMP_F")]
    avg_temp_f: Option<f64>,
    #[serde(rename = "DATE")]
    date: String,
    #[serde(rename = "COLD_F")]
    cold: Option<i64>,
    #[serde(rename = "HOT_F")]
    hot: Option<i64>,
    #[serde(rename = "INDEX")]
    index: usize,
    #[serde(rename = "CUMM_COLD_F")]
    cumulative_cold: Option<i64>,
    #[serde(rename = "CUMM_HOT_F")]
    cumulative_hot: Option<i64>,
}

impl From<&EnrichedObservation> for SeasonRow {
    fn from(value: &EnrichedObservation) -> Self {
        SeasonRow {
            year: value.date.year(),
            month: value.date.month(),
            day: value.date.day(),
            avg_temp_f: value.avg_temp_f,
            date: value.date.format("%Y-%m-%d").to_string(),
            cold: value.cold_degrees,
            hot: value.hot_degrees,
            index: value.day_index,
            cumulative_cold: value.cumulative_cold,
            cumulative_hot: value.cumulative_hot,
        }
    }
}

/// Serialize enriched rows in the per-season file layout:
/// `IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F,DATE,COLD_F,HOT_F,INDEX,CUMM_COLD_F,CUMM_HOT_F`.
pub fn to_season_csv(rows: &[EnrichedObservation]) -> anyhow::Result<String> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        wtr.serialize(SeasonRow::from(row))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush season CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
