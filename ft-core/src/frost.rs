//! Frost records: maximum depth per winter, frost start/end spans,
//! freeze/thaw depth readings and incident dates.
//!
//! All dates in these files use the `YYYY/MM/DD` layout.

use crate::observation::parse_temperature;
use crate::season::Season;
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

/// Date layout used by the frost spreadsheets.
pub const FROST_DATE_FORMAT: &str = "%Y/%m/%d";

/// Deepest frost reached during one winter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrostDepth {
    pub season: Season,
    pub max_depth_in: f64,
}

/// First and last day of ground frost in one winter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrostSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One frost tube reading for a county.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreezeThawReading {
    pub county: String,
    pub date: NaiveDate,
    pub thaw_depth_in: Option<f64>,
    pub frost_depth_in: Option<f64>,
}

/// A day something froze or broke (e.g., a water line), marked on charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub season: Season,
    pub date: NaiveDate,
}

fn parse_frost_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), FROST_DATE_FORMAT)
        .with_context(|| format!("Invalid frost date {:?}", s))
}

fn field<'a>(record: &'a StringRecord, idx: usize, name: &str) -> anyhow::Result<&'a str> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("Missing column {} in row {:?}", name, record))
}

fn records(csv_object: &str) -> impl Iterator<Item = csv::Result<StringRecord>> + '_ {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_object.as_bytes())
        .into_records()
}

impl FrostDepth {
    /// Expected columns: `Winter,Max_Frost_Depth_in`. Rows without a depth are skipped.
    pub fn parse_csv(csv_object: &str) -> anyhow::Result<Vec<FrostDepth>> {
        let mut depths = Vec::new();
        for row in records(csv_object) {
            let record = row?;
            let season = field(&record, 0, "Winter")?.parse::<Season>()?;
            if let Some(max_depth_in) = record.get(1).and_then(parse_temperature) {
                depths.push(FrostDepth {
                    season,
                    max_depth_in,
                });
            }
        }
        Ok(depths)
    }
}

impl FrostSpan {
    /// Expected columns: `Frost_Start,Frost_End`.
    pub fn parse_csv(csv_object: &str) -> anyhow::Result<Vec<FrostSpan>> {
        let mut spans = Vec::new();
        for row in records(csv_object) {
            let record = row?;
            let start = parse_frost_date(field(&record, 0, "Frost_Start")?)?;
            let end = parse_frost_date(field(&record, 1, "Frost_End")?)?;
            spans.push(FrostSpan { start, end });
        }
        Ok(spans)
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Frost spans are labelled by the calendar year the frost started in.
    pub fn season(&self) -> Season {
        use chrono::Datelike;
        Season::new(self.start.year())
    }
}

impl FreezeThawReading {
    /// Expected columns:
    /// `County,Date,THAW_DEPTH_in,FROST_DEPTH_in,SECONDARY_FROST_DEPTH_in`.
    /// The secondary depth is ignored and rows with neither depth are dropped.
    pub fn parse_csv(csv_object: &str) -> anyhow::Result<Vec<FreezeThawReading>> {
        let mut readings = Vec::new();
        for row in records(csv_object) {
            let record = row?;
            let county = field(&record, 0, "County")?.to_string();
            let date = parse_frost_date(field(&record, 1, "Date")?)?;
            let thaw_depth_in = record.get(2).and_then(parse_temperature);
            let frost_depth_in = record.get(3).and_then(parse_temperature);
            if thaw_depth_in.is_none() && frost_depth_in.is_none() {
                continue;
            }
            readings.push(FreezeThawReading {
                county,
                date,
                thaw_depth_in,
                frost_depth_in,
            });
        }
        Ok(readings)
    }
}

impl Incident {
    /// Expected columns: `Winter,Date`.
    pub fn parse_csv(csv_object: &str) -> anyhow::Result<Vec<Incident>> {
        let mut incidents = Vec::new();
        for row in records(csv_object) {
            let record = row?;
            let season = field(&record, 0, "Winter")?.parse::<Season>()?;
            let date = parse_frost_date(field(&record, 1, "Date")?)?;
            incidents.push(Incident { season, date });
        }
        Ok(incidents)
    }
}
