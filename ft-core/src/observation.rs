use anyhow::{anyhow, Context};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Column headers of a daily temperature file.
pub const DAILY_HEADERS: [&str; 4] = ["IYEAR", "IMONTH", "IDAY", "AVG_DAILY_TEMP_F"];

/// Hourly rows from this NOAA source code are the ones averaged into daily values.
pub const HOURLY_SOURCE_CODE: i32 = 7;

/// A single day's average temperature for one town.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    /// Degrees Fahrenheit. `None` when the source value is missing or non-numeric.
    pub avg_temp_f: Option<f64>,
}

/// A single hourly temperature reading from the raw NOAA export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyReading {
    pub source: i32,
    pub date: NaiveDate,
    pub temp_f: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    #[serde(rename = "IYEAR")]
    year: String,
    #[serde(rename = "IMONTH")]
    month: String,
    #[serde(rename = "IDAY")]
    day: String,
    #[serde(rename = "AVG_DAILY_TEMP_F", default)]
    avg_temp_f: String,
}

#[derive(Debug, Deserialize)]
struct HourlyRow {
    #[serde(rename = "SOURCE")]
    source: String,
    #[serde(rename = "IYEAR")]
    year: String,
    #[serde(rename = "IMONTH")]
    month: String,
    #[serde(rename = "IDAY")]
    day: String,
    #[serde(rename = "TMP_F", default)]
    temp_f: String,
}

/// Parse a numeric field leniently: blanks, "NaN" and text become `None`.
pub fn parse_temperature(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Year/month/day columns are sometimes written as floats ("2010.0").
fn parse_date_part(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v as i64))
}

fn ymd_to_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let y = parse_date_part(year)?;
    let m = parse_date_part(month)?;
    let d = parse_date_part(day)?;
    NaiveDate::from_ymd_opt(i32::try_from(y).ok()?, u32::try_from(m).ok()?, u32::try_from(d).ok()?)
}

impl DailyObservation {
    pub fn new(date: NaiveDate, avg_temp_f: Option<f64>) -> Self {
        DailyObservation { date, avg_temp_f }
    }

    /// Parse a daily temperature CSV string (with headers) into observations.
    ///
    /// Expected columns: `IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F`. Extra columns are ignored.
    /// An invalid date is an error; a non-numeric temperature is kept as `None`.
    pub fn parse_daily_csv(csv_object: &str) -> anyhow::Result<Vec<DailyObservation>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut observations = Vec::new();
        for (line, row) in rdr.deserialize::<DailyRow>().enumerate() {
            let row = row.with_context(|| format!("Failed to parse daily row {}", line + 1))?;
            let date = ymd_to_date(&row.year, &row.month, &row.day).ok_or_else(|| {
                anyhow!(
                    "Invalid date {}-{}-{} on daily row {}",
                    row.year,
                    row.month,
                    row.day,
                    line + 1
                )
            })?;
            observations.push(DailyObservation::new(date, parse_temperature(&row.avg_temp_f)));
        }
        Ok(observations)
    }

    /// Read a daily temperature CSV file.
    pub fn read_daily_csv(path: &Path) -> anyhow::Result<Vec<DailyObservation>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read daily temps from {}", path.display()))?;
        let observations = DailyObservation::parse_daily_csv(&contents)?;
        log::info!("Read {} daily rows from {}", observations.len(), path.display());
        Ok(observations)
    }

    /// Serialize observations to a daily temperature CSV string (with headers).
    pub fn to_daily_csv(observations: &[DailyObservation]) -> anyhow::Result<String> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        wtr.write_record(DAILY_HEADERS)?;
        for obs in observations {
            wtr.write_record([
                obs.date.year().to_string(),
                obs.date.month().to_string(),
                obs.date.day().to_string(),
                obs.avg_temp_f.map_or(String::new(), |t| t.to_string()),
            ])?;
        }
        let bytes = wtr.into_inner().map_err(|e| anyhow!("Failed to flush CSV: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Write observations to a daily temperature CSV file, replacing it.
    pub fn write_daily_csv(path: &Path, observations: &[DailyObservation]) -> anyhow::Result<()> {
        let output = DailyObservation::to_daily_csv(observations)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write daily temps to {}", path.display()))?;
        log::info!("Wrote {} daily rows to {}", observations.len(), path.display());
        Ok(())
    }

    /// Check if we already have a row for a given date.
    pub fn contains_date(observations: &[DailyObservation], date: &NaiveDate) -> bool {
        observations.iter().any(|obs| obs.date == *date)
    }
}

impl HourlyReading {
    /// Parse the raw hourly CSV export (with headers).
    ///
    /// Only `SOURCE,IYEAR,IMONTH,IDAY,TMP_F` are read; other columns are ignored.
    /// Rows whose date cannot be built are skipped with a warning.
    pub fn parse_hourly_csv(csv_object: &str) -> anyhow::Result<Vec<HourlyReading>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut readings = Vec::new();
        let mut skipped = 0u32;
        for row in rdr.deserialize::<HourlyRow>() {
            let row = row?;
            let date = match ymd_to_date(&row.year, &row.month, &row.day) {
                Some(d) => d,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let source = parse_date_part(&row.source).unwrap_or_default() as i32;
            readings.push(HourlyReading {
                source,
                date,
                temp_f: parse_temperature(&row.temp_f),
            });
        }
        if skipped > 0 {
            log::warn!("Skipped {} hourly rows with invalid dates", skipped);
        }
        Ok(readings)
    }
}

#[cfg(test)]
mod test {
    use super::{DailyObservation, HourlyReading};
    use chrono::NaiveDate;

    const DAILY_CSV: &str = r#"IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F
2022,12,30,-4.25
2022,12,31,10.5
2023,1,1,
2023,1,2,NaN
"#;

    #[test]
    fn test_parse_daily_csv() {
        let observations = DailyObservation::parse_daily_csv(DAILY_CSV).unwrap();
        assert_eq!(observations.len(), 4);
        assert_eq!(observations[0].date, NaiveDate::from_ymd_opt(2022, 12, 30).unwrap());
        assert_eq!(observations[0].avg_temp_f, Some(-4.25));
        assert_eq!(observations[1].avg_temp_f, Some(10.5));
        assert_eq!(observations[2].avg_temp_f, None);
        assert_eq!(observations[3].avg_temp_f, None);
    }

    #[test]
    fn test_parse_daily_csv_float_date_parts() {
        let csv = "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2010.0,7.0,1.0,61.2\n";
        let observations = DailyObservation::parse_daily_csv(csv).unwrap();
        assert_eq!(observations[0].date, NaiveDate::from_ymd_opt(2010, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_daily_csv_rejects_bad_date() {
        let csv = "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2023,2,30,12.0\n";
        assert!(DailyObservation::parse_daily_csv(csv).is_err());
    }

    #[test]
    fn test_daily_csv_write_then_read() {
        let observations = DailyObservation::parse_daily_csv(DAILY_CSV).unwrap();
        let written = DailyObservation::to_daily_csv(&observations).unwrap();
        assert!(written.starts_with("IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n"));
        assert!(written.contains("2023,1,1,\n"));
        let reread = DailyObservation::parse_daily_csv(&written).unwrap();
        assert_eq!(reread, observations);
    }

    #[test]
    fn test_daily_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_temps_ely.csv");
        let observations = DailyObservation::parse_daily_csv(DAILY_CSV).unwrap();
        DailyObservation::write_daily_csv(&path, &observations).unwrap();
        assert_eq!(DailyObservation::read_daily_csv(&path).unwrap(), observations);
        assert!(DailyObservation::read_daily_csv(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_contains_date() {
        let observations = DailyObservation::parse_daily_csv(DAILY_CSV).unwrap();
        let present = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        let absent = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        assert!(DailyObservation::contains_date(&observations, &present));
        assert!(!DailyObservation::contains_date(&observations, &absent));
    }

    #[test]
    fn test_parse_hourly_csv_ignores_extra_columns() {
        let csv = "\
SOURCE,IYEAR,IMONTH,IDAY,IHOUR,IMINUTE,TMP_C,TMP_F
7,2021,1,5,0,53,-10,14
4,2021,1,5,1,0,-11,12.2
7,2021,1,5,1,53,,
";
        let readings = HourlyReading::parse_hourly_csv(csv).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].source, 7);
        assert_eq!(readings[0].temp_f, Some(14.0));
        assert_eq!(readings[1].source, 4);
        assert_eq!(readings[2].temp_f, None);
    }
}
