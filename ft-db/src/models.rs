//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be written into the chart
//! data bundle as JSON.

use crate::DATE_FORMAT;
use ft_core::degree_days::EnrichedObservation;
use serde::Serialize;

/// A tracked town as stored in the `cities` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityInfo {
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One day of a city's winter, ready to plot on a season overlay chart.
///
/// `day_index` counts the rows of the season so far (0 = first row), while
/// `days_after_jul_1` is the calendar position; they differ only when the
/// daily file has gaps.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeasonDegreeDay {
    pub city: String,
    /// Winter label, e.g. "2022-2023".
    pub season: String,
    /// Calendar date (YYYY-MM-DD).
    pub date: String,
    pub day_index: usize,
    pub days_after_jul_1: i64,
    pub avg_temp_f: Option<f64>,
    pub cumulative_cold: Option<i64>,
    pub cumulative_hot: Option<i64>,
}

impl SeasonDegreeDay {
    pub fn new(city: &str, row: &EnrichedObservation) -> Self {
        SeasonDegreeDay {
            city: city.to_string(),
            season: row.season_label.clone(),
            date: row.date.format(DATE_FORMAT).to_string(),
            day_index: row.day_index,
            days_after_jul_1: row.days_after_jul_1,
            avg_temp_f: row.avg_temp_f,
            cumulative_cold: row.cumulative_cold,
            cumulative_hot: row.cumulative_hot,
        }
    }
}

/// First and last stored date (YYYY-MM-DD) of a city's daily record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DateSpan {
    pub first: String,
    pub last: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ft_core::degree_days::compute_degree_days;
    use ft_core::observation::DailyObservation;

    #[test]
    fn season_degree_day_from_enriched_row() {
        let rows = compute_degree_days(&[DailyObservation::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            Some(20.0),
        )]);
        let point = SeasonDegreeDay::new("ELY", &rows[0]);
        assert_eq!(point.city, "ELY");
        assert_eq!(point.season, "2022-2023");
        assert_eq!(point.date, "2023-01-01");
        assert_eq!(point.days_after_jul_1, 184);
        assert_eq!(point.cumulative_cold, Some(12));
    }
}
