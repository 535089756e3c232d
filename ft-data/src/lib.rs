//! Data preparation for temperature and frost records.
//!
//! This crate turns raw hourly readings into daily averages, splits enriched
//! rows into winter seasons and summarizes them, and prepares frost
//! records for charting.

/// Hourly to daily aggregation.
pub mod hourly {
    use ft_core::observation::{DailyObservation, HourlyReading, HOURLY_SOURCE_CODE};
    use std::collections::BTreeMap;

    /// Average the readings of `HOURLY_SOURCE_CODE` into one row per day.
    ///
    /// Missing temperatures are left out of the mean; a day whose readings are
    /// all missing is kept with `None`. Output is ordered by date.
    pub fn aggregate_daily(readings: &[HourlyReading]) -> Vec<DailyObservation> {
        let mut days: BTreeMap<chrono::NaiveDate, (f64, u32)> = BTreeMap::new();
        for reading in readings.iter().filter(|r| r.source == HOURLY_SOURCE_CODE) {
            let entry = days.entry(reading.date).or_insert((0.0, 0));
            if let Some(temp) = reading.temp_f {
                entry.0 += temp;
                entry.1 += 1;
            }
        }

        log::info!(
            "Aggregated {} hourly readings into {} days",
            readings.len(),
            days.len()
        );

        days.into_iter()
            .map(|(date, (sum, count))| {
                let avg = if count > 0 {
                    Some(sum / count as f64)
                } else {
                    None
                };
                DailyObservation::new(date, avg)
            })
            .collect()
    }

}

/// Season splitting and per-season summaries.
pub mod seasons {
    use chrono::NaiveDate;
    use ft_core::degree_days::EnrichedObservation;
    use ft_core::season::Season;
    use serde::Serialize;
    use std::collections::BTreeMap;

    /// A single notable day of a season.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct DayTemp {
        pub date: NaiveDate,
        pub avg_temp_f: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct SeasonSummary {
        pub season_label: String,
        pub rows: usize,
        pub missing_temp_rows: usize,
        pub final_cumulative_cold: Option<i64>,
        pub final_cumulative_hot: Option<i64>,
        pub coldest_day: Option<DayTemp>,
        pub warmest_day: Option<DayTemp>,
        /// Largest final cumulative cold of all summarized seasons.
        pub harshest: bool,
        /// Smallest final cumulative cold of all summarized seasons.
        pub mildest: bool,
    }

    /// Group enriched rows by season, keeping row order inside each season.
    pub fn split_by_season(
        rows: &[EnrichedObservation],
    ) -> BTreeMap<Season, Vec<EnrichedObservation>> {
        let mut seasons: BTreeMap<Season, Vec<EnrichedObservation>> = BTreeMap::new();
        for row in rows {
            seasons
                .entry(Season::for_date(&row.date))
                .or_default()
                .push(row.clone());
        }
        seasons
    }

    fn summarize_one(season: &Season, rows: &[EnrichedObservation]) -> SeasonSummary {
        let present = || {
            rows.iter()
                .filter_map(|r| r.avg_temp_f.map(|t| DayTemp { date: r.date, avg_temp_f: t }))
        };
        let coldest_day = present().fold(None, |acc: Option<DayTemp>, day| match acc {
            Some(best) if best.avg_temp_f <= day.avg_temp_f => Some(best),
            _ => Some(day),
        });
        let warmest_day = present().fold(None, |acc: Option<DayTemp>, day| match acc {
            Some(best) if best.avg_temp_f >= day.avg_temp_f => Some(best),
            _ => Some(day),
        });

        SeasonSummary {
            season_label: season.label(),
            rows: rows.len(),
            missing_temp_rows: rows.iter().filter(|r| r.avg_temp_f.is_none()).count(),
            final_cumulative_cold: rows.iter().rev().find_map(|r| r.cumulative_cold),
            final_cumulative_hot: rows.iter().rev().find_map(|r| r.cumulative_hot),
            coldest_day,
            warmest_day,
            harshest: false,
            mildest: false,
        }
    }

    /// One summary per season present in `rows`, oldest first.
    pub fn summarize(rows: &[EnrichedObservation]) -> Vec<SeasonSummary> {
        let mut summaries: Vec<SeasonSummary> = split_by_season(rows)
            .iter()
            .map(|(season, season_rows)| summarize_one(season, season_rows))
            .collect();

        let harshest = summaries
            .iter()
            .filter_map(|s| s.final_cumulative_cold)
            .max();
        let mildest = summaries
            .iter()
            .filter_map(|s| s.final_cumulative_cold)
            .min();
        for summary in summaries.iter_mut() {
            if let Some(cold) = summary.final_cumulative_cold {
                summary.harshest = Some(cold) == harshest;
                summary.mildest = Some(cold) == mildest;
            }
        }
        summaries
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ft_core::degree_days::compute_degree_days;
        use ft_core::observation::DailyObservation;

        fn obs(y: i32, m: u32, d: u32, temp: Option<f64>) -> DailyObservation {
            DailyObservation::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), temp)
        }

        fn sample() -> Vec<EnrichedObservation> {
            compute_degree_days(&[
                obs(2020, 12, 1, Some(10.0)),
                obs(2020, 12, 2, Some(-5.0)),
                obs(2020, 12, 3, None),
                obs(2021, 12, 1, Some(30.0)),
                obs(2021, 12, 2, Some(40.0)),
            ])
        }

        #[test]
        fn test_split_by_season() {
            let seasons = split_by_season(&sample());
            assert_eq!(seasons.len(), 2);
            assert_eq!(seasons[&Season::new(2020)].len(), 3);
            assert_eq!(seasons[&Season::new(2021)][1].day_index, 1);
        }

        #[test]
        fn test_summarize() {
            let summaries = summarize(&sample());
            assert_eq!(summaries.len(), 2);

            let first = &summaries[0];
            assert_eq!(first.season_label, "2020-2021");
            assert_eq!(first.rows, 3);
            assert_eq!(first.missing_temp_rows, 1);
            assert_eq!(first.final_cumulative_cold, Some(22 + 37));
            assert_eq!(first.coldest_day.as_ref().unwrap().avg_temp_f, -5.0);
            assert_eq!(
                first.warmest_day.as_ref().unwrap().date,
                NaiveDate::from_ymd_opt(2020, 12, 1).unwrap()
            );
            assert!(first.harshest);
            assert!(!first.mildest);

            let second = &summaries[1];
            assert_eq!(second.final_cumulative_cold, Some(2));
            assert_eq!(second.final_cumulative_hot, Some(8));
            assert!(second.mildest);
            assert!(!second.harshest);
        }

        #[test]
        fn test_summarize_all_missing() {
            let rows = compute_degree_days(&[obs(2022, 8, 1, None)]);
            let summaries = summarize(&rows);
            assert_eq!(summaries[0].final_cumulative_cold, None);
            assert_eq!(summaries[0].coldest_day, None);
            assert!(!summaries[0].harshest);
        }
    }
}

/// Frost records prepared for charting.
pub mod frost {
    use chrono::NaiveDate;
    use ft_core::frost::{FreezeThawReading, FrostDepth, FrostSpan};
    use ft_core::season::{days_after_jul_1, Season};
    use serde::Serialize;

    /// Scale `value` into 0..=1 against `min..=max`; 0 when the range is empty.
    pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
        if max > min {
            (value - min) / (max - min)
        } else {
            0.0
        }
    }

    fn min_max<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FrostDepthPoint {
        pub season_label: String,
        pub max_depth_in: f64,
        pub normalized_depth: f64,
    }

    pub fn depth_points(depths: &[FrostDepth]) -> Vec<FrostDepthPoint> {
        let Some((min, max)) = min_max(depths.iter().map(|d| d.max_depth_in)) else {
            return Vec::new();
        };
        depths
            .iter()
            .map(|d| FrostDepthPoint {
                season_label: d.season.label(),
                max_depth_in: d.max_depth_in,
                normalized_depth: normalize(d.max_depth_in, min, max),
            })
            .collect()
    }

    pub fn average_depth(depths: &[FrostDepth]) -> Option<f64> {
        if depths.is_empty() {
            return None;
        }
        Some(depths.iter().map(|d| d.max_depth_in).sum::<f64>() / depths.len() as f64)
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FrostSpanPoint {
        pub season_label: String,
        pub start: NaiveDate,
        pub end: NaiveDate,
        pub duration_days: i64,
        /// Days from July 1 of the start year to the first frost.
        pub days_after_jul_1: i64,
        pub normalized_duration: f64,
    }

    pub fn span_points(spans: &[FrostSpan]) -> Vec<FrostSpanPoint> {
        let Some((min, max)) = min_max(spans.iter().map(|s| s.duration_days() as f64)) else {
            return Vec::new();
        };
        spans
            .iter()
            .map(|span| {
                let season = span.season();
                FrostSpanPoint {
                    season_label: season.label(),
                    start: span.start,
                    end: span.end,
                    duration_days: span.duration_days(),
                    days_after_jul_1: (span.start - season.start_date()).num_days(),
                    normalized_duration: normalize(span.duration_days() as f64, min, max),
                }
            })
            .collect()
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FreezeThawPoint {
        pub county: String,
        pub season_label: String,
        pub date: NaiveDate,
        pub days_after_jul_1: i64,
        pub thaw_depth_in: Option<f64>,
        pub frost_depth_in: Option<f64>,
    }

    /// Readings tagged with their winter, ordered by season then day.
    pub fn freeze_thaw_points(readings: &[FreezeThawReading]) -> Vec<FreezeThawPoint> {
        let mut points: Vec<FreezeThawPoint> = readings
            .iter()
            .map(|r| FreezeThawPoint {
                county: r.county.clone(),
                season_label: Season::for_date(&r.date).label(),
                date: r.date,
                days_after_jul_1: days_after_jul_1(&r.date),
                thaw_depth_in: r.thaw_depth_in,
                frost_depth_in: r.frost_depth_in,
            })
            .collect();
        points.sort_by(|a, b| {
            a.season_label
                .cmp(&b.season_label)
                .then(a.days_after_jul_1.cmp(&b.days_after_jul_1))
        });
        points
    }

}
