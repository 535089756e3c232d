//! Typed query methods for retrieving temperature and frost data.
//!
//! # Winter Season Convention
//!
//! A winter season runs from July 1 through June 30 and is labelled by both
//! calendar years, so the 2022-2023 season spans July 1, 2022 through
//! June 30, 2023. Degree days restart at the first row of each season, which
//! lets different winters be overlaid on the same "days after July 1" axis.

use crate::models::{CityInfo, DateSpan};
use crate::{Database, DATE_FORMAT};
use chrono::NaiveDate;
use ft_core::degree_days::{compute_degree_days, EnrichedObservation};
use ft_core::frost::{FreezeThawReading, FrostDepth, FrostSpan, Incident};
use ft_core::observation::DailyObservation;
use ft_core::season::Season;
use rusqlite::params;

fn parse_stored_date(s: &str) -> anyhow::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

impl Database {
    // ───────────────────── Temperature Queries ─────────────────────

    /// All tracked cities, ordered by code.
    pub fn query_cities(&self) -> anyhow::Result<Vec<CityInfo>> {
        let conn = self.conn.borrow();
        let mut stmt =
            conn.prepare("SELECT code, name, latitude, longitude FROM cities ORDER BY code")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CityInfo {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[FT] query: query_cities returned {} records", rows.len());
        Ok(rows)
    }

    /// A city's daily record ordered by date.
    pub fn query_daily_observations(&self, city: &str) -> anyhow::Result<Vec<DailyObservation>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, avg_temp_f FROM daily_temps
             WHERE city = ?1
             ORDER BY date",
        )?;
        let raw_rows: Vec<(String, Option<f64>)> = stmt
            .query_map(params![city.trim().to_uppercase()], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(raw_rows.len());
        for (date_str, avg_temp_f) in raw_rows {
            results.push(DailyObservation::new(parse_stored_date(&date_str)?, avg_temp_f));
        }
        log::info!(
            "[FT] query: query_daily_observations returned {} records",
            results.len()
        );
        Ok(results)
    }

    /// Cumulative degree days for a city, restricted to `seasons`.
    ///
    /// The whole record is accumulated first so every season starts from its
    /// own first row; an empty `seasons` slice returns every season.
    pub fn query_season_degree_days(
        &self,
        city: &str,
        seasons: &[Season],
    ) -> anyhow::Result<Vec<EnrichedObservation>> {
        let observations = self.query_daily_observations(city)?;
        let results: Vec<EnrichedObservation> = compute_degree_days(&observations)
            .into_iter()
            .filter(|row| seasons.is_empty() || seasons.contains(&Season::for_date(&row.date)))
            .collect();
        log::info!(
            "[FT] query: query_season_degree_days returned {} records",
            results.len()
        );
        Ok(results)
    }

    /// First and last stored date for a city, `None` when it has no rows.
    pub fn query_date_range(&self, city: &str) -> anyhow::Result<Option<DateSpan>> {
        let conn = self.conn.borrow();
        let (first, last): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(date), MAX(date) FROM daily_temps WHERE city = ?1",
            params![city.trim().to_uppercase()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(match (first, last) {
            (Some(first), Some(last)) => Some(DateSpan { first, last }),
            _ => None,
        })
    }

    // ───────────────────── Frost Queries ─────────────────────

    /// Maximum frost depth per winter, oldest first.
    pub fn query_frost_depths(&self) -> anyhow::Result<Vec<FrostDepth>> {
        let conn = self.conn.borrow();
        let mut stmt =
            conn.prepare("SELECT winter, max_depth_in FROM frost_depths ORDER BY winter")?;
        let raw_rows: Vec<(String, f64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(raw_rows.len());
        for (winter, max_depth_in) in raw_rows {
            results.push(FrostDepth {
                season: winter.parse::<Season>()?,
                max_depth_in,
            });
        }
        log::info!("[FT] query: query_frost_depths returned {} records", results.len());
        Ok(results)
    }

    /// Frost start/end spans ordered by start date.
    pub fn query_frost_spans(&self) -> anyhow::Result<Vec<FrostSpan>> {
        let conn = self.conn.borrow();
        let mut stmt =
            conn.prepare("SELECT frost_start, frost_end FROM frost_spans ORDER BY frost_start")?;
        let raw_rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(raw_rows.len());
        for (start, end) in raw_rows {
            results.push(FrostSpan {
                start: parse_stored_date(&start)?,
                end: parse_stored_date(&end)?,
            });
        }
        log::info!("[FT] query: query_frost_spans returned {} records", results.len());
        Ok(results)
    }

    /// Freeze/thaw readings ordered by county then date.
    pub fn query_freeze_thaw(&self) -> anyhow::Result<Vec<FreezeThawReading>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT county, date, thaw_depth_in, frost_depth_in FROM freeze_thaw
             ORDER BY county, date",
        )?;
        let raw_rows: Vec<(String, String, Option<f64>, Option<f64>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(raw_rows.len());
        for (county, date, thaw_depth_in, frost_depth_in) in raw_rows {
            results.push(FreezeThawReading {
                county,
                date: parse_stored_date(&date)?,
                thaw_depth_in,
                frost_depth_in,
            });
        }
        log::info!("[FT] query: query_freeze_thaw returned {} records", results.len());
        Ok(results)
    }

    /// Incident dates ordered by date.
    pub fn query_incidents(&self) -> anyhow::Result<Vec<Incident>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT winter, date FROM incidents ORDER BY date")?;
        let raw_rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(raw_rows.len());
        for (winter, date) in raw_rows {
            results.push(Incident {
                season: winter.parse::<Season>()?,
                date: parse_stored_date(&date)?,
            });
        }
        log::info!("[FT] query: query_incidents returned {} records", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ely daily temps spanning the 2020-2021 / 2021-2022 boundary.
    fn sample_temps_db() -> Database {
        let db = Database::new().unwrap();
        db.load_cities(ft_core::city::CITIES_CSV).unwrap();
        let daily_csv = "\
IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F
2021,7,2,35
2021,6,30,40
2021,7,1,20
";
        db.load_daily_temps("ELY", daily_csv).unwrap();
        db.load_daily_temps("ORR", "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2022,1,1,-10\n")
            .unwrap();
        db
    }

    #[test]
    fn query_cities_ordered_by_code() {
        let db = sample_temps_db();
        let cities = db.query_cities().unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].code, "ELY");
        assert_eq!(cities[1].name, "Orr, MN");
    }

    #[test]
    fn query_daily_observations_sorted_by_date() {
        let db = sample_temps_db();
        let obs = db.query_daily_observations("ely").unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
        assert_eq!(obs[2].avg_temp_f, Some(35.0));
    }

    #[test]
    fn query_season_degree_days_all_seasons() {
        let db = sample_temps_db();
        let rows = db.query_season_degree_days("ELY", &[]).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].season_label, "2020-2021");
        assert_eq!(rows[0].cumulative_hot, Some(8));

        assert_eq!(rows[1].season_label, "2021-2022");
        assert_eq!(rows[1].day_index, 0);
        assert_eq!(rows[1].cumulative_cold, Some(12));

        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2021, 7, 2).unwrap());
        assert_eq!(rows[2].day_index, 1);
        assert_eq!(rows[2].cumulative_cold, Some(12));
        assert_eq!(rows[2].cumulative_hot, Some(3));
    }

    #[test]
    fn query_season_degree_days_filters_seasons() {
        let db = sample_temps_db();
        let rows = db
            .query_season_degree_days("ELY", &[Season::new(2021)])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.season_label == "2021-2022"));
        assert_eq!(rows[0].day_index, 0);
    }

    #[test]
    fn query_season_degree_days_unknown_city() {
        let db = sample_temps_db();
        assert!(db.query_season_degree_days("DULUTH", &[]).unwrap().is_empty());
    }

    #[test]
    fn query_date_range() {
        let db = sample_temps_db();
        let span = db.query_date_range("ELY").unwrap().unwrap();
        assert_eq!(span.first, "2021-06-30");
        assert_eq!(span.last, "2021-07-02");
        assert_eq!(db.query_date_range("DULUTH").unwrap(), None);
    }

    #[test]
    fn query_frost_records() {
        let db = Database::new().unwrap();
        db.load_frost_depths("Winter,Max_Frost_Depth_in\n2021-2022,60\n2020-2021,48\n")
            .unwrap();
        db.load_frost_spans("Frost_Start,Frost_End\n2021/11/20,2022/05/02\n2020/11/01,2021/04/01\n")
            .unwrap();
        db.load_freeze_thaw(
            "County,Date,THAW_DEPTH_in,FROST_DEPTH_in,SECONDARY_FROST_DEPTH_in\n\
             St. Louis,2023/03/01,4,50,\n\
             St. Louis,2023/01/10,,42,\n",
        )
        .unwrap();
        db.load_incidents("Winter,Date\n2022-2023,2023/04/15\n2021-2022,2022/03/31\n")
            .unwrap();

        let depths = db.query_frost_depths().unwrap();
        assert_eq!(depths[0].season, Season::new(2020));
        assert_eq!(depths[1].max_depth_in, 60.0);

        let spans = db.query_frost_spans().unwrap();
        assert_eq!(spans[0].duration_days(), 151);

        let readings = db.query_freeze_thaw().unwrap();
        assert_eq!(readings[0].date, NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
        assert_eq!(readings[0].thaw_depth_in, None);

        let incidents = db.query_incidents().unwrap();
        assert_eq!(incidents[0].season, Season::new(2021));
        assert_eq!(incidents[1].date, NaiveDate::from_ymd_opt(2023, 4, 15).unwrap());
    }
}
