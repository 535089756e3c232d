//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! Parsing is delegated to the `ft-core` readers so the database accepts
//! exactly the files the command line tool writes.
//!
//! # CSV Formats
//!
//! - **Cities** (has headers): `CODE,NAME,LATITUDE,LONGITUDE`
//! - **Daily temps** (has headers): `IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F`
//! - **Frost depths** (has headers): `Winter,Max_Frost_Depth_in`
//! - **Frost spans** (has headers): `Frost_Start,Frost_End`
//! - **Freeze/thaw** (has headers): `County,Date,THAW_DEPTH_in,FROST_DEPTH_in,SECONDARY_FROST_DEPTH_in`
//! - **Incidents** (has headers): `Winter,Date`

use crate::{Database, DATE_FORMAT};
use ft_core::city::City;
use ft_core::frost::{FreezeThawReading, FrostDepth, FrostSpan, Incident};
use ft_core::observation::DailyObservation;
use rusqlite::params;

impl Database {
    /// Load the city registry from CSV string.
    pub fn load_cities(&self, csv_data: &str) -> anyhow::Result<()> {
        let cities = City::parse_city_csv(csv_data)?;
        let conn = self.conn.borrow();
        for city in &cities {
            conn.execute(
                "INSERT OR REPLACE INTO cities (code, name, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4)",
                params![city.code, city.name, city.latitude, city.longitude],
            )?;
        }
        log::info!("[FT] loader: Loaded {} cities", cities.len());
        Ok(())
    }

    /// Load a city's daily temperature file from CSV string.
    ///
    /// A later row for the same date replaces an earlier one.
    ///
    /// # Example CSV
    /// ```text
    /// IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F
    /// 2022,12,30,-4.25
    /// 2022,12,31,
    /// ```
    pub fn load_daily_temps(&self, city: &str, csv_data: &str) -> anyhow::Result<()> {
        let observations = DailyObservation::parse_daily_csv(csv_data)?;
        self.insert_daily_observations(city, &observations)
    }

    /// Insert already parsed observations for a city.
    pub fn insert_daily_observations(
        &self,
        city: &str,
        observations: &[DailyObservation],
    ) -> anyhow::Result<()> {
        let code = city.trim().to_uppercase();
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO daily_temps (city, date, avg_temp_f)
                 VALUES (?1, ?2, ?3)",
            )?;
            for obs in observations {
                stmt.execute(params![
                    code,
                    obs.date.format(DATE_FORMAT).to_string(),
                    obs.avg_temp_f
                ])?;
            }
        }
        tx.commit()?;
        let missing = observations.iter().filter(|o| o.avg_temp_f.is_none()).count();
        log::info!(
            "[FT] loader: Loaded {} daily temps for {} ({} without a temperature)",
            observations.len(),
            code,
            missing
        );
        Ok(())
    }

    /// Load maximum frost depth per winter from CSV string.
    pub fn load_frost_depths(&self, csv_data: &str) -> anyhow::Result<()> {
        let depths = FrostDepth::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        for depth in &depths {
            conn.execute(
                "INSERT OR REPLACE INTO frost_depths (winter, max_depth_in) VALUES (?1, ?2)",
                params![depth.season.label(), depth.max_depth_in],
            )?;
        }
        log::info!("[FT] loader: Loaded {} frost depths", depths.len());
        Ok(())
    }

    /// Load frost start/end dates from CSV string.
    ///
    /// # Example CSV
    /// ```text
    /// Frost_Start,Frost_End
    /// 2021/11/20,2022/05/02
    /// ```
    pub fn load_frost_spans(&self, csv_data: &str) -> anyhow::Result<()> {
        let spans = FrostSpan::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        for span in &spans {
            conn.execute(
                "INSERT OR REPLACE INTO frost_spans (frost_start, frost_end) VALUES (?1, ?2)",
                params![
                    span.start.format(DATE_FORMAT).to_string(),
                    span.end.format(DATE_FORMAT).to_string()
                ],
            )?;
        }
        log::info!("[FT] loader: Loaded {} frost spans", spans.len());
        Ok(())
    }

    /// Load county freeze/thaw readings from CSV string.
    ///
    /// Rows with neither a thaw nor a frost depth are dropped by the parser.
    pub fn load_freeze_thaw(&self, csv_data: &str) -> anyhow::Result<()> {
        let readings = FreezeThawReading::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        for r in &readings {
            conn.execute(
                "INSERT OR REPLACE INTO freeze_thaw (county, date, thaw_depth_in, frost_depth_in)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    r.county,
                    r.date.format(DATE_FORMAT).to_string(),
                    r.thaw_depth_in,
                    r.frost_depth_in
                ],
            )?;
        }
        log::info!("[FT] loader: Loaded {} freeze/thaw readings", readings.len());
        Ok(())
    }

    /// Load incident dates from CSV string.
    pub fn load_incidents(&self, csv_data: &str) -> anyhow::Result<()> {
        let incidents = Incident::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        for incident in &incidents {
            conn.execute(
                "INSERT OR REPLACE INTO incidents (winter, date) VALUES (?1, ?2)",
                params![
                    incident.season.label(),
                    incident.date.format(DATE_FORMAT).to_string()
                ],
            )?;
        }
        log::info!("[FT] loader: Loaded {} incidents", incidents.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn count(db: &Database, table: &str) -> i64 {
        db.conn
            .borrow()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn load_cities_from_embedded_registry() {
        let db = Database::new().unwrap();
        db.load_cities(ft_core::city::CITIES_CSV).unwrap();
        assert_eq!(count(&db, "cities"), 2);
    }

    #[test]
    fn load_daily_temps_keeps_missing_values() {
        let db = Database::new().unwrap();
        db.load_daily_temps(
            "ely",
            "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2022,12,30,-4.25\n2022,12,31,\n",
        )
        .unwrap();
        assert_eq!(count(&db, "daily_temps"), 2);
        let nulls: i64 = db
            .conn
            .borrow()
            .query_row(
                "SELECT COUNT(*) FROM daily_temps WHERE city = 'ELY' AND avg_temp_f IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn load_daily_temps_replaces_duplicate_dates() {
        let db = Database::new().unwrap();
        db.load_daily_temps(
            "ELY",
            "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2023,1,1,10\n2023,1,1,12\n",
        )
        .unwrap();
        assert_eq!(count(&db, "daily_temps"), 1);
    }

    #[test]
    fn load_daily_temps_rejects_bad_dates() {
        let db = Database::new().unwrap();
        let result = db.load_daily_temps("ELY", "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2023,13,1,10\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_frost_tables() {
        let db = Database::new().unwrap();
        db.load_frost_depths("Winter,Max_Frost_Depth_in\n2020-2021,48\n2021-2022,\n")
            .unwrap();
        db.load_frost_spans("Frost_Start,Frost_End\n2021/11/20,2022/05/02\n")
            .unwrap();
        db.load_freeze_thaw(
            "County,Date,THAW_DEPTH_in,FROST_DEPTH_in,SECONDARY_FROST_DEPTH_in\nSt. Louis,2023/01/10,,42,\n",
        )
        .unwrap();
        db.load_incidents("Winter,Date\n2022-2023,2023/04/15\n").unwrap();
        assert_eq!(count(&db, "frost_depths"), 1);
        assert_eq!(count(&db, "frost_spans"), 1);
        assert_eq!(count(&db, "freeze_thaw"), 1);
        assert_eq!(count(&db, "incidents"), 1);
    }
}
