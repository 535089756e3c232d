//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// **Temperature tables:**
/// - `cities` - Tracked towns (code, name, lat/lon)
/// - `daily_temps` - Daily average temperature per city (`avg_temp_f` may be NULL)
///
/// **Frost tables:**
/// - `frost_depths` - Maximum frost depth per winter
/// - `frost_spans` - First and last day of ground frost
/// - `freeze_thaw` - County frost tube readings
/// - `incidents` - Dates marked on the charts
///
/// Dates are stored as `YYYY-MM-DD` text so lexical order is date order.
/// Degree days are not stored; they are accumulated per season at query time.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS daily_temps (
        city TEXT NOT NULL,
        date TEXT NOT NULL,
        avg_temp_f REAL,
        PRIMARY KEY (city, date)
    );
    CREATE INDEX IF NOT EXISTS idx_daily_city ON daily_temps(city);
    CREATE INDEX IF NOT EXISTS idx_daily_date ON daily_temps(date);

    CREATE TABLE IF NOT EXISTS frost_depths (
        winter TEXT PRIMARY KEY,
        max_depth_in REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS frost_spans (
        frost_start TEXT PRIMARY KEY,
        frost_end TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS freeze_thaw (
        county TEXT NOT NULL,
        date TEXT NOT NULL,
        thaw_depth_in REAL,
        frost_depth_in REAL,
        PRIMARY KEY (county, date)
    );

    CREATE TABLE IF NOT EXISTS incidents (
        winter TEXT NOT NULL,
        date TEXT NOT NULL,
        PRIMARY KEY (winter, date)
    );
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count_of(conn: &Connection, kind: &str, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");

        for table in [
            "cities",
            "daily_temps",
            "frost_depths",
            "frost_spans",
            "freeze_thaw",
            "incidents",
        ] {
            assert_eq!(count_of(&conn, "table", table), 1, "Table '{}' should exist", table);
        }
        for idx in ["idx_daily_city", "idx_daily_date"] {
            assert_eq!(count_of(&conn, "index", idx), 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
