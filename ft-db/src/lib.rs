//! In-memory SQLite database layer for winter temperature and frost data.
//!
//! This crate loads the daily temperature and frost CSV files into an
//! in-memory SQLite database and exposes typed query methods whose results
//! serialize straight into the chart data bundle.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability on one thread
//! - In-memory SQLite via `rusqlite`
//! - CSV parsing shared with `ft-core`, so the loaders accept the files the
//!   command line tool writes
//! - Cumulative degree days are accumulated per season at query time
//!
//! # Usage
//!
//! ```rust
//! use ft_db::Database;
//! use ft_core::season::Season;
//!
//! let db = Database::new().unwrap();
//! db.load_daily_temps("ELY", "IYEAR,IMONTH,IDAY,AVG_DAILY_TEMP_F\n2021,7,1,20\n2021,7,2,35\n").unwrap();
//!
//! let rows = db.query_season_degree_days("ELY", &[Season::new(2021)]).unwrap();
//! assert_eq!(rows[1].cumulative_cold, Some(12));
//! assert_eq!(rows[1].cumulative_hot, Some(3));
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// Layout of every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-memory SQLite database of temperature and frost records.
///
/// Cloning is cheap and every clone shares the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        db.load_cities(ft_core::city::CITIES_CSV).unwrap();
        let cities = db2.query_cities().unwrap();
        assert_eq!(cities.len(), 2, "Clone should see same data via shared Rc");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_cities().unwrap().is_empty());
        assert!(db.query_daily_observations("ELY").unwrap().is_empty());
    }
}
