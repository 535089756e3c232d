//! Command implementations for the freeze tracker CLI.
//!
//! Provides subcommands for importing raw temperatures, writing per-season
//! degree-day files, updating the daily record from OpenWeather and
//! exporting chart data.

use chrono::Local;
use clap::Subcommand;
use ft_core::city::City;
use ft_core::season::{FIRST_SEASON_START_YEAR, LAST_SEASON_START_YEAR};
use std::path::PathBuf;

pub mod chart;
pub mod config;
pub mod import;
pub mod seasons;
pub mod update;

pub use config::Config;

#[derive(Subcommand)]
pub enum Command {
    /// Average a raw hourly export into a daily temperature file
    ImportHourly {
        /// City code whose default files are used (ELY, ORR)
        #[arg(short, long, default_value = "ELY")]
        city: String,

        /// Hourly CSV (SOURCE,IYEAR,IMONTH,IDAY,TMP_F); defaults to the city's raw export
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Daily CSV to write; defaults to the city's daily temps file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write one cumulative degree-day CSV per winter season
    MakeSeasons {
        /// City code (ELY, ORR)
        #[arg(short, long, default_value = "ELY")]
        city: String,

        /// First season start year
        #[arg(long, default_value_t = FIRST_SEASON_START_YEAR)]
        first_year: i32,

        /// Last season start year
        #[arg(long, default_value_t = LAST_SEASON_START_YEAR)]
        last_year: i32,
    },

    /// Print per-season totals and the harshest/mildest winters
    Summary {
        #[arg(short, long, default_value = "ELY")]
        city: String,
    },

    /// Append yesterday's temperature to the city's daily file
    DailyUpdate {
        #[arg(short, long, default_value = "ELY")]
        city: String,
    },

    /// Print the current temperature for every tracked city
    Current,

    /// Export degree days, frost data and markers as JSON for the dashboard
    ChartData {
        /// City codes to include (repeatable); all cities when omitted
        #[arg(short, long)]
        city: Vec<String>,

        /// Winters to include, e.g. 2022-2023 (repeatable); all when omitted
        #[arg(short, long)]
        winter: Vec<String>,

        /// JSON output path
        #[arg(short, long, default_value = "docs/chart_data.json")]
        output: PathBuf,
    },
}

pub async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    match command {
        Command::ImportHourly {
            city,
            input,
            output,
        } => {
            let city = City::find(&city)?;
            let input = input.unwrap_or_else(|| config.city_hourly_path(&city));
            let output = output.unwrap_or_else(|| config.city_daily_path(&city));
            let days = import::run_import_hourly(&input, &output)?;
            log::info!("Imported {} days into {}", days, output.display());
            Ok(())
        }
        Command::MakeSeasons {
            city,
            first_year,
            last_year,
        } => {
            let written = seasons::run_make_seasons(config, &city, first_year, last_year)?;
            log::info!("Wrote {} season files", written.len());
            Ok(())
        }
        Command::Summary { city } => {
            seasons::run_summary(config, &city)?;
            Ok(())
        }
        Command::DailyUpdate { city } => {
            update::run_daily_update(config, &city, today).await?;
            Ok(())
        }
        Command::Current => update::run_current(config).await,
        Command::ChartData {
            city,
            winter,
            output,
        } => {
            chart::run_chart_data(config, &city, &winter, &output, today)?;
            Ok(())
        }
    }
}
