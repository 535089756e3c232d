//! Hourly import - average the raw NOAA hourly export into daily temperatures.

use anyhow::Context;
use ft_core::observation::{DailyObservation, HourlyReading};
use ft_data::hourly::aggregate_daily;
use log::info;
use std::path::Path;

/// Read `input` (hourly CSV), write `output` (daily CSV). Returns the day count.
pub fn run_import_hourly(input: &Path, output: &Path) -> anyhow::Result<usize> {
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read hourly data from {}", input.display()))?;
    let readings = HourlyReading::parse_hourly_csv(&contents)?;
    info!("Read {} hourly readings from {}", readings.len(), input.display());

    let daily = aggregate_daily(&readings);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    DailyObservation::write_daily_csv(output, &daily)?;
    Ok(daily.len())
}
