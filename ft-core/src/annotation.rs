use crate::frost::Incident;
use crate::season::{days_after_jul_1, Season};
use chrono::NaiveDate;
use serde::Serialize;

/// Days after July 1 at which each month of a (non-leap) season begins.
pub const MONTH_STARTS: [i64; 12] = [0, 31, 62, 92, 123, 153, 184, 215, 243, 274, 304, 335];

/// Month labels in season order.
pub const MONTH_NAMES: [&str; 12] = [
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    MonthStart,
    Today,
    Incident,
}

/// A vertical marker on a "days after July 1" axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub days_after_jul_1: i64,
    pub label: String,
}

pub fn month_markers() -> Vec<Marker> {
    MONTH_STARTS
        .iter()
        .zip(MONTH_NAMES.iter())
        .map(|(start, name)| Marker {
            kind: MarkerKind::MonthStart,
            days_after_jul_1: *start,
            label: name.to_string(),
        })
        .collect()
}

pub fn today_marker(today: &NaiveDate) -> Marker {
    Marker {
        kind: MarkerKind::Today,
        days_after_jul_1: days_after_jul_1(today),
        label: today.format("%b %-d").to_string(),
    }
}

/// Incident markers for the selected seasons only.
pub fn incident_markers(incidents: &[Incident], seasons: &[Season]) -> Vec<Marker> {
    incidents
        .iter()
        .filter(|incident| seasons.contains(&incident.season))
        .map(|incident| Marker {
            kind: MarkerKind::Incident,
            days_after_jul_1: days_after_jul_1(&incident.date),
            label: format!("INCIDENT: {}", incident.date.format("%m/%d")),
        })
        .collect()
}
