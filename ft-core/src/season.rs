use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Month the winter season starts in (July).
pub const SEASON_START_MONTH: u32 = 7;

/// First winter with data on record for both towns.
pub const FIRST_SEASON_START_YEAR: i32 = 2010;

/// Last winter written by `make-seasons` unless told otherwise.
pub const LAST_SEASON_START_YEAR: i32 = 2022;

/// A winter season runs from July 1 to June 30 of the following year, so that
/// a whole freezing period (fall, winter, spring thaw) lands in one cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Season {
    pub start_year: i32,
}

/// Errors related to parsing a season label such as `"2021-2022"`.
#[derive(Debug, PartialEq, Eq)]
pub enum SeasonParseError {
    MissingSeparator(String),
    InvalidYear(String),
    NotConsecutive(i32, i32),
}

impl fmt::Display for SeasonParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonParseError::MissingSeparator(s) => {
                write!(f, "Season label {s:?} is not of the form YYYY-YYYY")
            }
            SeasonParseError::InvalidYear(s) => write!(f, "Season label has invalid year {s:?}"),
            SeasonParseError::NotConsecutive(a, b) => {
                write!(f, "Season years {a} and {b} are not consecutive")
            }
        }
    }
}

impl std::error::Error for SeasonParseError {}

/// Get the season label for a given date.
/// July or later belongs to the season starting that year, January to June
/// to the season that started the previous year.
/// e.g., Jul 1 2021 -> "2021-2022", Jun 30 2021 -> "2020-2021"
pub fn assign_season(date: &NaiveDate) -> String {
    Season::for_date(date).label()
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Season { start_year }
    }

    /// The season a date belongs to.
    pub fn for_date(date: &NaiveDate) -> Self {
        let year = date.year();
        if date.month() >= SEASON_START_MONTH {
            Season::new(year)
        } else {
            Season::new(year - 1)
        }
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year())
    }

    /// July 1 of the start year.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, SEASON_START_MONTH, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// June 30 of the end year.
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year(), 6, 30).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start_date() <= *date && *date <= self.end_date()
    }

    /// All seasons whose start year lies in `first..=last`.
    pub fn range(first_start_year: i32, last_start_year: i32) -> Vec<Season> {
        (first_start_year..=last_start_year).map(Season::new).collect()
    }
}

/// Calendar days between July 1 of the date's season and the date itself.
/// Jul 1 = day 0, Jun 30 = day 364 (365 when the season spans Feb 29).
pub fn days_after_jul_1(date: &NaiveDate) -> i64 {
    let season = Season::for_date(date);
    (*date - season.start_date()).num_days()
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year())
    }
}

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (first, second) = trimmed
            .split_once('-')
            .ok_or_else(|| SeasonParseError::MissingSeparator(trimmed.to_string()))?;
        let start_year: i32 = first
            .parse()
            .map_err(|_| SeasonParseError::InvalidYear(first.to_string()))?;
        let end_year: i32 = second
            .parse()
            .map_err(|_| SeasonParseError::InvalidYear(second.to_string()))?;
        if end_year != start_year + 1 {
            return Err(SeasonParseError::NotConsecutive(start_year, end_year));
        }
        Ok(Season::new(start_year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_assign_season_boundaries() {
        let jul1 = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        assert_eq!(assign_season(&jul1), "2021-2022");

        let jun30 = NaiveDate::from_ymd_opt(2021, 6, 30).unwrap();
        assert_eq!(assign_season(&jun30), "2020-2021");

        let dec31 = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        assert_eq!(assign_season(&dec31), "2021-2022");

        let jan1 = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_eq!(assign_season(&jan1), "2021-2022");
    }

    #[test]
    fn test_season_dates() {
        let season = Season::new(2021);
        assert_eq!(season.start_date(), NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
        assert_eq!(season.end_date(), NaiveDate::from_ymd_opt(2022, 6, 30).unwrap());
        assert!(season.contains(&NaiveDate::from_ymd_opt(2022, 2, 14).unwrap()));
        assert!(!season.contains(&NaiveDate::from_ymd_opt(2022, 7, 1).unwrap()));
    }

    #[test]
    fn test_days_after_jul_1() {
        let jul1 = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
        assert_eq!(days_after_jul_1(&jul1), 0);

        let jan1 = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(days_after_jul_1(&jan1), 184);

        let jun30 = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        assert_eq!(days_after_jul_1(&jun30), 364);

        // 2023-2024 includes Feb 29
        let leap_jun30 = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(days_after_jul_1(&leap_jun30), 365);
    }

    #[test]
    fn test_parse_label() {
        let season: Season = "2019-2020".parse().unwrap();
        assert_eq!(season, Season::new(2019));
        assert_eq!(season.to_string(), "2019-2020");
        assert_eq!(season.label(), season.to_string());

        assert_eq!(
            "2019".parse::<Season>(),
            Err(SeasonParseError::MissingSeparator("2019".to_string()))
        );
        assert_eq!(
            "2019-2021".parse::<Season>(),
            Err(SeasonParseError::NotConsecutive(2019, 2021))
        );
        assert!("abcd-2020".parse::<Season>().is_err());
    }
}
