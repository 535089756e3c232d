use chrono::{Days, NaiveDate};

/// Inclusive iterator over consecutive calendar days.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn num_days(&self) -> i64 {
        ((self.1 - self.0).num_days() + 1).max(0)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.checked_add_days(Days::new(1)) {
            Some(next) => self.0 = next,
            // end of the representable calendar; make the range empty
            None => self.1 = NaiveDate::MIN,
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use crate::season::Season;
    use chrono::NaiveDate;

    #[test]
    fn test_date_range_crosses_new_year() {
        let start = NaiveDate::from_ymd_opt(2022, 12, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let dates: Vec<NaiveDate> = DateRange(start, end).collect();
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], start);
        assert_eq!(dates[3], end);
        assert_eq!(DateRange(start, end).num_days(), 4);
    }

    #[test]
    fn test_date_range_empty() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        assert_eq!(DateRange(start, end).count(), 0);
        assert_eq!(DateRange(start, end).num_days(), 0);
    }

    #[test]
    fn test_season_range_lengths() {
        let season = Season::new(2022);
        assert_eq!(DateRange(season.start_date(), season.end_date()).count(), 365);
        // Feb 29 2024 falls in the 2023-2024 season
        let leap = Season::new(2023);
        assert_eq!(DateRange(leap.start_date(), leap.end_date()).num_days(), 366);
    }
}
