//! Date range for filtering events.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Inclusive calendar-date range.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    /// Build a range from optional bounds. `from` is anchored at the start of
    /// its day and `to` at the end of its day.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange {
            from: from.map(start_of_day),
            to: to.map(end_of_day),
        }
    }

    /// A range covering exactly one day.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(Some(date), Some(date))
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether an event on `date` falls inside the range. The event day is
    /// compared start-to-start against `from` and end-to-end against `to`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let after_from = self.from.is_none_or(|from| start_of_day(date) >= from);
        let before_to = self.to.is_none_or(|to| end_of_day(date) <= to);
        after_from && before_to
    }
}

/// Parse a strict YYYY-MM-DD date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59 is always a valid time
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::new(Some(date("2024-01-05")), Some(date("2024-01-10")));
        assert!(range.contains(date("2024-01-05")));
        assert!(range.contains(date("2024-01-10")));
        assert!(!range.contains(date("2024-01-04")));
        assert!(!range.contains(date("2024-01-11")));
    }

    #[test]
    fn test_open_ended() {
        let range = DateRange::new(None, Some(date("2024-01-10")));
        assert!(range.contains(date("1999-12-31")));
        assert!(!range.contains(date("2024-01-11")));
        assert!(DateRange::default().contains(date("2024-01-11")));
        assert!(DateRange::default().is_unbounded());
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::day(date("2024-01-10"));
        assert!(range.contains(date("2024-01-10")));
        assert!(!range.contains(date("2024-01-09")));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("notadate"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date(""), None);
        assert!(parse_date(" 2024-02-29 ").is_some());
    }
}
