use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Calendar features of a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarFields {
    /// Day of month, 1-31
    pub day: u32,
    /// Day of week, Monday = 0
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarFields {
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self {
            day: timestamp.day(),
            weekday: timestamp.weekday().num_days_from_monday(),
            hour: timestamp.hour(),
            minute: timestamp.minute(),
        }
    }
}

impl From<&NaiveDateTime> for CalendarFields {
    fn from(timestamp: &NaiveDateTime) -> Self {
        Self::from_timestamp(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_calendar_extraction() {
        // 2014-04-01 was a Tuesday
        let fields = CalendarFields::from_timestamp(&at(2014, 4, 1, 0, 11));
        assert_eq!(
            fields,
            CalendarFields {
                day: 1,
                weekday: 1,
                hour: 0,
                minute: 11
            }
        );
    }

    #[test]
    fn test_monday_is_zero_and_sunday_is_six() {
        assert_eq!(CalendarFields::from_timestamp(&at(2015, 1, 12, 8, 0)).weekday, 0);
        assert_eq!(CalendarFields::from_timestamp(&at(2015, 1, 18, 8, 0)).weekday, 6);
    }

    #[test]
    fn test_ranges_and_idempotence() {
        let start = at(2014, 1, 1, 0, 0);
        for step in (0..60 * 24 * 400).step_by(37) {
            let ts = start + chrono::Duration::minutes(step);
            let fields = CalendarFields::from_timestamp(&ts);
            assert!((1..=31).contains(&fields.day));
            assert!(fields.weekday <= 6);
            assert!(fields.hour <= 23);
            assert!(fields.minute <= 59);
            assert_eq!(fields, CalendarFields::from_timestamp(&ts));
        }
    }
}
