use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One Monday-to-Sunday span observed during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekInfo {
    pub week_key: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeekInfo {
    pub fn for_week_start(week_start: NaiveDate) -> Self {
        Self {
            week_key: week_key_of(week_start),
            label: week_label(week_start),
            start_date: week_start,
            end_date: week_start + Duration::days(6),
        }
    }
}

/// Monday on or before `date`. Sunday counts as day 7 of the week it closes.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO year-week key, e.g. "2025-W04". Zero-padded week and four-digit year
/// keep lexicographic order chronological.
pub fn week_key_of(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Monday of the week named by `key`, or `None` for a malformed key.
pub fn parse_week_key(key: &str) -> Option<NaiveDate> {
    let (year, week) = key.split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// Short column header for a week, e.g. "Jan 6".
pub fn week_label(week_start: NaiveDate) -> String {
    format!("{} {}", week_start.format("%b"), week_start.day())
}
