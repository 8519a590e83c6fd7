use chrono::{Datelike, Duration, NaiveDate, Weekday};
use staffing_tool::{parse_week_key, week_key_of, week_label, week_start_of};

#[test]
fn week_start_is_monday_on_or_before() {
    // Sweep a few weeks across a year boundary
    let mut date = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
    while date <= end {
        let start = week_start_of(date);
        assert_eq!(start.weekday(), Weekday::Mon);
        assert!(start <= date);
        assert!(date < start + Duration::days(7));
        date += Duration::days(1);
    }
}

#[test]
fn sunday_belongs_to_the_week_it_closes() {
    // 2025-01-12 is a Sunday; its week started Monday 2025-01-06
    let sun = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
    assert_eq!(
        week_start_of(sun),
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    );
}

#[test]
fn week_key_uses_iso_year_and_zero_padded_week() {
    let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    assert_eq!(week_key_of(mon), "2025-W02");

    // 2024-12-30 is a Monday but belongs to ISO week 1 of 2025
    let boundary = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
    assert_eq!(week_key_of(boundary), "2025-W01");

    // 2025-12-29 is a Monday of the week holding 2026's first Thursday
    let late = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
    assert_eq!(week_key_of(late), "2026-W01");
}

#[test]
fn week_key_is_stable_across_the_week() {
    let mut date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
    while date <= end {
        assert_eq!(week_key_of(date), "2025-W02");
        assert_eq!(week_key_of(week_start_of(date)), week_key_of(date));
        date += Duration::days(1);
    }
}

#[test]
fn parse_week_key_recovers_the_monday() {
    let parsed = parse_week_key("2025-W02").unwrap();
    assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());

    let mut date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    while date <= end {
        let recovered = parse_week_key(&week_key_of(date)).unwrap();
        assert_eq!(week_start_of(recovered), week_start_of(date));
        date += Duration::days(1);
    }
}

#[test]
fn parse_week_key_rejects_malformed_input() {
    assert!(parse_week_key("2025W02").is_none());
    assert!(parse_week_key("2025-W").is_none());
    assert!(parse_week_key("abcd-W02").is_none());
    assert!(parse_week_key("2025-W60").is_none());
}

#[test]
fn week_label_is_short_month_and_day() {
    let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    assert_eq!(week_label(mon), "Jan 6");
    let nov = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
    assert_eq!(week_label(nov), "Nov 24");
}

#[test]
fn lexicographic_key_order_is_chronological() {
    let mut keys = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
    for _ in 0..16 {
        keys.push(week_key_of(date));
        date += Duration::days(7);
    }
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
