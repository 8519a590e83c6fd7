use chrono::NaiveDate;
use staffing_tool::{
    Assignment, ObservationWindow, UtilizationBand, WEEKLY_CAPACITY_HOURS, aggregate,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn january_2025() -> ObservationWindow {
    ObservationWindow::new(date(2025, 1, 1), date(2025, 1, 31))
}

fn assignment(id: i32, dev: i32, name: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Assignment {
    let mut a = Assignment::new(id, dev, name);
    a.start_date = Some(date(start.0, start.1, start.2));
    a.end_date = Some(date(end.0, end.1, end.2));
    a
}

#[test]
fn weekly_capacity_constant_is_32_hours() {
    assert_eq!(WEEKLY_CAPACITY_HOURS, 32.0);
}

#[test]
fn empty_input_yields_empty_grid() {
    let grid = aggregate(&[], january_2025());
    assert!(grid.developers.is_empty());
    assert!(grid.weeks.is_empty());
}

#[test]
fn two_week_assignment_fills_two_buckets_at_full_capacity() {
    let a = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 19));
    let grid = aggregate(&[a], january_2025());

    assert_eq!(grid.developers.len(), 1);
    let dev = &grid.developers[0];
    assert_eq!(dev.weekly_load.len(), 2);
    assert_eq!(dev.hours_for_week("2025-W02"), 32.0);
    assert_eq!(dev.hours_for_week("2025-W03"), 32.0);

    let keys: Vec<&str> = grid.weeks.iter().map(|w| w.week_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-W02", "2025-W03"]);
    assert_eq!(grid.weeks[0].start_date, date(2025, 1, 6));
    assert_eq!(grid.weeks[0].end_date, date(2025, 1, 12));
    assert_eq!(grid.weeks[0].label, "Jan 6");
}

#[test]
fn half_ratio_halves_the_bucket_and_lands_on_the_moderate_boundary() {
    let mut a = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 19));
    a.ratio = Some(0.5);
    let grid = aggregate(&[a], january_2025());

    let dev = &grid.developers[0];
    assert_eq!(dev.hours_for_week("2025-W02"), 16.0);
    // 16 of 32 hours is exactly 50%, which is Moderate, not Underutilized
    assert_eq!(UtilizationBand::classify(16.0), UtilizationBand::Moderate);
    assert!(dev.underutilized_weeks.is_empty());
}

#[test]
fn overlapping_assignments_accumulate_hours() {
    let mut first = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    first.ratio = Some(0.625);
    let mut second = assignment(2, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    second.ratio = Some(0.625);
    let grid = aggregate(&[first, second], january_2025());

    assert_eq!(grid.developers.len(), 1);
    let dev = &grid.developers[0];
    // 20 + 20 hours; 125% of capacity is still Overloaded, just past it is Critical
    assert_eq!(dev.hours_for_week("2025-W02"), 40.0);
    assert!(dev.overloaded_weeks.contains("2025-W02"));
    assert_eq!(UtilizationBand::classify(40.0), UtilizationBand::Overloaded);
    assert_eq!(UtilizationBand::classify(40.01), UtilizationBand::Critical);
}

#[test]
fn records_without_start_or_developer_are_skipped() {
    let mut no_start = Assignment::new(1, 1, "Ada Adams");
    no_start.end_date = Some(date(2025, 1, 19));

    let mut no_developer = Assignment::new(2, 1, "Ada Adams");
    no_developer.developer_id = None;
    no_developer.start_date = Some(date(2025, 1, 6));

    let grid = aggregate(&[no_start, no_developer], january_2025());
    assert!(grid.developers.is_empty());
    assert!(grid.weeks.is_empty());
}

#[test]
fn inverted_date_range_contributes_nothing() {
    let a = assignment(1, 1, "Ada Adams", (2025, 1, 19), (2025, 1, 6));
    let grid = aggregate(&[a], january_2025());
    assert!(grid.weeks.is_empty());
}

#[test]
fn open_ended_assignment_loads_three_months() {
    let mut a = Assignment::new(1, 1, "Ada Adams");
    a.start_date = Some(date(2025, 1, 6));
    let window = ObservationWindow::new(date(2025, 1, 1), date(2025, 6, 30));
    let grid = aggregate(&[a], window);

    let dev = &grid.developers[0];
    // Synthesized end is 2025-04-06; the last covered Monday is 2025-03-31
    assert_eq!(grid.weeks.first().unwrap().week_key, "2025-W02");
    assert_eq!(grid.weeks.last().unwrap().week_key, "2025-W14");
    assert_eq!(dev.weekly_load.len(), 13);
}

#[test]
fn weeks_outside_the_window_are_not_bucketed() {
    let a = assignment(1, 1, "Ada Adams", (2024, 12, 2), (2025, 1, 10));
    let window = ObservationWindow::new(date(2025, 1, 1), date(2025, 12, 31));
    let grid = aggregate(&[a], window);

    let keys: Vec<&str> = grid.weeks.iter().map(|w| w.week_key.as_str()).collect();
    // Mondays before 2025-01-01 fall outside the window even though the
    // assignment started back in December
    assert_eq!(keys, vec!["2025-W02"]);
}

#[test]
fn developers_sort_by_display_name() {
    let bob = assignment(1, 2, "Bob Baker", (2025, 1, 6), (2025, 1, 12));
    let ada = assignment(2, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    let grid = aggregate(&[bob, ada], january_2025());

    let names: Vec<&str> = grid
        .developers
        .iter()
        .map(|d| d.developer_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ada Adams", "Bob Baker"]);
}

#[test]
fn average_load_spans_all_observed_weeks() {
    // Ada is loaded one of the two observed weeks, Bob both
    let ada = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    let bob = assignment(2, 2, "Bob Baker", (2025, 1, 6), (2025, 1, 19));
    let grid = aggregate(&[ada, bob], january_2025());

    assert_eq!(grid.weeks.len(), 2);
    let ada = &grid.developers[0];
    let bob = &grid.developers[1];
    assert_eq!(ada.average_load, 16.0);
    assert_eq!(bob.average_load, 32.0);
}

#[test]
fn underutilized_weeks_require_nonzero_hours_below_half_capacity() {
    let mut quarter = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    quarter.ratio = Some(0.25);
    let full = assignment(2, 2, "Bob Baker", (2025, 1, 13), (2025, 1, 19));
    let grid = aggregate(&[quarter, full], january_2025());

    let ada = &grid.developers[0];
    assert!(ada.underutilized_weeks.contains("2025-W02"));
    // Ada has zero hours in W03; empty weeks are not underutilized
    assert!(!ada.underutilized_weeks.contains("2025-W03"));

    let bob = &grid.developers[1];
    assert!(bob.underutilized_weeks.is_empty());
    assert!(bob.overloaded_weeks.is_empty());
}

#[test]
fn missing_ratio_defaults_to_full_time() {
    let a = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    let grid = aggregate(&[a], january_2025());
    assert_eq!(grid.developers[0].hours_for_week("2025-W02"), 32.0);
}

#[test]
fn summary_counts_cells_and_reports_peak() {
    let mut heavy = assignment(1, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    heavy.ratio = Some(0.8);
    let extra = assignment(2, 1, "Ada Adams", (2025, 1, 6), (2025, 1, 12));
    let mut light = assignment(3, 2, "Bob Baker", (2025, 1, 6), (2025, 1, 12));
    light.ratio = Some(0.25);
    let grid = aggregate(&[heavy, extra, light], january_2025());

    let summary = grid.summary();
    assert_eq!(summary.developer_count, 2);
    assert_eq!(summary.week_count, 1);
    assert_eq!(summary.overloaded_cell_count, 1);
    assert_eq!(summary.underutilized_cell_count, 1);
    assert!((summary.peak_hours - 57.6).abs() < 1e-9);
    assert_eq!(summary.peak_developer.as_deref(), Some("Ada Adams"));
    let line = summary.to_cli_summary();
    assert!(line.contains("developers=2"));
    assert!(line.contains("overloaded=1"));
}
