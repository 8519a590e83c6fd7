use chrono::NaiveDate;
use staffing_tool::{
    Assignment, CapacityRange, ChangeType, Developer, ScenarioChange, Team, TeamCapacity,
    WeekCapacity, apply_changes, compare, team_capacity,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(start: (i32, u32, u32), assigned: f64) -> WeekCapacity {
    let total = 64.0;
    WeekCapacity {
        week_start: date(start.0, start.1, start.2),
        total_capacity: total,
        assigned_hours: assigned,
        available_hours: total - assigned,
        utilization: assigned / total * 100.0,
    }
}

fn snapshot(team_id: i32, name: &str, assigned: &[f64]) -> TeamCapacity {
    let weeks = assigned
        .iter()
        .enumerate()
        .map(|(i, hours)| week((2025, 1, 6 + 7 * i as u32), *hours))
        .collect();
    TeamCapacity {
        team_id,
        team_name: name.to_string(),
        developer_count: 2,
        weeks,
    }
}

fn change(change_type: ChangeType) -> ScenarioChange {
    ScenarioChange {
        change_type,
        original_assignment_id: None,
        project_id: None,
        developer_id: None,
        start_date: None,
        end_date: None,
        ratio: None,
    }
}

#[test]
fn identical_snapshots_compare_to_zero() {
    let baseline = vec![snapshot(1, "Backend", &[30.0, 30.0, 30.0])];
    let scenario = vec![snapshot(1, "Backend", &[30.0, 30.0, 30.0])];

    let result = compare(&baseline, &scenario);
    assert_eq!(result.teams.len(), 1);
    assert!(result.teams[0].week_deltas.iter().all(|d| d.delta == 0.0));
    assert_eq!(result.teams[0].total_delta_hours, 0.0);
    assert_eq!(result.summary.total_hours_added, 0.0);
    assert_eq!(result.summary.total_hours_removed, 0.0);
    assert_eq!(result.summary.net_change, 0.0);
}

#[test]
fn added_hours_in_one_week_show_up_in_the_summary() {
    let baseline = vec![snapshot(1, "Backend", &[30.0, 30.0])];
    let scenario = vec![snapshot(1, "Backend", &[40.0, 30.0])];

    let result = compare(&baseline, &scenario);
    assert_eq!(result.summary.total_hours_added, 10.0);
    assert_eq!(result.summary.total_hours_removed, 0.0);
    assert_eq!(result.summary.net_change, 10.0);

    let team = &result.teams[0];
    assert_eq!(team.total_delta_hours, 10.0);
    assert_eq!(team.week_deltas[0].delta, 10.0);
    assert_eq!(team.week_deltas[0].baseline_hours, 30.0);
    assert_eq!(team.week_deltas[0].scenario_hours, 40.0);
    assert_eq!(team.week_deltas[1].delta, 0.0);
}

#[test]
fn removed_hours_are_tracked_as_positive_removals() {
    let baseline = vec![snapshot(1, "Backend", &[30.0, 30.0])];
    let scenario = vec![snapshot(1, "Backend", &[20.0, 34.0])];

    let result = compare(&baseline, &scenario);
    assert_eq!(result.summary.total_hours_added, 4.0);
    assert_eq!(result.summary.total_hours_removed, 10.0);
    assert_eq!(result.summary.net_change, -6.0);
    assert_eq!(result.teams[0].total_delta_hours, -6.0);
}

#[test]
fn scenario_teams_missing_from_baseline_are_skipped() {
    let baseline = vec![snapshot(1, "Backend", &[30.0])];
    let scenario = vec![
        snapshot(1, "Backend", &[30.0]),
        snapshot(2, "Frontend", &[50.0]),
    ];

    let result = compare(&baseline, &scenario);
    assert_eq!(result.teams.len(), 1);
    assert_eq!(result.teams[0].team_id, 1);
    // No synthetic baseline: the Frontend hours never reach the summary
    assert_eq!(result.summary.total_hours_added, 0.0);
}

#[test]
fn unequal_week_counts_pair_up_to_the_shorter_list() {
    let baseline = vec![snapshot(1, "Backend", &[30.0, 30.0, 30.0])];
    let scenario = vec![snapshot(1, "Backend", &[35.0])];

    let result = compare(&baseline, &scenario);
    assert_eq!(result.teams[0].week_deltas.len(), 1);
    assert_eq!(result.summary.net_change, 5.0);
}

#[test]
fn apply_add_resolves_the_developer_and_assigns_a_fresh_id() {
    let mut dev = Developer::new(7, "Ada", "Adams");
    dev.position = Some("Backend".to_string());
    let baseline = vec![Assignment::new(3, 1, "Bob Baker")];

    let mut add = change(ChangeType::Add);
    add.developer_id = Some(7);
    add.project_id = Some(42);
    add.start_date = Some(date(2025, 1, 6));
    add.end_date = Some(date(2025, 1, 19));
    add.ratio = Some(0.5);

    let result = apply_changes(&baseline, &[dev], &[add]);
    assert_eq!(result.len(), 2);
    let added = &result[1];
    assert_eq!(added.id, 4);
    assert_eq!(added.developer_id, Some(7));
    assert_eq!(added.developer_name.as_deref(), Some("Ada Adams"));
    assert_eq!(added.position.as_deref(), Some("Backend"));
    assert_eq!(added.project_id, Some(42));
    assert_eq!(added.ratio, Some(0.5));
}

#[test]
fn apply_add_with_unknown_developer_is_skipped() {
    let baseline = vec![Assignment::new(1, 1, "Bob Baker")];
    let mut add = change(ChangeType::Add);
    add.developer_id = Some(404);
    add.start_date = Some(date(2025, 1, 6));

    let result = apply_changes(&baseline, &[], &[add]);
    assert_eq!(result.len(), 1);
}

#[test]
fn apply_modify_patches_only_the_present_fields() {
    let mut original = Assignment::new(1, 1, "Bob Baker");
    original.start_date = Some(date(2025, 1, 6));
    original.end_date = Some(date(2025, 1, 19));
    original.ratio = Some(1.0);

    let mut modify = change(ChangeType::Modify);
    modify.original_assignment_id = Some(1);
    modify.ratio = Some(0.5);

    let result = apply_changes(&[original], &[], &[modify]);
    assert_eq!(result[0].ratio, Some(0.5));
    assert_eq!(result[0].start_date, Some(date(2025, 1, 6)));
    assert_eq!(result[0].developer_name.as_deref(), Some("Bob Baker"));
}

#[test]
fn apply_delete_removes_the_assignment() {
    let first = Assignment::new(1, 1, "Bob Baker");
    let second = Assignment::new(2, 2, "Ada Adams");

    let mut delete = change(ChangeType::Delete);
    delete.original_assignment_id = Some(1);

    let result = apply_changes(&[first, second], &[], &[delete]);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 2);
}

#[test]
fn end_to_end_scenario_comparison_over_real_snapshots() {
    let teams = vec![Team::new(10, "Backend")];
    let mut ada = Developer::new(1, "Ada", "Adams");
    ada.team_id = Some(10);
    let developers = vec![ada];

    let mut baseline_assignment = Assignment::new(1, 1, "Ada Adams");
    baseline_assignment.start_date = Some(date(2025, 1, 6));
    baseline_assignment.end_date = Some(date(2025, 1, 12));
    let baseline_assignments = vec![baseline_assignment];

    let mut add = change(ChangeType::Add);
    add.developer_id = Some(1);
    add.start_date = Some(date(2025, 1, 13));
    add.end_date = Some(date(2025, 1, 19));
    add.ratio = Some(0.5);
    let scenario_assignments = apply_changes(&baseline_assignments, &developers, &[add]);

    let range = CapacityRange::new(date(2025, 1, 6), 2);
    let baseline = team_capacity(&teams, &developers, &baseline_assignments, range);
    let scenario = team_capacity(&teams, &developers, &scenario_assignments, range);

    let result = compare(&baseline, &scenario);
    assert_eq!(result.summary.total_hours_added, 16.0);
    assert_eq!(result.summary.net_change, 16.0);
    let deltas = &result.teams[0].week_deltas;
    assert_eq!(deltas[0].delta, 0.0);
    assert_eq!(deltas[1].delta, 16.0);
}

#[test]
fn change_types_serialize_in_the_wire_format() {
    let value = serde_json::to_value(ChangeType::Add).unwrap();
    assert_eq!(value, serde_json::json!("ADD"));
    let parsed: ChangeType = serde_json::from_value(serde_json::json!("DELETE")).unwrap();
    assert_eq!(parsed, ChangeType::Delete);
}
