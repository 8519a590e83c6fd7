use crate::assignment::Assignment;
use crate::capacity::TeamCapacity;
use crate::people::Developer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Add,
    Modify,
    Delete,
}

/// One staged edit in a draft scenario. The populated field subset follows
/// the change type: ADD carries developer/project/dates/ratio, MODIFY and
/// DELETE name an `original_assignment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioChange {
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_assignment_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

/// Applies staged changes to a baseline assignment list, producing the
/// scenario's list. Changes that do not resolve (unknown assignment id,
/// unknown developer) are skipped rather than failing the whole scenario.
pub fn apply_changes(
    baseline: &[Assignment],
    developers: &[Developer],
    changes: &[ScenarioChange],
) -> Vec<Assignment> {
    let mut result: Vec<Assignment> = baseline.to_vec();
    let mut next_id = result.iter().map(|a| a.id).max().unwrap_or(0) + 1;

    for change in changes {
        match change.change_type {
            ChangeType::Add => {
                let Some(developer_id) = change.developer_id else {
                    continue;
                };
                let Some(dev) = developers
                    .iter()
                    .find(|d| d.developer_id == developer_id)
                else {
                    continue;
                };
                let mut assignment = Assignment::new(next_id, developer_id, dev.full_name());
                assignment.position = dev.position.clone();
                assignment.project_id = change.project_id;
                assignment.start_date = change.start_date;
                assignment.end_date = change.end_date;
                assignment.ratio = change.ratio;
                result.push(assignment);
                next_id += 1;
            }
            ChangeType::Modify => {
                let Some(id) = change.original_assignment_id else {
                    continue;
                };
                let Some(existing) = result.iter_mut().find(|a| a.id == id) else {
                    continue;
                };
                if let Some(developer_id) = change.developer_id {
                    if let Some(dev) = developers
                        .iter()
                        .find(|d| d.developer_id == developer_id)
                    {
                        existing.developer_id = Some(developer_id);
                        existing.developer_name = Some(dev.full_name());
                        existing.position = dev.position.clone();
                    }
                }
                if change.project_id.is_some() {
                    existing.project_id = change.project_id;
                }
                if change.start_date.is_some() {
                    existing.start_date = change.start_date;
                }
                if change.end_date.is_some() {
                    existing.end_date = change.end_date;
                }
                if change.ratio.is_some() {
                    existing.ratio = change.ratio;
                }
            }
            ChangeType::Delete => {
                let Some(id) = change.original_assignment_id else {
                    continue;
                };
                result.retain(|a| a.id != id);
            }
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDelta {
    pub week_start: NaiveDate,
    pub baseline_hours: f64,
    pub scenario_hours: f64,
    pub delta: f64,
    pub baseline_utilization: f64,
    pub scenario_utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team_id: i32,
    pub team_name: String,
    pub week_deltas: Vec<WeekDelta>,
    pub total_delta_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_hours_added: f64,
    pub total_hours_removed: f64,
    pub net_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub teams: Vec<TeamComparison>,
    pub summary: ComparisonSummary,
}

/// Diffs two capacity snapshots taken over the same range. Teams match by
/// id; scenario teams with no baseline counterpart are skipped. Weeks pair
/// by position (both snapshots are expected to share the range), stopping at
/// the shorter list if they do not.
pub fn compare(baseline: &[TeamCapacity], scenario: &[TeamCapacity]) -> ScenarioComparison {
    let mut teams = Vec::new();
    let mut total_hours_added = 0.0;
    let mut total_hours_removed = 0.0;

    for scenario_team in scenario {
        let Some(baseline_team) = baseline
            .iter()
            .find(|team| team.team_id == scenario_team.team_id)
        else {
            continue;
        };

        let mut week_deltas = Vec::new();
        let mut total_delta_hours = 0.0;
        for (baseline_week, scenario_week) in baseline_team.weeks.iter().zip(&scenario_team.weeks)
        {
            let delta = scenario_week.assigned_hours - baseline_week.assigned_hours;
            total_delta_hours += delta;
            week_deltas.push(WeekDelta {
                week_start: scenario_week.week_start,
                baseline_hours: baseline_week.assigned_hours,
                scenario_hours: scenario_week.assigned_hours,
                delta,
                baseline_utilization: baseline_week.utilization,
                scenario_utilization: scenario_week.utilization,
            });
            if delta > 0.0 {
                total_hours_added += delta;
            } else if delta < 0.0 {
                total_hours_removed += delta.abs();
            }
        }

        teams.push(TeamComparison {
            team_id: scenario_team.team_id,
            team_name: scenario_team.team_name.clone(),
            week_deltas,
            total_delta_hours,
        });
    }

    ScenarioComparison {
        teams,
        summary: ComparisonSummary {
            total_hours_added,
            total_hours_removed,
            net_change: total_hours_added - total_hours_removed,
        },
    }
}
