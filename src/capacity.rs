use crate::assignment::Assignment;
use crate::calendar;
use crate::people::{Developer, Team};
use crate::workload::{WEEKLY_CAPACITY_HOURS, bucketed_week_span};
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Positional week range for team capacity rollups. Two snapshots built from
/// the same range pair week-by-index in scenario comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityRange {
    pub start: NaiveDate,
    pub weeks: usize,
}

impl CapacityRange {
    pub fn new(start: NaiveDate, weeks: usize) -> Self {
        Self { start, weeks }
    }

    pub fn week_starts(&self) -> Vec<NaiveDate> {
        let first = calendar::week_start_of(self.start);
        (0..self.weeks)
            .map(|i| first + Duration::days(7 * i as i64))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekCapacity {
    pub week_start: NaiveDate,
    pub total_capacity: f64,
    pub assigned_hours: f64,
    /// Can go negative when a team is booked past capacity.
    pub available_hours: f64,
    /// Assigned over total, as a percentage. Zero for a team with no members.
    pub utilization: f64,
}

impl WeekCapacity {
    pub fn availability(&self) -> AvailabilityLevel {
        if self.available_hours > self.total_capacity * 0.3 {
            AvailabilityLevel::High
        } else if self.available_hours > self.total_capacity * 0.1 {
            AvailabilityLevel::Medium
        } else {
            AvailabilityLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCapacity {
    pub team_id: i32,
    pub team_name: String,
    pub developer_count: usize,
    pub weeks: Vec<WeekCapacity>,
}

impl TeamCapacity {
    /// Mean utilization percentage across the range, 0 for an empty range.
    pub fn average_utilization(&self) -> f64 {
        if self.weeks.is_empty() {
            return 0.0;
        }
        let total: f64 = self.weeks.iter().map(|week| week.utilization).sum();
        total / self.weeks.len() as f64
    }
}

/// Per-developer hour totals for an expanded team row, keyed by the week's
/// Monday in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperCapacity {
    pub developer_id: i32,
    pub developer_name: String,
    pub position: String,
    pub weekly_hours: BTreeMap<String, f64>,
}

/// Dashboard rollup levels for a utilization percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationLevel {
    Low,
    Medium,
    High,
}

impl UtilizationLevel {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage < 70.0 {
            UtilizationLevel::Low
        } else if percentage < 90.0 {
            UtilizationLevel::Medium
        } else {
            UtilizationLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationLevel::Low => "low",
            UtilizationLevel::Medium => "medium",
            UtilizationLevel::High => "high",
        }
    }
}

/// Inverted scale for free hours: High means plenty of slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityLevel {
    High,
    Medium,
    Low,
}

impl AvailabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityLevel::High => "high-avail",
            AvailabilityLevel::Medium => "medium-avail",
            AvailabilityLevel::Low => "low-avail",
        }
    }
}

/// Rolls assignments up into one capacity row per team. Teams are independent
/// of each other, so the fan-out is parallel.
pub fn team_capacity(
    teams: &[Team],
    developers: &[Developer],
    assignments: &[Assignment],
    range: CapacityRange,
) -> Vec<TeamCapacity> {
    let week_starts = range.week_starts();
    teams
        .par_iter()
        .map(|team| build_team_capacity(team, developers, assignments, &week_starts))
        .collect()
}

fn build_team_capacity(
    team: &Team,
    developers: &[Developer],
    assignments: &[Assignment],
    week_starts: &[NaiveDate],
) -> TeamCapacity {
    let members: HashSet<i32> = developers
        .iter()
        .filter(|dev| dev.team_id == Some(team.team_id))
        .map(|dev| dev.developer_id)
        .collect();

    let mut assigned = vec![0.0f64; week_starts.len()];
    for assignment in assignments {
        let (Some(developer_id), Some(start)) = (assignment.developer_id, assignment.start_date)
        else {
            continue;
        };
        if !members.contains(&developer_id) {
            continue;
        }
        let Some((first_week, end)) = bucketed_week_span(start, assignment.end_date) else {
            continue;
        };
        let hours = WEEKLY_CAPACITY_HOURS * assignment.ratio.unwrap_or(1.0);
        for (idx, week_start) in week_starts.iter().enumerate() {
            if *week_start >= first_week && *week_start <= end {
                assigned[idx] += hours;
            }
        }
    }

    let total_capacity = members.len() as f64 * WEEKLY_CAPACITY_HOURS;
    let weeks = week_starts
        .iter()
        .zip(assigned)
        .map(|(&week_start, assigned_hours)| WeekCapacity {
            week_start,
            total_capacity,
            assigned_hours,
            available_hours: total_capacity - assigned_hours,
            utilization: if total_capacity > 0.0 {
                assigned_hours / total_capacity * 100.0
            } else {
                0.0
            },
        })
        .collect();

    TeamCapacity {
        team_id: team.team_id,
        team_name: team.team_name.clone(),
        developer_count: members.len(),
        weeks,
    }
}

/// Per-developer hour rows for one team, every range week present (zeros
/// included) so the expanded table lines up with the team row above it.
pub fn developer_breakdown(
    team_id: i32,
    developers: &[Developer],
    assignments: &[Assignment],
    range: CapacityRange,
) -> Vec<DeveloperCapacity> {
    let week_starts = range.week_starts();
    let mut members: Vec<&Developer> = developers
        .iter()
        .filter(|dev| dev.team_id == Some(team_id))
        .collect();
    members.sort_by(|a, b| {
        a.full_name()
            .cmp(&b.full_name())
            .then_with(|| a.developer_id.cmp(&b.developer_id))
    });

    members
        .into_iter()
        .map(|dev| {
            let mut weekly_hours: BTreeMap<String, f64> = week_starts
                .iter()
                .map(|week_start| (week_start.to_string(), 0.0))
                .collect();
            for assignment in assignments {
                if assignment.developer_id != Some(dev.developer_id) {
                    continue;
                }
                let Some(start) = assignment.start_date else {
                    continue;
                };
                let Some((first_week, end)) = bucketed_week_span(start, assignment.end_date)
                else {
                    continue;
                };
                let hours = WEEKLY_CAPACITY_HOURS * assignment.ratio.unwrap_or(1.0);
                for week_start in &week_starts {
                    if *week_start >= first_week && *week_start <= end {
                        if let Some(cell) = weekly_hours.get_mut(&week_start.to_string()) {
                            *cell += hours;
                        }
                    }
                }
            }
            DeveloperCapacity {
                developer_id: dev.developer_id,
                developer_name: dev.full_name(),
                position: dev
                    .position
                    .clone()
                    .unwrap_or_else(|| "Developer".to_string()),
                weekly_hours,
            }
        })
        .collect()
}
