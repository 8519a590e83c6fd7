use crate::assignment::Assignment;
use crate::calendar::{self, WeekInfo};
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const HOURS_PER_DAY: f64 = 8.0;
pub const DAYS_PER_WEEK: f64 = 5.0;
pub const UTILIZATION_TARGET: f64 = 0.8;
/// Hours one developer can take on per week: 8 h/day x 5 d/week x 0.8 target.
/// Denominator for every utilization percentage.
pub const WEEKLY_CAPACITY_HOURS: f64 = HOURS_PER_DAY * DAYS_PER_WEEK * UTILIZATION_TARGET;

/// Bounded date range over which aggregation runs, independent of any
/// assignment's own date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Heatmap default: three months back, six months forward.
    pub fn around(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(3)).unwrap_or(today);
        let end = today.checked_add_months(Months::new(6)).unwrap_or(today);
        Self { start, end }
    }
}

/// Weekly hour buckets for one developer, with the derived statistics the
/// heatmap colors by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperWorkload {
    pub developer_id: i32,
    pub developer_name: String,
    pub position: String,
    pub weekly_load: BTreeMap<String, f64>,
    pub overloaded_weeks: BTreeSet<String>,
    pub underutilized_weeks: BTreeSet<String>,
    pub average_load: f64,
}

impl DeveloperWorkload {
    fn empty(developer_id: i32, developer_name: String, position: String) -> Self {
        Self {
            developer_id,
            developer_name,
            position,
            weekly_load: BTreeMap::new(),
            overloaded_weeks: BTreeSet::new(),
            underutilized_weeks: BTreeSet::new(),
            average_load: 0.0,
        }
    }

    pub fn hours_for_week(&self, week_key: &str) -> f64 {
        self.weekly_load.get(week_key).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadGrid {
    pub developers: Vec<DeveloperWorkload>,
    pub weeks: Vec<WeekInfo>,
}

impl WorkloadGrid {
    pub fn summary(&self) -> WorkloadSummary {
        let mut overloaded_cell_count = 0;
        let mut underutilized_cell_count = 0;
        let mut peak_hours = 0.0f64;
        let mut peak_developer = None;
        for dev in &self.developers {
            overloaded_cell_count += dev.overloaded_weeks.len();
            underutilized_cell_count += dev.underutilized_weeks.len();
            for hours in dev.weekly_load.values() {
                if *hours > peak_hours {
                    peak_hours = *hours;
                    peak_developer = Some(dev.developer_name.clone());
                }
            }
        }
        WorkloadSummary {
            developer_count: self.developers.len(),
            week_count: self.weeks.len(),
            overloaded_cell_count,
            underutilized_cell_count,
            peak_hours,
            peak_developer,
        }
    }
}

/// One-line rollup of a workload grid for the CLI and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub developer_count: usize,
    pub week_count: usize,
    pub overloaded_cell_count: usize,
    pub underutilized_cell_count: usize,
    pub peak_hours: f64,
    pub peak_developer: Option<String>,
}

impl WorkloadSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("developers={}", self.developer_count));
        parts.push(format!("weeks={}", self.week_count));
        if self.overloaded_cell_count > 0 {
            parts.push(format!("overloaded={}", self.overloaded_cell_count));
        }
        if self.underutilized_cell_count > 0 {
            parts.push(format!("underutilized={}", self.underutilized_cell_count));
        }
        if let Some(name) = &self.peak_developer {
            parts.push(format!("peak={}h ({})", self.peak_hours, name));
        }
        parts.join(", ")
    }
}

/// First bucketed week start and last covered day for an assignment, or
/// `None` when the range is inverted. A missing end date is synthesized as
/// start + 3 months.
pub(crate) fn bucketed_week_span(
    start: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    let end = match end_date {
        Some(end) => end,
        None => start.checked_add_months(Months::new(3)).unwrap_or(start),
    };
    if end < start {
        return None;
    }
    Some((calendar::week_start_of(start), end))
}

/// Buckets assignments into per-developer weekly hour grids.
///
/// Each assignment with a start date and a resolvable developer contributes
/// `WEEKLY_CAPACITY_HOURS * ratio` to every week whose Monday falls inside
/// both the assignment span and the observation window. Hours accumulate
/// across overlapping assignments. Records missing a start date or a
/// developer are skipped, as is a span whose end precedes its start; the
/// function is total over any input.
pub fn aggregate(assignments: &[Assignment], window: ObservationWindow) -> WorkloadGrid {
    let mut by_developer: HashMap<i32, DeveloperWorkload> = HashMap::new();
    let mut observed_weeks: BTreeSet<String> = BTreeSet::new();

    for assignment in assignments {
        let (Some(developer_id), Some(start)) = (assignment.developer_id, assignment.start_date)
        else {
            continue;
        };
        let Some((first_week, end)) = bucketed_week_span(start, assignment.end_date) else {
            continue;
        };
        let hours_per_week = WEEKLY_CAPACITY_HOURS * assignment.ratio.unwrap_or(1.0);

        let entry = by_developer.entry(developer_id).or_insert_with(|| {
            DeveloperWorkload::empty(
                developer_id,
                assignment.developer_name.clone().unwrap_or_default(),
                assignment
                    .position
                    .clone()
                    .unwrap_or_else(|| "Developer".to_string()),
            )
        });

        let mut week_start = first_week;
        while week_start <= end && week_start <= window.end {
            if week_start >= window.start {
                let week_key = calendar::week_key_of(week_start);
                observed_weeks.insert(week_key.clone());
                *entry.weekly_load.entry(week_key).or_insert(0.0) += hours_per_week;
            }
            week_start += Duration::days(7);
        }
    }

    // Keys were produced by week_key_of, so each parses back to its Monday.
    let weeks: Vec<WeekInfo> = observed_weeks
        .iter()
        .filter_map(|key| calendar::parse_week_key(key).map(WeekInfo::for_week_start))
        .collect();

    let mut developers: Vec<DeveloperWorkload> = by_developer.into_values().collect();
    for dev in &mut developers {
        let mut total_hours = 0.0;
        for week in &weeks {
            let hours = dev.hours_for_week(&week.week_key);
            total_hours += hours;
            if hours > WEEKLY_CAPACITY_HOURS {
                dev.overloaded_weeks.insert(week.week_key.clone());
            } else if hours > 0.0 && hours < WEEKLY_CAPACITY_HOURS * 0.5 {
                dev.underutilized_weeks.insert(week.week_key.clone());
            }
        }
        dev.average_load = if weeks.is_empty() {
            0.0
        } else {
            total_hours / weeks.len() as f64
        };
    }
    developers.sort_by(|a, b| {
        a.developer_name
            .cmp(&b.developer_name)
            .then_with(|| a.developer_id.cmp(&b.developer_id))
    });

    WorkloadGrid { developers, weeks }
}
