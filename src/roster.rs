use crate::assignment::Assignment;
use crate::assignment_validation::{self, AssignmentValidationError};
use crate::capacity::{self, CapacityRange, DeveloperCapacity, TeamCapacity};
use crate::metadata::RosterMetadata;
use crate::people::{Developer, Team, TimeOff};
use crate::scenario::{self, ScenarioChange, ScenarioComparison};
use crate::workload::{self, ObservationWindow, WorkloadGrid};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fmt;

#[derive(Debug, Clone)]
pub enum RosterMetadataError {
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RosterMetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterMetadataError::StartAfterEnd { start, end } => write!(
                f,
                "window start date {start} must be on or before window end date {end}"
            ),
        }
    }
}

impl std::error::Error for RosterMetadataError {}

/// In-memory staffing roster: the assignment table plus the team, developer,
/// and time-off side lists. Every view (workload grid, team capacity,
/// scenario comparison) is computed fresh from the current rows.
pub struct Roster {
    df: DataFrame,
    metadata: RosterMetadata,
    teams: Vec<Team>,
    developers: Vec<Developer>,
    time_off: Vec<TimeOff>,
}

impl Roster {
    pub(crate) fn from_parts(
        metadata: RosterMetadata,
        teams: Vec<Team>,
        developers: Vec<Developer>,
        time_off: Vec<TimeOff>,
    ) -> Self {
        let schema = Self::default_schema();
        let df = DataFrame::empty_with_schema(&schema);
        Self {
            df,
            metadata,
            teams,
            developers,
            time_off,
        }
    }

    pub fn new() -> Self {
        Self::from_parts(RosterMetadata::default(), Vec::new(), Vec::new(), Vec::new())
    }

    pub fn new_with_metadata(metadata: RosterMetadata) -> Self {
        Self::from_parts(metadata, Vec::new(), Vec::new(), Vec::new())
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::Int32),
            Field::new("developer_id".into(), DataType::Int32),
            Field::new("developer_name".into(), DataType::String),
            Field::new("position".into(), DataType::String),
            Field::new("project_id".into(), DataType::Int32),
            Field::new("subitem_id".into(), DataType::Int32),
            Field::new("start_date".into(), DataType::Date),
            Field::new("end_date".into(), DataType::Date),
            Field::new("ratio".into(), DataType::Float64),
        ])
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn metadata(&self) -> &RosterMetadata {
        &self.metadata
    }

    pub fn plan_name(&self) -> &str {
        &self.metadata.plan_name
    }

    pub fn window_start(&self) -> NaiveDate {
        self.metadata.window_start
    }

    pub fn window_end(&self) -> NaiveDate {
        self.metadata.window_end
    }

    fn validate_metadata(metadata: &RosterMetadata) -> Result<(), RosterMetadataError> {
        if metadata.window_start > metadata.window_end {
            return Err(RosterMetadataError::StartAfterEnd {
                start: metadata.window_start,
                end: metadata.window_end,
            });
        }
        Ok(())
    }

    pub fn set_metadata(&mut self, metadata: RosterMetadata) -> Result<(), RosterMetadataError> {
        Self::validate_metadata(&metadata)?;
        self.metadata = metadata;
        Ok(())
    }

    fn update_metadata_with<F>(&mut self, mutator: F) -> Result<(), RosterMetadataError>
    where
        F: FnOnce(&mut RosterMetadata),
    {
        let mut metadata = self.metadata.clone();
        mutator(&mut metadata);
        self.set_metadata(metadata)
    }

    pub fn set_plan_name(&mut self, name: impl Into<String>) {
        self.metadata.plan_name = name.into();
    }

    pub fn set_plan_description(&mut self, description: impl Into<String>) {
        self.metadata.plan_description = description.into();
    }

    pub fn set_window(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), RosterMetadataError> {
        self.update_metadata_with(|metadata| {
            metadata.window_start = start;
            metadata.window_end = end;
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn developers(&self) -> &[Developer] {
        &self.developers
    }

    pub fn time_off(&self) -> &[TimeOff] {
        &self.time_off
    }

    pub fn upsert_team(&mut self, team: Team) {
        match self.teams.iter_mut().find(|t| t.team_id == team.team_id) {
            Some(existing) => *existing = team,
            None => self.teams.push(team),
        }
    }

    pub fn upsert_developer(&mut self, developer: Developer) {
        match self
            .developers
            .iter_mut()
            .find(|d| d.developer_id == developer.developer_id)
        {
            Some(existing) => *existing = developer,
            None => self.developers.push(developer),
        }
    }

    pub fn upsert_time_off(&mut self, record: TimeOff) {
        match self
            .time_off
            .iter_mut()
            .find(|t| t.time_off_id == record.time_off_id)
        {
            Some(existing) => *existing = record,
            None => self.time_off.push(record),
        }
    }

    pub fn remove_time_off(&mut self, time_off_id: i32) -> bool {
        let before = self.time_off.len();
        self.time_off.retain(|t| t.time_off_id != time_off_id);
        self.time_off.len() != before
    }

    pub fn assignments(&self) -> Result<Vec<Assignment>, PolarsError> {
        let df = self.dataframe();
        let mut assignments = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            assignments.push(Assignment::from_dataframe_row(df, idx)?);
        }
        Ok(assignments)
    }

    pub fn find_assignment(&self, assignment_id: i32) -> Result<Option<Assignment>, PolarsError> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let ids = self.df.column("id")?.i32()?;
        for (idx, id_opt) in ids.into_iter().enumerate() {
            if id_opt == Some(assignment_id) {
                let assignment = Assignment::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(assignment));
            }
        }
        Ok(None)
    }

    fn validation_error(err: AssignmentValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    pub fn upsert_assignment_record(&mut self, assignment: Assignment) -> Result<(), PolarsError> {
        assignment_validation::validate_assignment(&assignment).map_err(Self::validation_error)?;
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(assignment.id))
        };
        if id_exists {
            self.delete_assignment(assignment.id)?;
        }
        let new_row = assignment.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    pub fn delete_assignment(&mut self, assignment_id: i32) -> Result<bool, PolarsError> {
        if self.df.height() == 0 {
            return Ok(false);
        }
        let snapshot = self.df.clone();
        let mut kept: Vec<Assignment> = Vec::with_capacity(snapshot.height());
        let mut found = false;
        for idx in 0..snapshot.height() {
            let assignment = Assignment::from_dataframe_row(&snapshot, idx)?;
            if assignment.id == assignment_id {
                found = true;
                continue;
            }
            kept.push(assignment);
        }
        if !found {
            return Ok(false);
        }

        self.df = DataFrame::empty_with_schema(&Self::default_schema());
        for assignment in kept {
            let new_row = assignment.to_dataframe_row()?;
            self.df = self.df.vstack(&new_row)?;
        }
        Ok(true)
    }

    #[cfg(feature = "cli_api")]
    fn update_date_column(
        &mut self,
        column_name: &str,
        assignment_id: i32,
        new_date: Option<NaiveDate>,
    ) -> Result<(), PolarsError> {
        let value = match new_date {
            Some(date) => lit(date).cast(DataType::Date),
            None => lit(NULL).cast(DataType::Date),
        };
        self.df = self
            .df
            .clone()
            .lazy()
            .with_column(
                when(col("id").eq(lit(assignment_id)))
                    .then(value)
                    .otherwise(col(column_name).cast(DataType::Date))
                    .alias(column_name),
            )
            .collect()?;
        Ok(())
    }

    #[cfg(feature = "cli_api")]
    fn update_float_column(
        &mut self,
        column_name: &str,
        assignment_id: i32,
        new_value: f64,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .f64()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(assignment_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<Float64Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    // Public setters for common columns to enable CLI editing
    #[cfg(feature = "cli_api")]
    pub fn set_assignment_dates(
        &mut self,
        assignment_id: i32,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<(), PolarsError> {
        if self.find_assignment(assignment_id)?.is_none() {
            return Err(PolarsError::ComputeError(
                format!("assignment {assignment_id} not found").into(),
            ));
        }
        self.update_date_column("start_date", assignment_id, Some(start))?;
        self.update_date_column("end_date", assignment_id, end)?;
        Ok(())
    }

    #[cfg(feature = "cli_api")]
    pub fn set_assignment_ratio(
        &mut self,
        assignment_id: i32,
        ratio: f64,
    ) -> Result<(), PolarsError> {
        let mut assignment = self.find_assignment(assignment_id)?.ok_or_else(|| {
            PolarsError::ComputeError(format!("assignment {assignment_id} not found").into())
        })?;
        assignment.ratio = Some(ratio);
        assignment_validation::validate_assignment(&assignment).map_err(Self::validation_error)?;
        self.update_float_column("ratio", assignment_id, ratio)
    }

    /// Workload grid over an explicit observation window.
    pub fn workload(&self, window: ObservationWindow) -> Result<WorkloadGrid, PolarsError> {
        Ok(workload::aggregate(&self.assignments()?, window))
    }

    /// Workload grid over the window stored in the roster metadata.
    pub fn workload_for_window(&self) -> Result<WorkloadGrid, PolarsError> {
        let window = ObservationWindow::new(self.metadata.window_start, self.metadata.window_end);
        self.workload(window)
    }

    pub fn team_capacity(&self, range: CapacityRange) -> Result<Vec<TeamCapacity>, PolarsError> {
        Ok(capacity::team_capacity(
            &self.teams,
            &self.developers,
            &self.assignments()?,
            range,
        ))
    }

    pub fn developer_breakdown(
        &self,
        team_id: i32,
        range: CapacityRange,
    ) -> Result<Vec<DeveloperCapacity>, PolarsError> {
        Ok(capacity::developer_breakdown(
            team_id,
            &self.developers,
            &self.assignments()?,
            range,
        ))
    }

    /// Team capacity with a scenario's staged changes applied on top of the
    /// stored assignments.
    pub fn scenario_capacity(
        &self,
        changes: &[ScenarioChange],
        range: CapacityRange,
    ) -> Result<Vec<TeamCapacity>, PolarsError> {
        let scenario_assignments =
            scenario::apply_changes(&self.assignments()?, &self.developers, changes);
        Ok(capacity::team_capacity(
            &self.teams,
            &self.developers,
            &scenario_assignments,
            range,
        ))
    }

    /// Baseline-versus-scenario comparison over one range.
    pub fn compare_scenario(
        &self,
        changes: &[ScenarioChange],
        range: CapacityRange,
    ) -> Result<ScenarioComparison, PolarsError> {
        let baseline = self.team_capacity(range)?;
        let scenario_teams = self.scenario_capacity(changes, range)?;
        Ok(scenario::compare(&baseline, &scenario_teams))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
