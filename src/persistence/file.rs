use super::{PersistenceError, PersistenceResult};
use crate::{
    Assignment, Roster,
    metadata::RosterMetadata,
    people::{Developer, Team, TimeOff},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct RosterSnapshot {
    metadata: RosterMetadata,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    developers: Vec<Developer>,
    #[serde(default)]
    time_off: Vec<TimeOff>,
    assignments: Vec<Assignment>,
}

impl RosterSnapshot {
    fn from_roster(roster: &Roster) -> PersistenceResult<Self> {
        let assignments = roster.assignments()?;
        super::validate_assignments(&assignments)?;
        Ok(Self {
            metadata: roster.metadata().clone(),
            teams: roster.teams().to_vec(),
            developers: roster.developers().to_vec(),
            time_off: roster.time_off().to_vec(),
            assignments,
        })
    }

    fn into_roster(self) -> PersistenceResult<Roster> {
        super::validate_assignments(&self.assignments)?;
        let mut roster =
            Roster::from_parts(self.metadata, self.teams, self.developers, self.time_off);
        for assignment in self.assignments {
            roster.upsert_assignment_record(assignment)?;
        }
        Ok(roster)
    }
}

pub fn save_roster_to_json<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let snapshot = RosterSnapshot::from_roster(roster)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_roster_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Roster> {
    let file = File::open(path)?;
    let snapshot: RosterSnapshot = serde_json::from_reader(file)?;
    snapshot.into_roster()
}

#[derive(Default, Serialize, Deserialize)]
struct AssignmentCsvRecord {
    id: i32,
    developer_id: String,
    developer_name: String,
    position: String,
    project_id: String,
    subitem_id: String,
    start_date: String,
    end_date: String,
    ratio: String,
    #[serde(default)]
    metadata_json: String,
    #[serde(default)]
    teams_json: String,
    #[serde(default)]
    developers_json: String,
    #[serde(default)]
    time_off_json: String,
}

impl From<&Assignment> for AssignmentCsvRecord {
    fn from(assignment: &Assignment) -> Self {
        let mut record = AssignmentCsvRecord::default();
        record.id = assignment.id;
        record.developer_id = format_option_i32(assignment.developer_id);
        record.developer_name = assignment.developer_name.clone().unwrap_or_default();
        record.position = assignment.position.clone().unwrap_or_default();
        record.project_id = format_option_i32(assignment.project_id);
        record.subitem_id = format_option_i32(assignment.subitem_id);
        record.start_date = format_date(assignment.start_date);
        record.end_date = format_date(assignment.end_date);
        record.ratio = format_option_f64(assignment.ratio);
        record
    }
}

impl AssignmentCsvRecord {
    fn metadata_row(roster: &Roster) -> PersistenceResult<Self> {
        let mut record = AssignmentCsvRecord::default();
        record.developer_name = "__metadata__".to_string();
        record.metadata_json = serde_json::to_string(roster.metadata())?;
        record.teams_json = serde_json::to_string(roster.teams())?;
        record.developers_json = serde_json::to_string(roster.developers())?;
        record.time_off_json = serde_json::to_string(roster.time_off())?;
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_assignment(self) -> PersistenceResult<Assignment> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to assignment".into(),
            ));
        }
        Ok(Assignment {
            id: self.id,
            developer_id: parse_i32(&self.developer_id)?,
            developer_name: parse_string_option(self.developer_name),
            position: parse_string_option(self.position),
            project_id: parse_i32(&self.project_id)?,
            subitem_id: parse_i32(&self.subitem_id)?,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            ratio: parse_f64(&self.ratio)?,
        })
    }
}

pub fn save_roster_to_csv<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    super::validate_roster(roster)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(AssignmentCsvRecord::metadata_row(roster)?)?;
    let assignments = roster.assignments()?;
    for assignment in &assignments {
        writer.serialize(AssignmentCsvRecord::from(assignment))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_roster_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Roster> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut assignments = Vec::new();
    let mut metadata: Option<RosterMetadata> = None;
    let mut teams: Vec<Team> = Vec::new();
    let mut developers: Vec<Developer> = Vec::new();
    let mut time_off: Vec<TimeOff> = Vec::new();
    for record in reader.deserialize::<AssignmentCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            if !record.teams_json.trim().is_empty() {
                teams = serde_json::from_str(&record.teams_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid teams json: {err}"))
                })?;
            }
            if !record.developers_json.trim().is_empty() {
                developers = serde_json::from_str(&record.developers_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid developers json: {err}"))
                })?;
            }
            if !record.time_off_json.trim().is_empty() {
                time_off = serde_json::from_str(&record.time_off_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid time off json: {err}"))
                })?;
            }
            continue;
        }
        assignments.push(record.into_assignment()?);
    }

    if assignments.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no assignments".into(),
        ));
    }

    super::validate_assignments(&assignments)?;

    let mut roster = match metadata {
        Some(metadata) => Roster::from_parts(metadata, teams, developers, time_off),
        None => Roster::new(),
    };
    for assignment in assignments {
        roster.upsert_assignment_record(assignment)?;
    }
    Ok(roster)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid float '{input}': {e}")))
}

fn format_option_i32(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_i32(input: &str) -> PersistenceResult<Option<i32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
