use super::{PersistenceResult, RosterStore};
use crate::metadata::RosterMetadata;
use crate::people::{Developer, Team, TimeOff};
use crate::{Assignment, Roster};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteRosterStore {
    connection: Mutex<Connection>,
}

impl SqliteRosterStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS roster_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL,
                teams_json TEXT NOT NULL,
                developers_json TEXT NOT NULL,
                time_off_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS assignments (
                id INTEGER PRIMARY KEY,
                assignment_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(&self, tx: &rusqlite::Transaction, roster: &Roster) -> PersistenceResult<()> {
        let metadata_json = serde_json::to_string(roster.metadata())?;
        let teams_json = serde_json::to_string(roster.teams())?;
        let developers_json = serde_json::to_string(roster.developers())?;
        let time_off_json = serde_json::to_string(roster.time_off())?;
        tx.execute("DELETE FROM roster_metadata", [])?;
        tx.execute(
            "INSERT INTO roster_metadata (id, metadata_json, teams_json, developers_json, time_off_json)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![metadata_json, teams_json, developers_json, time_off_json],
        )?;
        Ok(())
    }

    fn save_assignments(
        &self,
        tx: &rusqlite::Transaction,
        roster: &Roster,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM assignments", [])?;
        let assignments = roster.assignments()?;
        let mut stmt = tx.prepare("INSERT INTO assignments (id, assignment_json) VALUES (?1, ?2)")?;
        for assignment in &assignments {
            let json = serde_json::to_string(assignment)?;
            stmt.execute(params![assignment.id, json])?;
        }
        Ok(())
    }
}

impl RosterStore for SqliteRosterStore {
    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()> {
        super::validate_roster(roster)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_metadata(&tx, roster)?;
        self.save_assignments(&tx, roster)?;
        tx.commit()?;
        Ok(())
    }

    fn load_roster(&self) -> PersistenceResult<Option<Roster>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare(
            "SELECT metadata_json, teams_json, developers_json, time_off_json
             FROM roster_metadata WHERE id = 1",
        )?;
        let row: Option<(String, String, String, String)> = stmt
            .query_row([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .optional()?;

        let Some((metadata_json, teams_json, developers_json, time_off_json)) = row else {
            return Ok(None);
        };

        let metadata: RosterMetadata = serde_json::from_str(&metadata_json)?;
        let teams: Vec<Team> = serde_json::from_str(&teams_json)?;
        let developers: Vec<Developer> = serde_json::from_str(&developers_json)?;
        let time_off: Vec<TimeOff> = serde_json::from_str(&time_off_json)?;

        let mut stmt = conn.prepare("SELECT assignment_json FROM assignments ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut assignments = Vec::new();
        for json in rows {
            let json = json?;
            let assignment: Assignment = serde_json::from_str(&json)?;
            assignments.push(assignment);
        }

        super::validate_assignments(&assignments)?;

        let mut roster = Roster::from_parts(metadata, teams, developers, time_off);
        for assignment in assignments {
            roster.upsert_assignment_record(assignment)?;
        }

        Ok(Some(roster))
    }
}
