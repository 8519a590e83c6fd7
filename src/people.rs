use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A delivery team that developers roll up to in capacity views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: i32,
    pub team_name: String,
}

impl Team {
    pub fn new(team_id: i32, team_name: impl Into<String>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
        }
    }
}

/// A developer on the roster. Developers without a `team_id` are left out of
/// team capacity rollups but still appear in the workload grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    pub developer_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i32>,
    /// Optional role label shown next to the developer, e.g. "Backend".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Developer {
    pub fn new(
        developer_id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            developer_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            team_id: None,
            position: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A recorded absence for a developer. Stored and served verbatim; capacity
/// math does not consume these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOff {
    pub time_off_id: i32,
    pub developer_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimeOff {
    pub fn new(
        time_off_id: i32,
        developer_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            time_off_id,
            developer_id,
            start_date,
            end_date,
            kind: kind.into(),
            note: None,
        }
    }
}
