use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub plan_name: String,
    pub plan_description: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

impl Default for RosterMetadata {
    fn default() -> Self {
        Self {
            plan_name: "New Staffing Plan".to_string(),
            plan_description: "No description".to_string(),
            window_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            window_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        }
    }
}
