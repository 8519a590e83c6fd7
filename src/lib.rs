pub mod assignment;
pub(crate) mod assignment_validation;
pub mod calendar;
pub mod capacity;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod people;
pub mod persistence;
pub mod roster;
pub mod scenario;
pub mod utilization;
pub mod workload;

pub use assignment::Assignment;
pub use calendar::{WeekInfo, parse_week_key, week_key_of, week_label, week_start_of};
pub use capacity::{
    AvailabilityLevel, CapacityRange, DeveloperCapacity, TeamCapacity, UtilizationLevel,
    WeekCapacity, developer_breakdown, team_capacity,
};
pub use metadata::RosterMetadata;
pub use people::{Developer, Team, TimeOff};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRosterStore;
pub use persistence::{
    PersistenceError, RosterStore, load_roster_from_csv, load_roster_from_json, save_roster_to_csv,
    save_roster_to_json, validate_assignments, validate_roster,
};
pub use roster::{Roster, RosterMetadataError};
pub use scenario::{
    ChangeType, ComparisonSummary, ScenarioChange, ScenarioComparison, TeamComparison, WeekDelta,
    apply_changes, compare,
};
pub use utilization::{UtilizationBand, load_percentage};
pub use workload::{
    DeveloperWorkload, ObservationWindow, WEEKLY_CAPACITY_HOURS, WorkloadGrid, WorkloadSummary,
    aggregate,
};
