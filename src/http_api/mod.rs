use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Assignment, CapacityRange, Developer, DeveloperCapacity, ObservationWindow, Roster,
    RosterMetadata, ScenarioChange, ScenarioComparison, Team, TeamCapacity, TimeOff, WorkloadGrid,
};

#[derive(Clone)]
pub struct AppState {
    roster: Arc<RwLock<Roster>>,
}

impl AppState {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
        }
    }

    pub fn with_shared(roster: Arc<RwLock<Roster>>) -> Self {
        Self { roster }
    }

    fn roster(&self) -> Arc<RwLock<Roster>> {
        self.roster.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    from: Option<NaiveDate>,
    weeks: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CompareRequest {
    #[serde(default)]
    changes: Vec<ScenarioChange>,
    from: Option<NaiveDate>,
    weeks: Option<usize>,
}

fn window_from_query(query: &WindowQuery) -> ObservationWindow {
    match (query.from, query.to) {
        (Some(from), Some(to)) => ObservationWindow::new(from, to),
        _ => ObservationWindow::around(Local::now().date_naive()),
    }
}

fn range_from_query(from: Option<NaiveDate>, weeks: Option<usize>) -> CapacityRange {
    let start = from.unwrap_or_else(|| Local::now().date_naive());
    CapacityRange::new(start, weeks.unwrap_or(12))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/:id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/developers", get(list_developers).post(upsert_developer))
        .route("/teams", get(list_teams).post(upsert_team))
        .route("/time-off", get(list_time_off).post(upsert_time_off))
        .route("/time-off/:id", axum::routing::delete(delete_time_off))
        .route("/workload", get(get_workload))
        .route("/capacity/teams", get(get_all_teams_capacity))
        .route("/capacity/team/:id", get(get_team_capacity))
        .route(
            "/capacity/team/:id/developers",
            get(get_developer_breakdown),
        )
        .route("/scenario/compare", post(compare_scenario))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, roster: Roster) -> std::io::Result<()> {
    let state = AppState::new(roster);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<RosterMetadata> {
    let roster = state.roster();
    let metadata = {
        let guard = roster.read();
        guard.metadata().clone()
    };
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<RosterMetadata>,
) -> Result<Json<RosterMetadata>, ApiError> {
    let roster = state.roster();
    {
        let mut guard = roster.write();
        guard
            .set_metadata(metadata)
            .map_err(|err| ApiError::invalid(err.to_string()))?;
    }
    let current = {
        let guard = roster.read();
        guard.metadata().clone()
    };
    Ok(Json(current))
}

async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let roster = state.roster();
    let assignments = {
        let guard = roster.read();
        guard.assignments()?
    };
    Ok(Json(assignments))
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i32>,
) -> Result<Json<Assignment>, ApiError> {
    let roster = state.roster();
    let result = {
        let guard = roster.read();
        guard.find_assignment(assignment_id)?
    };
    match result {
        Some(assignment) => Ok(Json(assignment)),
        None => Err(ApiError::not_found(format!(
            "assignment {assignment_id} not found"
        ))),
    }
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(assignment): Json<Assignment>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let roster = state.roster();
    {
        let mut guard = roster.write();
        if guard.find_assignment(assignment.id)?.is_some() {
            return Err(ApiError::Conflict(format!(
                "assignment {} already exists",
                assignment.id
            )));
        }
        guard
            .upsert_assignment_record(assignment.clone())
            .map_err(ApiError::from)?;
    }
    let created = {
        let guard = roster.read();
        guard
            .find_assignment(assignment.id)?
            .ok_or_else(|| ApiError::internal("assignment not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i32>,
    Json(assignment): Json<Assignment>,
) -> Result<Json<Assignment>, ApiError> {
    if assignment.id != assignment_id {
        return Err(ApiError::invalid(
            "assignment id in payload does not match path parameter",
        ));
    }
    let roster = state.roster();
    {
        let mut guard = roster.write();
        if guard.find_assignment(assignment_id)?.is_none() {
            return Err(ApiError::not_found(format!(
                "assignment {assignment_id} not found"
            )));
        }
        guard
            .upsert_assignment_record(assignment.clone())
            .map_err(ApiError::from)?;
    }
    let updated = {
        let guard = roster.read();
        guard
            .find_assignment(assignment_id)?
            .ok_or_else(|| ApiError::internal("assignment not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let roster = state.roster();
    let removed = {
        let mut guard = roster.write();
        guard.delete_assignment(assignment_id)?
    };
    if !removed {
        return Err(ApiError::not_found(format!(
            "assignment {assignment_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_developers(State(state): State<AppState>) -> Json<Vec<Developer>> {
    let roster = state.roster();
    let developers = {
        let guard = roster.read();
        guard.developers().to_vec()
    };
    Json(developers)
}

async fn upsert_developer(
    State(state): State<AppState>,
    Json(developer): Json<Developer>,
) -> (StatusCode, Json<Developer>) {
    let roster = state.roster();
    {
        let mut guard = roster.write();
        guard.upsert_developer(developer.clone());
    }
    (StatusCode::CREATED, Json(developer))
}

async fn list_teams(State(state): State<AppState>) -> Json<Vec<Team>> {
    let roster = state.roster();
    let teams = {
        let guard = roster.read();
        guard.teams().to_vec()
    };
    Json(teams)
}

async fn upsert_team(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> (StatusCode, Json<Team>) {
    let roster = state.roster();
    {
        let mut guard = roster.write();
        guard.upsert_team(team.clone());
    }
    (StatusCode::CREATED, Json(team))
}

async fn list_time_off(State(state): State<AppState>) -> Json<Vec<TimeOff>> {
    let roster = state.roster();
    let records = {
        let guard = roster.read();
        guard.time_off().to_vec()
    };
    Json(records)
}

async fn upsert_time_off(
    State(state): State<AppState>,
    Json(record): Json<TimeOff>,
) -> (StatusCode, Json<TimeOff>) {
    let roster = state.roster();
    {
        let mut guard = roster.write();
        guard.upsert_time_off(record.clone());
    }
    (StatusCode::CREATED, Json(record))
}

async fn delete_time_off(
    State(state): State<AppState>,
    Path(time_off_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let roster = state.roster();
    let removed = {
        let mut guard = roster.write();
        guard.remove_time_off(time_off_id)
    };
    if !removed {
        return Err(ApiError::not_found(format!(
            "time off record {time_off_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_workload(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WorkloadGrid>, ApiError> {
    let window = window_from_query(&query);
    let roster = state.roster();
    let grid = {
        let guard = roster.read();
        guard.workload(window)?
    };
    Ok(Json(grid))
}

async fn get_all_teams_capacity(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TeamCapacity>>, ApiError> {
    let range = range_from_query(query.from, query.weeks);
    let roster = state.roster();
    let teams = {
        let guard = roster.read();
        guard.team_capacity(range)?
    };
    Ok(Json(teams))
}

async fn get_team_capacity(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<TeamCapacity>, ApiError> {
    let range = range_from_query(query.from, query.weeks);
    let roster = state.roster();
    let teams = {
        let guard = roster.read();
        guard.team_capacity(range)?
    };
    teams
        .into_iter()
        .find(|team| team.team_id == team_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("team {team_id} not found")))
}

async fn get_developer_breakdown(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<DeveloperCapacity>>, ApiError> {
    let range = range_from_query(query.from, query.weeks);
    let roster = state.roster();
    let guard = roster.read();
    if !guard.teams().iter().any(|team| team.team_id == team_id) {
        return Err(ApiError::not_found(format!("team {team_id} not found")));
    }
    let breakdown = guard.developer_breakdown(team_id, range)?;
    Ok(Json(breakdown))
}

async fn compare_scenario(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ScenarioComparison>, ApiError> {
    let range = range_from_query(request.from, request.weeks);
    let roster = state.roster();
    let comparison = {
        let guard = roster.read();
        guard.compare_scenario(&request.changes, range)?
    };
    Ok(Json(comparison))
}
