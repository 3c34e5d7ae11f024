use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::calculations::{Adjustment, adjust_schedule_by_name};
use crate::catalog::{Department, department_steps};
use crate::lead_times::LeadTimes;
use crate::persistence::{PersistenceError, StyleStore};
use crate::process::{ConfirmationPeriod, ProcessType};
use crate::schedule::{Schedule, ScheduleError};
use crate::session::{Session, SessionError};
use crate::style::{Style, StyleError, parse_date};
use crate::timeline::{TimelineRow, rows_from_frame};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn StyleStore>,
    writes: Arc<Mutex<()>>,
    lead_times: Arc<LeadTimes>,
}

impl AppState {
    pub fn new(store: Arc<dyn StyleStore>, lead_times: LeadTimes) -> Self {
        Self {
            store,
            writes: Arc::new(Mutex::new(())),
            lead_times: Arc::new(lead_times),
        }
    }

    fn open_session(&self, user_id: &str) -> Result<Session, ApiError> {
        Ok(Session::open(self.store.as_ref(), user_id, (*self.lead_times).clone())?)
    }

    /// Runs `f` on a session freshly loaded from the store. Nothing is kept
    /// between requests.
    fn with_session<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut Session) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let mut session = self.open_session(user_id)?;
        f(&mut session)
    }

    /// Loads, modifies and saves the user's styles under the write lock.
    fn update_session<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut Session) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let _guard = self.writes.lock();
        let mut session = self.open_session(user_id)?;
        let result = f(&mut session)?;
        session.save(self.store.as_ref())?;
        Ok(result)
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
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<StyleError> for ApiError {
    fn from(value: StyleError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::DateOutOfRange { .. } | ScheduleError::CatalogMismatch { .. } => {
                ApiError::Invalid(value.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::InvalidUserId(_)
            | PersistenceError::InvalidRow { .. }
            | PersistenceError::Style(_) => ApiError::Invalid(value.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::NoSuchStyle { .. } | SessionError::NoSchedule => {
                ApiError::NotFound(value.to_string())
            }
            SessionError::NoStyleNumbers | SessionError::Style(_) => {
                ApiError::Invalid(value.to_string())
            }
            SessionError::Persistence(err) => err.into(),
            SessionError::Schedule(err) => err.into(),
            SessionError::Timeline(err) => ApiError::Internal(err.to_string()),
        }
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
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                warn!(%message, "request failed");
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
struct CatalogQuery {
    process_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct CatalogStep {
    step: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct CatalogDepartment {
    department: &'static str,
    label: &'static str,
    steps: Vec<CatalogStep>,
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    sewing_start_date: String,
    process_type: String,
    cycle: i64,
}

#[derive(Debug, Deserialize)]
struct AdjustRequest {
    schedule: Schedule,
    department: String,
    step: String,
    new_date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct AdjustResponse {
    schedule: Schedule,
    adjustment: Adjustment,
}

#[derive(Debug, Deserialize)]
struct AddStylesRequest {
    style_numbers: Vec<String>,
    sewing_start_date: String,
    process_type: String,
    cycle: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(catalog))
        .route("/schedule", post(calculate))
        .route("/schedule/adjust", post(adjust))
        .route(
            "/users/:user/styles",
            get(list_styles).post(add_styles).delete(clear_styles),
        )
        .route("/users/:user/styles/:index", delete(delete_style))
        .route("/users/:user/styles/:index/schedule", get(style_schedule))
        .route("/users/:user/departments/:department", get(department_rows))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn catalog(
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<CatalogDepartment>>, ApiError> {
    let process_type = query
        .process_type
        .as_deref()
        .map(str::parse::<ProcessType>)
        .transpose()?;
    let departments = department_steps(process_type)
        .into_iter()
        .map(|(department, steps)| CatalogDepartment {
            department: department.as_str(),
            label: department.label(),
            steps: steps
                .iter()
                .map(|step| CatalogStep {
                    step: step.as_str(),
                    label: step.label(),
                })
                .collect(),
        })
        .collect();
    Ok(Json(departments))
}

async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, ApiError> {
    let anchor = parse_date(&request.sewing_start_date)?;
    let process_type: ProcessType = request.process_type.parse()?;
    let cycle = ConfirmationPeriod::try_from(request.cycle)?;
    let schedule = crate::calculations::calculate_schedule_with(
        anchor,
        process_type,
        cycle,
        &state.lead_times,
    )?;
    Ok(Json(schedule))
}

async fn adjust(Json(request): Json<AdjustRequest>) -> Result<Json<AdjustResponse>, ApiError> {
    let mut schedule = request.schedule;
    schedule.check_catalog()?;
    let adjustment = adjust_schedule_by_name(
        &mut schedule,
        &request.department,
        &request.step,
        request.new_date,
    );
    Ok(Json(AdjustResponse {
        schedule,
        adjustment,
    }))
}

async fn list_styles(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<Style>>, ApiError> {
    let styles = state.with_session(&user, |session| Ok(session.styles().to_vec()))?;
    Ok(Json(styles))
}

async fn add_styles(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(request): Json<AddStylesRequest>,
) -> Result<(StatusCode, Json<Vec<Style>>), ApiError> {
    let sewing_start_date = parse_date(&request.sewing_start_date)?;
    let process_type: ProcessType = request.process_type.parse()?;
    let cycle = ConfirmationPeriod::try_from(request.cycle)?;
    let styles = state.update_session(&user, |session| {
        session.add_batch(
            &request.style_numbers.join("\n"),
            sewing_start_date,
            process_type,
            cycle,
        )?;
        Ok(session.styles().to_vec())
    })?;
    Ok((StatusCode::CREATED, Json(styles)))
}

async fn clear_styles(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.update_session(&user, |session| {
        session.clear();
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_style(
    State(state): State<AppState>,
    Path((user, index)): Path<(String, usize)>,
) -> Result<Json<Style>, ApiError> {
    let removed = state.update_session(&user, |session| Ok(session.remove_style(index)?))?;
    Ok(Json(removed))
}

async fn style_schedule(
    State(state): State<AppState>,
    Path((user, index)): Path<(String, usize)>,
) -> Result<Json<Schedule>, ApiError> {
    let schedule = state.with_session(&user, |session| Ok(session.select(index)?.clone()))?;
    Ok(Json(schedule))
}

async fn department_rows(
    State(state): State<AppState>,
    Path((user, department)): Path<(String, String)>,
) -> Result<Json<Vec<TimelineRow>>, ApiError> {
    let department: Department = department
        .parse()
        .map_err(|err: StyleError| ApiError::not_found(err.to_string()))?;
    let frame = state.with_session(&user, |session| Ok(session.department_timeline(department)?))?;
    let rows = rows_from_frame(&frame).map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(Json(rows))
}
