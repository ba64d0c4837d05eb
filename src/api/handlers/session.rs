use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::api::dtos::requests::{CreateSessionRequest, SetOverrideRequest};
use crate::api::dtos::responses::{ResetAllResponse, SessionDetailResponse};
use crate::domain::models::session::TrainingSession;
use crate::domain::services::overrides::OverrideSet;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.course_repo.find_by_slug(&tenant_id, &slug).await?
        .ok_or(AppError::NotFound("Course not found".into()))?;

    if payload.name.trim().is_empty() {
        return Err(AppError::validation_field("name", "Session name is required"));
    }

    // A fresh clone carries no local values: every overridable field reads
    // from the template until it is explicitly overridden.
    let session = TrainingSession::new(tenant_id, course.id, payload.name);
    let created = state.session_repo.create(&session).await?;

    info!("Created session {} from course {}", created.id, slug);
    Ok(Json(created))
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.course_repo.find_by_slug(&tenant_id, &slug).await?
        .ok_or(AppError::NotFound("Course not found".into()))?;

    let sessions = state.session_repo.list_by_course(&course.id).await?;
    Ok(Json(sessions))
}

async fn load_session_with_course(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
) -> Result<(crate::domain::models::course::Course, TrainingSession), AppError> {
    let session = state.session_repo.find_by_id(tenant_id, session_id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let course = state.course_repo.find_by_id(tenant_id, &session.course_id).await?
        .ok_or_else(|| AppError::InternalWithMsg(format!("Course {} missing for session {}", session.course_id, session_id)))?;

    Ok((course, session))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let (course, mut session) = load_session_with_course(&state, &tenant_id, &session_id).await?;

    let fields = OverrideSet::new(&course, &mut session).view();
    Ok(Json(SessionDetailResponse { session, fields }))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.session_repo.delete(&tenant_id, &session_id).await?;
    info!("Deleted session {}", session_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let (course, mut session) = load_session_with_course(&state, &tenant_id, &session_id).await?;
    Ok(Json(OverrideSet::new(&course, &mut session).view()))
}

pub async fn set_override(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id, field)): Path<(String, String, String)>,
    Json(payload): Json<SetOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (course, mut session) = load_session_with_course(&state, &tenant_id, &session_id).await?;

    let effective = {
        let mut overrides = OverrideSet::new(&course, &mut session);
        overrides.set(&field, payload.value)?;
        overrides.get(&field)?
    };

    state.session_repo.update(&session).await?;
    info!("Override set on session {}: {}", session_id, field);
    Ok(Json(serde_json::json!({
        "field": field,
        "value": effective,
        "overridden": true,
    })))
}

pub async fn reset_override(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id, field)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let (course, mut session) = load_session_with_course(&state, &tenant_id, &session_id).await?;

    let effective = {
        let mut overrides = OverrideSet::new(&course, &mut session);
        overrides.reset_one(&field)?;
        overrides.get(&field)?
    };

    state.session_repo.update(&session).await?;
    info!("Override reset on session {}: {}", session_id, field);
    Ok(Json(serde_json::json!({
        "field": field,
        "value": effective,
        "overridden": false,
    })))
}

pub async fn reset_all_overrides(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let (course, mut session) = load_session_with_course(&state, &tenant_id, &session_id).await?;

    // Batch semantics: one persisted update and one response for the whole
    // reset, not one per field.
    let (reset_fields, fields) = {
        let mut overrides = OverrideSet::new(&course, &mut session);
        let reset = overrides.reset_all();
        (reset, overrides.view())
    };

    state.session_repo.update(&session).await?;
    info!("Reset {} overrides on session {}", reset_fields.len(), session_id);
    Ok(Json(ResetAllResponse { reset_fields, fields }))
}
