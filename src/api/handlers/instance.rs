use axum::{extract::{State, Path}, http::header, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::api::dtos::requests::{CancelInstanceRequest, GenerateInstancesRequest};
use crate::api::dtos::responses::{GeneratedResponse, InstancePreview, PreviewResponse};
use crate::domain::models::course::Course;
use crate::domain::models::instance::{InstancePayload, InstanceType, NewInstanceParams, SessionInstance};
use crate::domain::models::job::Job;
use crate::domain::models::session::TrainingSession;
use crate::domain::services::calendar::generate_ics;
use crate::domain::services::instance_type::payload_from_json;
use crate::domain::services::recurrence::{expand, GeneratedSlot};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

async fn load_session_with_course(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
) -> Result<(Course, TrainingSession), AppError> {
    let session = state.session_repo.find_by_id(tenant_id, session_id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let course = state.course_repo.find_by_id(tenant_id, &session.course_id).await?
        .ok_or_else(|| AppError::InternalWithMsg(format!("Course {} missing for session {}", session.course_id, session_id)))?;

    Ok((course, session))
}

fn resolve_request(
    course: &Course,
    payload: GenerateInstancesRequest,
) -> Result<(InstanceType, InstancePayload, Vec<GeneratedSlot>), AppError> {
    let instance_type = match payload.instance_type {
        Some(raw) => InstanceType::parse(&raw)?,
        None => InstanceType::parse(&course.default_instance_type)?,
    };

    let typed_payload = payload_from_json(instance_type, payload.payload)?;
    let generated = expand(&payload.recurrence)?;

    Ok((instance_type, typed_payload, generated))
}

/// Dry run of the generation: expands and validates but persists nothing,
/// so the caller can surface "N instances would be generated" (including 0)
/// before committing.
pub async fn preview_instances(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
    Json(payload): Json<GenerateInstancesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (course, _session) = load_session_with_course(&state, &tenant_id, &session_id).await?;
    let (instance_type, _typed_payload, generated) = resolve_request(&course, payload)?;

    let instances: Vec<InstancePreview> = generated
        .into_iter()
        .map(|g| InstancePreview {
            date: g.date,
            slot: g.slot,
            start_time: g.start_time,
            end_time: g.end_time,
            instance_type: instance_type.as_str().to_string(),
        })
        .collect();

    Ok(Json(PreviewResponse { count: instances.len(), instances }))
}

pub async fn generate_instances(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
    Json(payload): Json<GenerateInstancesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (course, session) = load_session_with_course(&state, &tenant_id, &session_id).await?;
    let (instance_type, typed_payload, generated) = resolve_request(&course, payload)?;

    if generated.is_empty() {
        info!("Generation for session {} matched no dates", session_id);
        return Ok(Json(GeneratedResponse { count: 0, instances: vec![] }));
    }

    let payload_json = serde_json::to_string(&typed_payload)
        .map_err(|_| AppError::Validation("Invalid payload".into()))?;
    let max_participants = session.max_participants.unwrap_or(course.max_participants);

    let instances: Vec<SessionInstance> = generated
        .into_iter()
        .map(|g| SessionInstance::new(NewInstanceParams {
            tenant_id: tenant_id.clone(),
            session_id: session.id.clone(),
            instance_type,
            start_date: g.date,
            start_time: g.start_time,
            end_time: g.end_time,
            payload_json: payload_json.clone(),
            max_participants: Some(max_participants),
        }))
        .collect();

    // Insert order is generation order; list views rely on it matching the
    // chronological ordering.
    let created = state.instance_repo.create_batch(&instances).await?;

    let job = Job::new("GENERATION", session.id.clone(), tenant_id.clone(), Utc::now());
    state.job_repo.create(&job).await?;

    info!("Generated {} instances for session {}", created.len(), session_id);
    Ok(Json(GeneratedResponse { count: created.len(), instances: created }))
}

pub async fn list_instances(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    // Existence check keeps 404 semantics consistent with the other routes.
    let _ = load_session_with_course(&state, &tenant_id, &session_id).await?;

    let instances = state.instance_repo.list_by_session(&session_id).await?;
    Ok(Json(instances))
}

pub async fn get_instance(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, instance_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let instance = state.instance_repo.find_by_id(&tenant_id, &instance_id).await?
        .ok_or(AppError::NotFound("Instance not found".into()))?;
    Ok(Json(instance))
}

pub async fn cancel_instance(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, instance_id)): Path<(String, String)>,
    Json(payload): Json<CancelInstanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut instance = state.instance_repo.find_by_id(&tenant_id, &instance_id).await?
        .ok_or(AppError::NotFound("Instance not found".into()))?;

    instance.cancel(&payload.reason)?;
    let updated = state.instance_repo.update(&instance).await?;

    // Fire-and-forget: the notification is queued, the request never waits
    // on mail delivery.
    let job = Job::new("CANCELLATION", updated.id.clone(), tenant_id.clone(), Utc::now());
    state.job_repo.create(&job).await?;

    info!("Instance cancelled: {}", instance_id);
    Ok(Json(updated))
}

pub async fn instance_ics(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, instance_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let instance = state.instance_repo.find_by_id(&tenant_id, &instance_id).await?
        .ok_or(AppError::NotFound("Instance not found".into()))?;

    let (course, session) = load_session_with_course(&state, &tenant_id, &instance.session_id).await?;

    let title = session.title.as_ref().unwrap_or(&course.title);
    let location = session.location.as_ref().unwrap_or(&course.location);
    let ics = generate_ics(title, location, &instance);

    Ok((
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics,
    ))
}
