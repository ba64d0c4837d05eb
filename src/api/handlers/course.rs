use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::api::dtos::requests::{CreateCourseRequest, UpdateCourseRequest};
use crate::domain::models::course::Course;
use crate::domain::models::instance::InstanceType;
use crate::error::AppError;
use std::sync::Arc;
use uuid::Uuid;
use chrono::Utc;
use chrono_tz::Tz;
use tracing::info;

pub async fn create_course(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating course: {} for tenant: {}", payload.slug, tenant_id);

    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::validation_field("timezone", "Invalid timezone"));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::validation_field("duration_min", "Duration must be positive"));
    }
    if payload.max_participants <= 0 {
        return Err(AppError::validation_field("max_participants", "Capacity must be positive"));
    }
    if payload.contact_email.trim().is_empty() {
        return Err(AppError::validation_field("contact_email", "Contact email is required"));
    }

    let default_instance_type = match payload.default_instance_type {
        Some(raw) => InstanceType::parse(&raw)?,
        None => InstanceType::Presentiel,
    };

    let course = Course {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant_id.clone(),
        slug: payload.slug,
        title: payload.title,
        description: payload.description,
        location: payload.location,
        trainer_name: payload.trainer_name,
        timezone: payload.timezone,
        duration_min: payload.duration_min,
        max_participants: payload.max_participants,
        default_instance_type: default_instance_type.as_str().to_string(),
        contact_email: payload.contact_email,
        created_at: Utc::now(),
    };

    let created = state.course_repo.create(&course).await?;
    Ok(Json(created))
}

pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
) -> Result<impl IntoResponse, AppError> {
    let courses = state.course_repo.list(&tenant_id).await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.course_repo.find_by_slug(&tenant_id, &slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Course '{}' not found", slug)))?;
    Ok(Json(course))
}

pub async fn update_course(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut course = state.course_repo.find_by_slug(&tenant_id, &slug).await?
        .ok_or(AppError::NotFound("Course not found".into()))?;

    if let Some(val) = payload.slug { course.slug = val; }
    if let Some(val) = payload.title { course.title = val; }
    if let Some(val) = payload.description { course.description = val; }
    if let Some(val) = payload.location { course.location = val; }
    if let Some(val) = payload.trainer_name { course.trainer_name = val; }
    if let Some(val) = payload.timezone {
        if val.parse::<Tz>().is_err() {
            return Err(AppError::validation_field("timezone", "Invalid timezone"));
        }
        course.timezone = val;
    }
    if let Some(val) = payload.duration_min {
        if val <= 0 {
            return Err(AppError::validation_field("duration_min", "Duration must be positive"));
        }
        course.duration_min = val;
    }
    if let Some(val) = payload.max_participants {
        if val <= 0 {
            return Err(AppError::validation_field("max_participants", "Capacity must be positive"));
        }
        course.max_participants = val;
    }
    if let Some(val) = payload.default_instance_type {
        course.default_instance_type = InstanceType::parse(&val)?.as_str().to_string();
    }
    if let Some(val) = payload.contact_email { course.contact_email = val; }

    let updated = state.course_repo.update(&course).await?;
    info!("Course updated: {}", slug);
    Ok(Json(updated))
}

pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.course_repo.find_by_slug(&tenant_id, &slug).await?
        .ok_or(AppError::NotFound("Course not found".into()))?;

    state.course_repo.delete(&tenant_id, &course.id).await?;
    info!("Course deleted: {}", slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
