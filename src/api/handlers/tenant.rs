use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateTenantRequest, UpdateTenantRequest};
use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation_field("name", "Name is required"));
    }
    if payload.slug.trim().is_empty() {
        return Err(AppError::validation_field("slug", "Slug is required"));
    }

    let mut tenant = Tenant::new(payload.name, payload.slug);
    tenant.logo_url = payload.logo_url;
    tenant.contact_email = payload.contact_email;

    let created = state.tenant_repo.create(&tenant).await?;
    info!("Tenant created: {}", created.id);
    Ok(Json(created))
}

pub async fn get_tenant_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state.tenant_repo.find_by_slug(&slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant '{}' not found", slug)))?;
    Ok(Json(tenant))
}

pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut tenant = state.tenant_repo.find_by_id(&tenant_id).await?
        .ok_or(AppError::NotFound("Tenant not found".into()))?;

    if let Some(val) = payload.name { tenant.name = val; }
    if let Some(val) = payload.logo_url { tenant.logo_url = Some(val); }
    if let Some(val) = payload.contact_email { tenant.contact_email = Some(val); }

    let updated = state.tenant_repo.update(&tenant).await?;
    info!("Tenant updated: {}", tenant_id);
    Ok(Json(updated))
}
