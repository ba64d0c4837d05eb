use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::tenant::TenantId;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
) -> Result<impl IntoResponse, AppError> {
    let jobs = state.job_repo.list_jobs(&tenant_id).await?;
    Ok(Json(jobs))
}
