use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

/// Resolves the `{tenant_id}` path segment against the tenant table before
/// any handler runs; unknown tenants never reach domain code.
pub struct TenantId(pub String);

impl FromRequestParts<Arc<AppState>> for TenantId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Missing path parameters".into()))?;

        let tenant_id = params
            .get("tenant_id")
            .ok_or_else(|| AppError::Validation("Missing tenant_id".into()))?;

        match state.tenant_repo.find_by_id(tenant_id).await? {
            Some(_) => Ok(TenantId(tenant_id.clone())),
            None => Err(AppError::NotFound(format!("Tenant {} not found", tenant_id))),
        }
    }
}
