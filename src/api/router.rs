use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{course, health, instance, job, session, tenant};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Tenants
        .route("/api/v1/tenants", post(tenant::create_tenant))
        .route("/api/v1/tenants/by-slug/{slug}", get(tenant::get_tenant_by_slug))
        .route("/api/v1/tenants/{tenant_id}", put(tenant::update_tenant))

        // Courses (templates)
        .route("/api/v1/{tenant_id}/courses", post(course::create_course).get(course::list_courses))
        .route("/api/v1/{tenant_id}/courses/{slug}", get(course::get_course).put(course::update_course).delete(course::delete_course))

        // Sessions cloned from a course
        .route("/api/v1/{tenant_id}/courses/{slug}/sessions", post(session::create_session).get(session::list_sessions))
        .route("/api/v1/{tenant_id}/sessions/{session_id}", get(session::get_session).delete(session::delete_session))

        // Per-field template overrides
        .route("/api/v1/{tenant_id}/sessions/{session_id}/overrides", get(session::list_overrides))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/overrides/reset", post(session::reset_all_overrides))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/overrides/{field}", put(session::set_override).delete(session::reset_override))

        // Instance generation & lifecycle
        .route("/api/v1/{tenant_id}/sessions/{session_id}/instances/preview", post(instance::preview_instances))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/instances/generate", post(instance::generate_instances))
        .route("/api/v1/{tenant_id}/sessions/{session_id}/instances", get(instance::list_instances))
        .route("/api/v1/{tenant_id}/instances/{instance_id}", get(instance::get_instance))
        .route("/api/v1/{tenant_id}/instances/{instance_id}/cancel", post(instance::cancel_instance))
        .route("/api/v1/{tenant_id}/instances/{instance_id}/ics", get(instance::instance_ics))

        // Notification jobs
        .route("/api/v1/{tenant_id}/jobs", get(job::list_jobs))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
