use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use tera::Context;

use crate::domain::models::job::Job;
use crate::domain::ports::{EmailAttachment, OutboundEmail};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;

/// Polls the job table and delivers queued notifications. Handlers enqueue
/// and return immediately; delivery outcome only ever lands here.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let job_id = job.id.clone();
                    let job_type = job.job_type.clone();
                    let tenant_id = job.payload.tenant_id.clone();

                    let span = info_span!(
                        "background_job",
                        job_id = %job_id,
                        job_type = %job_type,
                        tenant_id = %tenant_id
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let target_id = &job.payload.target_id;
    let tenant_id = &job.payload.tenant_id;

    let tenant = state.tenant_repo.find_by_id(tenant_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant {} not found", tenant_id)))?;

    match job.job_type.as_str() {
        "CANCELLATION" => {
            let instance = state.instance_repo.find_by_id(tenant_id, target_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Instance {} not found", target_id)))?;
            let session = state.session_repo.find_by_id(tenant_id, &instance.session_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Session {} not found", instance.session_id)))?;
            let course = state.course_repo.find_by_id(tenant_id, &session.course_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Course {} not found", session.course_id)))?;

            let title = session.title.clone().unwrap_or_else(|| course.title.clone());
            let location = session.location.clone().unwrap_or_else(|| course.location.clone());

            let mut context = Context::new();
            context.insert("course_title", &title);
            context.insert("session_name", &session.name);
            context.insert("start_date", &instance.start_date.format("%Y-%m-%d").to_string());
            context.insert("start_time", &instance.start_time.format("%H:%M").to_string());
            context.insert("end_time", &instance.end_time.format("%H:%M").to_string());
            context.insert("reason", instance.cancellation_reason.as_deref().unwrap_or(""));
            context.insert("tenant_name", &tenant.name);

            let html = state.templates.render("cancellation.html", &context)
                .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

            let ics = generate_ics(&title, &location, &instance);

            info!("Sending cancellation notice to {}", course.contact_email);
            state.email_service.send(&OutboundEmail {
                to: course.contact_email.clone(),
                subject: format!("Cancelled: {} on {}", title, instance.start_date),
                html_body: html,
                attachment: Some(EmailAttachment {
                    filename: "instance.ics".to_string(),
                    content: ics.into_bytes(),
                }),
            }).await?;
        }
        "GENERATION" => {
            let session = state.session_repo.find_by_id(tenant_id, target_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Session {} not found", target_id)))?;
            let course = state.course_repo.find_by_id(tenant_id, &session.course_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Course {} not found", session.course_id)))?;

            let instances = state.instance_repo.list_by_session(&session.id).await?;
            if instances.is_empty() {
                return Ok(());
            }

            let title = session.title.clone().unwrap_or_else(|| course.title.clone());
            let first = instances.first().map(|i| i.start_date.to_string()).unwrap_or_default();
            let last = instances.last().map(|i| i.start_date.to_string()).unwrap_or_default();

            let mut context = Context::new();
            context.insert("course_title", &title);
            context.insert("session_name", &session.name);
            context.insert("instance_count", &instances.len());
            context.insert("first_date", &first);
            context.insert("last_date", &last);
            context.insert("tenant_name", &tenant.name);

            let html = state.templates.render("generation.html", &context)
                .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

            info!("Sending generation summary to {}", course.contact_email);
            state.email_service.send(&OutboundEmail {
                to: course.contact_email.clone(),
                subject: format!("Planning updated: {}", title),
                html_body: html,
                attachment: None,
            }).await?;
        }
        other => {
            return Err(AppError::InternalWithMsg(format!("Unknown job type {}", other)));
        }
    }

    Ok(())
}
