use std::sync::Arc;
use crate::domain::ports::{
    TenantRepository, CourseRepository, SessionRepository, InstanceRepository,
    JobRepository, EmailService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub course_repo: Arc<dyn CourseRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub instance_repo: Arc<dyn InstanceRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
