use crate::domain::models::{
    course::Course, instance::SessionInstance, job::Job, session::TrainingSession, tenant::Tenant,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: &Course) -> Result<Course, AppError>;
    async fn find_by_slug(&self, tenant_id: &str, slug: &str) -> Result<Option<Course>, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Course>, AppError>;
    async fn list(&self, tenant_id: &str) -> Result<Vec<Course>, AppError>;
    async fn update(&self, course: &Course) -> Result<Course, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &TrainingSession) -> Result<TrainingSession, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<TrainingSession>, AppError>;
    async fn list_by_course(&self, course_id: &str) -> Result<Vec<TrainingSession>, AppError>;
    async fn update(&self, session: &TrainingSession) -> Result<TrainingSession, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// Persists a generated batch in the order given, atomically: either
    /// every instance is stored or none is.
    async fn create_batch(&self, instances: &[SessionInstance]) -> Result<Vec<SessionInstance>, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<SessionInstance>, AppError>;
    /// Chronological by (start_date, start_time).
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<SessionInstance>, AppError>;
    async fn update(&self, instance: &SessionInstance) -> Result<SessionInstance, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn list_jobs(&self, tenant_id: &str) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

pub struct EmailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<EmailAttachment>,
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), AppError>;
}
