use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled run of a course. Every column in the overridable set is
/// nullable: NULL means the value is inherited live from the course template.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TrainingSession {
    pub id: String,
    pub tenant_id: String,
    pub course_id: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub max_participants: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    pub fn new(tenant_id: String, course_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            course_id,
            name,
            title: None,
            description: None,
            location: None,
            trainer_name: None,
            max_participants: None,
            created_at: Utc::now(),
        }
    }
}
