use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Course template. Sessions cloned from a course inherit its field values
/// until they override them locally.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Course {
    pub id: String,
    pub tenant_id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub trainer_name: String,
    pub timezone: String,
    pub duration_min: i32,
    pub max_participants: i32,
    pub default_instance_type: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}
