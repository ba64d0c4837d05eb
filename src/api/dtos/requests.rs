use crate::domain::services::recurrence::RecurrenceSpec;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub trainer_name: String,
    pub timezone: String,
    pub duration_min: i32,
    pub max_participants: i32,
    pub default_instance_type: Option<String>,
    pub contact_email: String,
}

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub timezone: Option<String>,
    pub duration_min: Option<i32>,
    pub max_participants: Option<i32>,
    pub default_instance_type: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SetOverrideRequest {
    pub value: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Deserialize)]
pub struct GenerateInstancesRequest {
    /// Falls back to the course's default_instance_type when absent.
    pub instance_type: Option<String>,
    #[serde(default = "empty_object")]
    pub payload: Value,
    pub recurrence: RecurrenceSpec,
}

#[derive(Deserialize)]
pub struct CancelInstanceRequest {
    #[serde(default)]
    pub reason: String,
}
