use crate::domain::models::instance::SessionInstance;
use crate::domain::models::session::TrainingSession;
use crate::domain::services::recurrence::TimeSlot;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct InstancePreview {
    pub date: NaiveDate,
    pub slot: Option<TimeSlot>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub instance_type: String,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub count: usize,
    pub instances: Vec<InstancePreview>,
}

#[derive(Serialize)]
pub struct GeneratedResponse {
    pub count: usize,
    pub instances: Vec<SessionInstance>,
}

#[derive(Serialize)]
pub struct SessionDetailResponse {
    pub session: TrainingSession,
    /// Per-field effective values with their override flag.
    pub fields: Value,
}

#[derive(Serialize)]
pub struct ResetAllResponse {
    pub reset_fields: Vec<String>,
    pub fields: Value,
}
