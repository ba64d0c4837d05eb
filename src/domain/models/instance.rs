use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceType {
    #[serde(rename = "presentiel")]
    Presentiel,
    #[serde(rename = "distanciel")]
    Distanciel,
    #[serde(rename = "e-learning")]
    ELearning,
}

impl InstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::Presentiel => "presentiel",
            InstanceType::Distanciel => "distanciel",
            InstanceType::ELearning => "e-learning",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "presentiel" => Ok(InstanceType::Presentiel),
            "distanciel" => Ok(InstanceType::Distanciel),
            "e-learning" => Ok(InstanceType::ELearning),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }
}

/// Physical classroom details. Required fields default to empty strings so
/// the resolver can report them with a field-level message instead of a
/// deserialization failure.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PresentielDetails {
    #[serde(default)]
    pub location_address: String,
    #[serde(default)]
    pub location_city: String,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub track_attendance: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DistancielDetails {
    pub platform: Option<String>,
    #[serde(default)]
    pub meeting_link: String,
    pub meeting_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ElearningDetails {
    pub platform: Option<String>,
    #[serde(default)]
    pub elearning_link: String,
    pub access_start: Option<DateTime<Utc>>,
    pub access_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub self_paced: bool,
}

/// Exactly one variant per instance; the tag always matches `instance_type`
/// on the owning row.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum InstancePayload {
    #[serde(rename = "presentiel")]
    Presentiel(PresentielDetails),
    #[serde(rename = "distanciel")]
    Distanciel(DistancielDetails),
    #[serde(rename = "e-learning")]
    ELearning(ElearningDetails),
}

impl InstancePayload {
    pub fn instance_type(&self) -> InstanceType {
        match self {
            InstancePayload::Presentiel(_) => InstanceType::Presentiel,
            InstancePayload::Distanciel(_) => InstanceType::Distanciel,
            InstancePayload::ELearning(_) => InstanceType::ELearning,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SessionInstance {
    pub id: String,
    pub tenant_id: String,
    pub session_id: String,
    pub instance_type: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: String,
    pub is_cancelled: bool,
    pub cancellation_reason: Option<String>,
    pub payload_json: String,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewInstanceParams {
    pub tenant_id: String,
    pub session_id: String,
    pub instance_type: InstanceType,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub payload_json: String,
    pub max_participants: Option<i32>,
}

impl SessionInstance {
    pub fn new(params: NewInstanceParams) -> Self {
        let duration_minutes =
            (params.end_time - params.start_time).num_minutes() as i32;

        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            session_id: params.session_id,
            instance_type: params.instance_type.as_str().to_string(),
            start_date: params.start_date,
            start_time: params.start_time,
            end_time: params.end_time,
            duration_minutes,
            status: "scheduled".to_string(),
            is_cancelled: false,
            cancellation_reason: None,
            payload_json: params.payload_json,
            max_participants: params.max_participants,
            current_participants: 0,
            created_at: Utc::now(),
        }
    }

    pub fn payload(&self) -> Result<InstancePayload, AppError> {
        serde_json::from_str(&self.payload_json)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt instance payload: {}", e)))
    }

    /// Marks the instance cancelled. Cancelling twice is rejected, not
    /// silently ignored, and the row is never deleted.
    pub fn cancel(&mut self, reason: &str) -> Result<(), AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::validation_field("reason", "Cancellation reason is required"));
        }
        if self.is_cancelled {
            return Err(AppError::Validation("Instance is already cancelled".into()));
        }

        self.is_cancelled = true;
        self.status = "cancelled".to_string();
        self.cancellation_reason = Some(reason.trim().to_string());
        Ok(())
    }
}
