use serde_json::Value;
use url::Url;

use crate::domain::models::instance::{InstancePayload, InstanceType};
use crate::error::AppError;

/// Deserializes the raw payload object into the variant selected by
/// `instance_type`, then runs the per-type validation rules.
pub fn payload_from_json(instance_type: InstanceType, payload: Value) -> Result<InstancePayload, AppError> {
    let payload = match instance_type {
        InstanceType::Presentiel => serde_json::from_value(payload)
            .map(InstancePayload::Presentiel)
            .map_err(|e| AppError::Validation(format!("Invalid presentiel payload: {}", e)))?,
        InstanceType::Distanciel => serde_json::from_value(payload)
            .map(InstancePayload::Distanciel)
            .map_err(|e| AppError::Validation(format!("Invalid distanciel payload: {}", e)))?,
        InstanceType::ELearning => serde_json::from_value(payload)
            .map(InstancePayload::ELearning)
            .map_err(|e| AppError::Validation(format!("Invalid e-learning payload: {}", e)))?,
    };

    validate_payload(instance_type, payload)
}

/// Pure validation: checks the payload variant against `instance_type` and
/// enforces the per-type required fields. No I/O, no mutation.
pub fn validate_payload(instance_type: InstanceType, payload: InstancePayload) -> Result<InstancePayload, AppError> {
    if payload.instance_type() != instance_type {
        return Err(AppError::Validation(format!(
            "Payload of type '{}' does not match instance_type '{}'",
            payload.instance_type().as_str(),
            instance_type.as_str()
        )));
    }

    match &payload {
        InstancePayload::Presentiel(details) => {
            if details.location_address.trim().is_empty() {
                return Err(AppError::validation_field("location_address", "Address is required"));
            }
            if details.location_city.trim().is_empty() {
                return Err(AppError::validation_field("location_city", "City is required"));
            }
        }
        InstancePayload::Distanciel(details) => {
            if details.meeting_link.trim().is_empty() {
                return Err(AppError::validation_field("meeting_link", "Meeting link is required"));
            }
            if !is_http_url(&details.meeting_link) {
                return Err(AppError::validation_field("meeting_link", "Meeting link must be a valid http(s) URL"));
            }
        }
        InstancePayload::ELearning(details) => {
            if details.elearning_link.trim().is_empty() {
                return Err(AppError::validation_field("elearning_link", "Access link is required"));
            }
            if !is_http_url(&details.elearning_link) {
                return Err(AppError::validation_field("elearning_link", "Access link must be a valid http(s) URL"));
            }
            if let (Some(start), Some(end)) = (details.access_start, details.access_end) {
                if end <= start {
                    return Err(AppError::validation_field("access_end", "Access window must end after it starts"));
                }
            }
        }
    }

    Ok(payload)
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}
