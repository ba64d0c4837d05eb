use serde_json::{json, Value};

use crate::domain::models::course::Course;
use crate::domain::models::session::TrainingSession;
use crate::error::AppError;

/// The session fields that can shadow their course-template value. Order
/// here is the order `reset_all` reports and the order the effective view
/// lists fields in.
pub const OVERRIDABLE_FIELDS: [&str; 5] =
    ["title", "description", "location", "trainer_name", "max_participants"];

/// Resolves per-field inheritance for one session against its course
/// template. A NULL session column means "inherited": the template value is
/// read live, so later template edits keep propagating until the field is
/// overridden. `reset` clears the session value instead of copying the
/// template one.
pub struct OverrideSet<'a> {
    course: &'a Course,
    session: &'a mut TrainingSession,
}

impl<'a> OverrideSet<'a> {
    pub fn new(course: &'a Course, session: &'a mut TrainingSession) -> Self {
        Self { course, session }
    }

    fn ensure_registered(field: &str) -> Result<(), AppError> {
        if OVERRIDABLE_FIELDS.contains(&field) {
            Ok(())
        } else {
            Err(AppError::UnknownField(field.to_string()))
        }
    }

    /// Effective value: the local session value when overridden, otherwise
    /// the live template value.
    pub fn get(&self, field: &str) -> Result<Value, AppError> {
        Self::ensure_registered(field)?;
        Ok(match field {
            "title" => json!(self.session.title.as_ref().unwrap_or(&self.course.title)),
            "description" => json!(self.session.description.as_ref().unwrap_or(&self.course.description)),
            "location" => json!(self.session.location.as_ref().unwrap_or(&self.course.location)),
            "trainer_name" => json!(self.session.trainer_name.as_ref().unwrap_or(&self.course.trainer_name)),
            "max_participants" => json!(self.session.max_participants.unwrap_or(self.course.max_participants)),
            _ => unreachable!(),
        })
    }

    pub fn is_overridden(&self, field: &str) -> Result<bool, AppError> {
        Self::ensure_registered(field)?;
        Ok(match field {
            "title" => self.session.title.is_some(),
            "description" => self.session.description.is_some(),
            "location" => self.session.location.is_some(),
            "trainer_name" => self.session.trainer_name.is_some(),
            "max_participants" => self.session.max_participants.is_some(),
            _ => unreachable!(),
        })
    }

    /// Writes a local value. The field counts as overridden from now on even
    /// when the value equals the template's current one; equality is not
    /// checked.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), AppError> {
        Self::ensure_registered(field)?;

        if value.is_null() {
            return Err(AppError::validation_field(
                field,
                "Value must not be null; reset the override to inherit again",
            ));
        }

        if field == "max_participants" {
            let capacity = value
                .as_i64()
                .filter(|v| *v >= 0 && *v <= i32::MAX as i64)
                .ok_or_else(|| {
                    AppError::validation_field(field, "Expected a non-negative integer")
                })?;
            self.session.max_participants = Some(capacity as i32);
            return Ok(());
        }

        let text = value
            .as_str()
            .ok_or_else(|| AppError::validation_field(field, "Expected a string value"))?
            .to_string();

        match field {
            "title" => self.session.title = Some(text),
            "description" => self.session.description = Some(text),
            "location" => self.session.location = Some(text),
            "trainer_name" => self.session.trainer_name = Some(text),
            _ => unreachable!(),
        }
        Ok(())
    }

    /// Clears the local value so the field inherits from the template again.
    pub fn reset_one(&mut self, field: &str) -> Result<(), AppError> {
        Self::ensure_registered(field)?;
        match field {
            "title" => self.session.title = None,
            "description" => self.session.description = None,
            "location" => self.session.location = None,
            "trainer_name" => self.session.trainer_name = None,
            "max_participants" => self.session.max_participants = None,
            _ => unreachable!(),
        }
        Ok(())
    }

    /// Resets every registered field and returns the names of those that
    /// were actually overridden, as one batch. Callers emit a single
    /// combined event for the whole reset, never one per field.
    pub fn reset_all(&mut self) -> Vec<String> {
        let mut reset = Vec::new();
        for field in OVERRIDABLE_FIELDS {
            if self.is_overridden(field).unwrap_or(false) {
                reset.push(field.to_string());
            }
            // Registered fields never fail here.
            let _ = self.reset_one(field);
        }
        reset
    }

    /// Per-field `{value, overridden}` map for the HTTP representation.
    pub fn view(&self) -> Value {
        let mut fields = serde_json::Map::new();
        for field in OVERRIDABLE_FIELDS {
            fields.insert(
                field.to_string(),
                json!({
                    "value": self.get(field).unwrap_or(Value::Null),
                    "overridden": self.is_overridden(field).unwrap_or(false),
                }),
            );
        }
        Value::Object(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course() -> Course {
        Course {
            id: "c1".into(),
            tenant_id: "t1".into(),
            slug: "rust-initiation".into(),
            title: "Rust Initiation".into(),
            description: "Three days of fundamentals".into(),
            location: "Paris".into(),
            trainer_name: "Ada".into(),
            timezone: "Europe/Paris".into(),
            duration_min: 180,
            max_participants: 12,
            default_instance_type: "presentiel".into(),
            contact_email: "training@example.com".into(),
            created_at: Utc::now(),
        }
    }

    fn session() -> TrainingSession {
        TrainingSession::new("t1".into(), "c1".into(), "March cohort".into())
    }

    #[test]
    fn fresh_session_inherits_everything() {
        let course = course();
        let mut session = session();
        let overrides = OverrideSet::new(&course, &mut session);

        assert_eq!(overrides.get("title").unwrap(), "Rust Initiation");
        assert_eq!(overrides.get("max_participants").unwrap(), 12);
        assert!(!overrides.is_overridden("title").unwrap());
    }

    #[test]
    fn set_then_get_round_trips() {
        let course = course();
        let mut session = session();
        let mut overrides = OverrideSet::new(&course, &mut session);

        overrides.set("location", json!("Lyon")).unwrap();
        assert_eq!(overrides.get("location").unwrap(), "Lyon");
        assert!(overrides.is_overridden("location").unwrap());
    }

    #[test]
    fn setting_the_template_value_still_marks_overridden() {
        let course = course();
        let mut session = session();
        let mut overrides = OverrideSet::new(&course, &mut session);

        overrides.set("title", json!("Rust Initiation")).unwrap();
        assert!(overrides.is_overridden("title").unwrap());
    }

    #[test]
    fn reset_reverts_to_live_template_value() {
        let mut course = course();
        let mut session = session();
        {
            let mut overrides = OverrideSet::new(&course, &mut session);
            overrides.set("title", json!("Custom title")).unwrap();
            overrides.reset_one("title").unwrap();
        }

        // A template edit after the reset must propagate.
        course.title = "Rust Initiation v2".into();
        let overrides = OverrideSet::new(&course, &mut session);
        assert_eq!(overrides.get("title").unwrap(), "Rust Initiation v2");
        assert!(!overrides.is_overridden("title").unwrap());
    }

    #[test]
    fn reset_all_reports_only_previously_overridden_fields() {
        let course = course();
        let mut session = session();
        let mut overrides = OverrideSet::new(&course, &mut session);

        overrides.set("title", json!("X")).unwrap();
        overrides.set("max_participants", json!(30)).unwrap();

        let reset = overrides.reset_all();
        assert_eq!(reset, vec!["title".to_string(), "max_participants".to_string()]);
        assert!(!overrides.is_overridden("title").unwrap());
        assert!(overrides.reset_all().is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let course = course();
        let mut session = session();
        let mut overrides = OverrideSet::new(&course, &mut session);

        assert!(matches!(overrides.get("price"), Err(AppError::UnknownField(_))));
        assert!(matches!(overrides.set("price", json!(10)), Err(AppError::UnknownField(_))));
        assert!(matches!(overrides.reset_one("price"), Err(AppError::UnknownField(_))));
    }

    #[test]
    fn max_participants_requires_a_non_negative_integer() {
        let course = course();
        let mut session = session();
        let mut overrides = OverrideSet::new(&course, &mut session);

        assert!(overrides.set("max_participants", json!("twelve")).is_err());
        assert!(overrides.set("max_participants", json!(-3)).is_err());
        assert!(overrides.set("max_participants", json!(0)).is_ok());
    }
}
