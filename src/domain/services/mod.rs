pub mod calendar;
pub mod instance_type;
pub mod overrides;
pub mod recurrence;
