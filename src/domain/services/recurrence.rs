use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

/// Upper bound on the recurrence window. The batch insert downstream is not
/// streamed, so an open-ended window has to be rejected up front.
const MAX_WINDOW_DAYS: i64 = 730;
const MAX_GENERATED_INSTANCES: usize = 1000;

/// Named time-of-day slots. Declaration order is the canonical generation
/// order: morning, afternoon, evening, full_day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    FullDay,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::FullDay => "full_day",
        }
    }

    pub fn default_range(&self) -> (NaiveTime, NaiveTime) {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        match self {
            TimeSlot::Morning => (hm(9, 0), hm(12, 0)),
            TimeSlot::Afternoon => (hm(14, 0), hm(17, 0)),
            TimeSlot::Evening => (hm(18, 0), hm(21, 0)),
            TimeSlot::FullDay => (hm(9, 0), hm(17, 0)),
        }
    }
}

/// A slot selection; either the slot's fixed range applies, or a custom
/// "HH:MM" range replaces it (both bounds, end after start).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotChoice {
    pub slot: TimeSlot,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub has_recurrence: bool,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub recurrence_start_date: Option<NaiveDate>,
    pub recurrence_end_date: Option<NaiveDate>,
    /// Weekday integers 0-6, Sunday = 0.
    #[serde(default)]
    pub selected_days: Vec<u8>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlotChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSlot {
    pub date: NaiveDate,
    pub slot: Option<TimeSlot>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation_field(field, format!("Invalid time '{}', expected HH:MM", value)))
}

fn resolve_range(choice: &TimeSlotChoice) -> Result<(NaiveTime, NaiveTime), AppError> {
    match (&choice.start_time, &choice.end_time) {
        (None, None) => Ok(choice.slot.default_range()),
        (Some(start), Some(end)) => {
            let start = parse_time("start_time", start)?;
            let end = parse_time("end_time", end)?;
            if end <= start {
                return Err(AppError::validation_field("end_time", "End time must be after start time"));
            }
            Ok((start, end))
        }
        _ => Err(AppError::validation_field(
            "time_slots",
            "Custom slot range requires both start_time and end_time",
        )),
    }
}

/// Expands a recurrence specification into the ordered list of concrete
/// (date, slot) occurrences. One-shot and deterministic: identical input
/// yields identical output, with no wall-clock dependency.
///
/// Dates run from `recurrence_start_date` to `recurrence_end_date`
/// inclusive; on each matching weekday every selected slot is emitted in
/// canonical slot order regardless of the order the request listed them.
/// Zero matching weekdays is a valid empty result.
pub fn expand(spec: &RecurrenceSpec) -> Result<Vec<GeneratedSlot>, AppError> {
    if !spec.has_recurrence {
        let date = spec
            .start_date
            .ok_or_else(|| AppError::validation_field("start_date", "Required when has_recurrence is false"))?;

        let (start_time, end_time) = match (&spec.start_time, &spec.end_time) {
            (None, None) => TimeSlot::FullDay.default_range(),
            (Some(start), Some(end)) => {
                let start = parse_time("start_time", start)?;
                let end = parse_time("end_time", end)?;
                if end <= start {
                    return Err(AppError::validation_field("end_time", "End time must be after start time"));
                }
                (start, end)
            }
            _ => {
                return Err(AppError::validation_field(
                    "start_time",
                    "Custom time range requires both start_time and end_time",
                ))
            }
        };

        return Ok(vec![GeneratedSlot { date, slot: None, start_time, end_time }]);
    }

    let window_start = spec
        .recurrence_start_date
        .ok_or_else(|| AppError::validation_field("recurrence_start_date", "Required when has_recurrence is true"))?;
    let window_end = spec
        .recurrence_end_date
        .ok_or_else(|| AppError::validation_field("recurrence_end_date", "Required when has_recurrence is true"))?;

    if window_end < window_start {
        return Err(AppError::validation_field(
            "recurrence_end_date",
            "Recurrence end date must not be before the start date",
        ));
    }
    if (window_end - window_start).num_days() > MAX_WINDOW_DAYS {
        return Err(AppError::validation_field(
            "recurrence_end_date",
            "Recurrence window exceeds the 2 year maximum",
        ));
    }
    if spec.selected_days.is_empty() {
        return Err(AppError::validation_field("selected_days", "At least one weekday is required"));
    }
    if spec.time_slots.is_empty() {
        return Err(AppError::validation_field("time_slots", "At least one time slot is required"));
    }

    let mut weekdays = [false; 7];
    for day in &spec.selected_days {
        if *day > 6 {
            return Err(AppError::validation_field(
                "selected_days",
                format!("Invalid weekday {}, expected 0-6 (Sunday = 0)", day),
            ));
        }
        weekdays[*day as usize] = true;
    }

    // BTreeMap keyed by slot gives canonical ordering and collapses
    // duplicate selections; the first custom range for a slot wins.
    let mut slots: BTreeMap<TimeSlot, (NaiveTime, NaiveTime)> = BTreeMap::new();
    for choice in &spec.time_slots {
        let range = resolve_range(choice)?;
        slots.entry(choice.slot).or_insert(range);
    }

    let mut matching_dates = Vec::new();
    let mut date = window_start;
    while date <= window_end {
        if weekdays[date.weekday().num_days_from_sunday() as usize] {
            matching_dates.push(date);
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    if matching_dates.len() * slots.len() > MAX_GENERATED_INSTANCES {
        return Err(AppError::validation_field(
            "recurrence_end_date",
            format!(
                "Specification would generate {} instances, maximum is {}",
                matching_dates.len() * slots.len(),
                MAX_GENERATED_INSTANCES
            ),
        ));
    }

    let mut generated = Vec::with_capacity(matching_dates.len() * slots.len());
    for date in matching_dates {
        for (slot, (start_time, end_time)) in &slots {
            generated.push(GeneratedSlot {
                date,
                slot: Some(*slot),
                start_time: *start_time,
                end_time: *end_time,
            });
        }
    }

    Ok(generated)
}
