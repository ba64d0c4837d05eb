use crate::domain::models::instance::SessionInstance;
use icalendar::{Calendar, CalendarDateTime, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a single session instance.
/// Times are floating local times, matching how instances are stored.
pub fn generate_ics(title: &str, location: &str, instance: &SessionInstance) -> String {
    let starts = instance.start_date.and_time(instance.start_time);
    let ends = instance.start_date.and_time(instance.end_time);

    let summary = if instance.is_cancelled {
        format!("CANCELLED: {}", title)
    } else {
        title.to_string()
    };

    let mut calendar = Calendar::new();
    let ical_event = IcalEvent::new()
        .summary(&summary)
        .location(location)
        .starts(CalendarDateTime::from(starts))
        .ends(CalendarDateTime::from(ends))
        .uid(&instance.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
