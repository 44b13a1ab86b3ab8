//! Calendar name to calendar id resolution.

use std::collections::HashSet;

use crate::types::CalendarDescriptor;

/// Name that selects the calendar flagged as primary, whatever it is called
pub const PRIMARY: &str = "primary";

/// Map configured calendar names onto calendar ids.
///
/// Ids come out in `all_calendars` order. Each name matches at most one
/// calendar (the first with that display name); [`PRIMARY`] matches the first
/// calendar flagged primary and never a calendar merely named "primary".
/// Names with no match are dropped.
pub fn resolve_calendar_ids<S: AsRef<str>>(
    all_calendars: &[CalendarDescriptor],
    target_names: &[S],
) -> Vec<String> {
    let mut remaining: HashSet<&str> = target_names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| *name != PRIMARY)
        .collect();
    let mut need_primary = target_names.iter().any(|name| name.as_ref() == PRIMARY);

    let mut ids = Vec::new();
    for calendar in all_calendars {
        if remaining.remove(calendar.display_name.as_str()) {
            ids.push(calendar.id.clone());
        }
        if need_primary && calendar.is_primary {
            ids.push(calendar.id.clone());
            need_primary = false;
        }
    }

    if need_primary || !remaining.is_empty() {
        tracing::debug!(
            "Unmatched calendar names: {:?} (primary missing: {})",
            remaining,
            need_primary
        );
    }

    ids
}
