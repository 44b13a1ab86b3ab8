//! Remote calls the gateway relies on.

use crate::error::CalendarError;
use crate::types::{CalendarDescriptor, NewEvent, RemoteEvent};
use crate::window::DayWindow;

/// Authenticated access to the calendar service.
///
/// Errors are whatever the implementation produces; the gateway hands them
/// to its caller unchanged. `None` means the service answered without an
/// event list.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Every calendar in the user's calendar list
    async fn list_calendars(&self) -> Result<Vec<CalendarDescriptor>, CalendarError>;

    /// The next `max_results` events of `calendar_id`, starting now
    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        max_results: u32,
    ) -> Result<Option<Vec<RemoteEvent>>, CalendarError>;

    /// Events of `calendar_id` overlapping `window`
    async fn list_events_in_window(
        &self,
        calendar_id: &str,
        window: &DayWindow,
        single_events: bool,
    ) -> Result<Option<Vec<RemoteEvent>>, CalendarError>;

    /// Insert `event` into `calendar_id`
    async fn create_event(
        &self,
        calendar_id: &str,
        event: NewEvent,
    ) -> Result<RemoteEvent, CalendarError>;
}
