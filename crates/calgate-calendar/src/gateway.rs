//! Calendar operations on behalf of one user.

use chrono::{Local, NaiveDate};
use tracing::instrument;

use calgate_core::config::DEFAULT_TIME_ZONE;

use crate::error::CalendarError;
use crate::resolve::{resolve_calendar_ids, PRIMARY};
use crate::store::ConfigStore;
use crate::transport::Transport;
use crate::types::{EventWindow, NewEvent, RemoteEvent};
use crate::window::{parse_date, parse_date_time, DayWindow};

/// Queries and posts events through a [`Transport`], selecting calendars
/// from a [`ConfigStore`].
///
/// Every operation is self-contained; nothing is cached between calls.
pub struct CalendarGateway<T, C> {
    transport: T,
    config: C,
    time_zone: String,
}

impl<T: Transport, C: ConfigStore> CalendarGateway<T, C> {
    pub fn new(transport: T, config: C) -> Self {
        Self {
            transport,
            config,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }

    /// Time zone attached to timed events created by [`Self::post_event`]
    pub fn with_time_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = time_zone.to_string();
        self
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Up to `n` upcoming events of the primary calendar, or `None` if there
    /// are none.
    ///
    /// # Errors
    ///
    /// Transport failures, unchanged.
    #[instrument(skip(self), level = "info")]
    pub async fn get_upcoming_events(
        &self,
        n: u32,
    ) -> Result<Option<Vec<RemoteEvent>>, CalendarError> {
        tracing::info!("Getting the upcoming {} events", n);
        let events = self.transport.list_upcoming_events(PRIMARY, n).await?;

        match events {
            Some(events) if !events.is_empty() => Ok(Some(events)),
            _ => {
                tracing::info!("No upcoming events found");
                Ok(None)
            }
        }
    }

    /// All-day events on `date_iso` (`YYYY-MM-DD`) across the configured calendars.
    ///
    /// # Errors
    ///
    /// `InvalidDateFormat` before anything is fetched; otherwise config store
    /// and transport failures, unchanged.
    #[instrument(skip(self), level = "info")]
    pub async fn get_all_day_events(
        &self,
        date_iso: &str,
    ) -> Result<Vec<RemoteEvent>, CalendarError> {
        let day = parse_date(date_iso)?;
        self.all_day_events_on(day).await
    }

    /// All-day events for the current local date.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_all_day_events`].
    pub async fn get_todays_all_day_events(&self) -> Result<Vec<RemoteEvent>, CalendarError> {
        self.all_day_events_on(Local::now().date_naive()).await
    }

    async fn all_day_events_on(&self, day: NaiveDate) -> Result<Vec<RemoteEvent>, CalendarError> {
        let window = DayWindow::for_date(day);
        let target_names = self.config.load_calendar_names()?;

        let all_calendars = self.transport.list_calendars().await?;
        let calendar_ids = resolve_calendar_ids(&all_calendars, &target_names);
        tracing::debug!(
            "Resolved {} of {} configured calendars",
            calendar_ids.len(),
            target_names.len()
        );

        let mut events = Vec::new();
        for calendar_id in &calendar_ids {
            if let Some(found) = self
                .transport
                .list_events_in_window(calendar_id, &window, true)
                .await?
            {
                events.extend(found);
            }
        }

        let all_day: Vec<RemoteEvent> = events.into_iter().filter(RemoteEvent::is_all_day).collect();
        tracing::info!("Found {} all-day events on {}", all_day.len(), day);
        Ok(all_day)
    }

    /// Create an event in the primary calendar.
    ///
    /// Without `time_str` the event covers the whole of `date_iso`; with it
    /// (`HH:MM:SS`) the event lasts one hour in the gateway's time zone.
    /// `color_id` and `description` are sent only when given.
    ///
    /// # Errors
    ///
    /// `InvalidDateFormat` / `InvalidDateTimeFormat` before anything is sent;
    /// otherwise the transport's result, unchanged.
    #[instrument(skip(self, description), level = "info")]
    pub async fn post_event(
        &self,
        name: &str,
        date_iso: &str,
        time_str: Option<&str>,
        color_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<RemoteEvent, CalendarError> {
        let window = match time_str {
            Some(time_str) => {
                EventWindow::timed(parse_date_time(date_iso, time_str)?, &self.time_zone)
            }
            None => EventWindow::all_day(parse_date(date_iso)?),
        };

        tracing::debug!("start: {:?}", window.start);
        tracing::debug!("end: {:?}", window.end);

        let event = NewEvent::new(name, window)
            .with_description(description)
            .with_color_id(color_id);

        tracing::info!("Posting event with name {} to calendar", name);
        let created = self.transport.create_event(PRIMARY, event).await?;
        tracing::info!("Done");
        Ok(created)
    }
}
