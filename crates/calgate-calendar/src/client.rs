//! Google Calendar API client.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tracing::instrument;

use crate::error::CalendarError;
use crate::transport::Transport;
use crate::types::*;
use crate::window::DayWindow;

pub use calgate_core::config::DEFAULT_API_BASE_URL as CALENDAR_API_BASE;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CALENDAR_LIST_PAGE_SIZE: u32 = 250;

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(access_token, CALENDAR_API_BASE)
    }

    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        )
    }

    async fn get_events(&self, url: &str) -> Result<Option<Vec<RemoteEvent>>, CalendarError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let resp: EventListResponse = self.handle_response(response).await?;
        Ok(resp.items)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::NotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

impl Transport for CalendarClient {
    #[instrument(skip(self), level = "info")]
    async fn list_calendars(&self) -> Result<Vec<CalendarDescriptor>, CalendarError> {
        let url = format!(
            "{}/users/me/calendarList?maxResults={}",
            self.base_url, CALENDAR_LIST_PAGE_SIZE
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let resp: CalendarListResponse = self.handle_response(response).await?;
        if resp.next_page_token.is_some() {
            tracing::warn!(
                "Calendar list has more than {} entries; only the first page is used",
                CALENDAR_LIST_PAGE_SIZE
            );
        }
        Ok(resp.items.into_iter().map(CalendarDescriptor::from).collect())
    }

    #[instrument(skip(self), level = "info")]
    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        max_results: u32,
    ) -> Result<Option<Vec<RemoteEvent>>, CalendarError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let url = format!(
            "{}?timeMin={}&maxResults={}&singleEvents=true&orderBy=startTime",
            self.events_url(calendar_id),
            urlencoding::encode(&now),
            max_results,
        );

        self.get_events(&url).await
    }

    #[instrument(skip(self), level = "info")]
    async fn list_events_in_window(
        &self,
        calendar_id: &str,
        window: &DayWindow,
        single_events: bool,
    ) -> Result<Option<Vec<RemoteEvent>>, CalendarError> {
        let mut url = format!(
            "{}?timeMin={}&timeMax={}&singleEvents={}",
            self.events_url(calendar_id),
            urlencoding::encode(&window.time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
            urlencoding::encode(&window.time_max.to_rfc3339_opts(SecondsFormat::Secs, true)),
            single_events,
        );

        // orderBy=startTime is only accepted with expanded recurrences
        if single_events {
            url.push_str("&orderBy=startTime");
        }

        self.get_events(&url).await
    }

    #[instrument(skip(self, event), fields(summary = %event.summary), level = "info")]
    async fn create_event(
        &self,
        calendar_id: &str,
        event: NewEvent,
    ) -> Result<RemoteEvent, CalendarError> {
        let response = self
            .client
            .post(self.events_url(calendar_id))
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .json(&event)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
