//! Calendar-specific error types.

use calgate_core::{AuthError, ConfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid date format (expected YYYY-MM-DD): {0}")]
    InvalidDateFormat(String),

    #[error("Invalid date/time format (expected YYYY-MM-DD HH:MM:SS): {0}")]
    InvalidDateTimeFormat(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(AuthError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<AuthError> for CalendarError {
    fn from(err: AuthError) -> Self {
        if err.requires_sign_in() {
            Self::AuthRequired
        } else {
            Self::Auth(err)
        }
    }
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDateFormat(input) => {
                format!("'{}' is not a valid date. Use YYYY-MM-DD.", input)
            }
            Self::InvalidDateTimeFormat(input) => {
                format!("'{}' is not a valid date and time. Use YYYY-MM-DD HH:MM:SS.", input)
            }
            Self::AuthRequired => "Please sign in to your Google account".to_string(),
            Self::TokenExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::NotFound(_) => "Calendar or event not found".to_string(),
            Self::ApiError(msg) => format!("Calendar error: {}", msg),
            Self::Config(e) => e.user_message().to_string(),
            Self::Auth(e) => e.user_message().to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the failure happened locally, before anything was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateFormat(_) | Self::InvalidDateTimeFormat(_)
        )
    }
}
