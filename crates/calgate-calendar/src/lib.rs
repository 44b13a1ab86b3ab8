//! Google Calendar gateway for calgate.
//!
//! Resolves configured calendar names to ids, queries all-day and upcoming
//! events, and posts new events.

pub mod client;
pub mod error;
pub mod gateway;
pub mod resolve;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;
pub mod window;

pub use client::CalendarClient;
pub use error::CalendarError;
pub use gateway::CalendarGateway;
pub use resolve::{resolve_calendar_ids, PRIMARY};
pub use session::{build_client, connect};
pub use store::{ConfigStore, TomlConfigStore};
pub use transport::Transport;
pub use types::{
    AccessRole, CalendarDescriptor, DateBoundary, EventBoundary, EventWindow, NewEvent,
    Reminders, RemoteEvent,
};
pub use window::DayWindow;
