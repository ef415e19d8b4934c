//! Database operations for the `events` table and its tag and image children.

mod read;
mod types;

pub use read::{count_events_by_status, get_active_event, list_active_events};
pub use types::{EventRow, EventStatus};
