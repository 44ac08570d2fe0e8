//! Time formatting for program guide text

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Render a UTC instant as a local `HH:MM` wall-clock time
pub fn format_clock(at: DateTime<Utc>, timezone: Tz) -> String {
    at.with_timezone(&timezone).format("%H:%M").to_string()
}
