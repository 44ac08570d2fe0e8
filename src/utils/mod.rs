//! Utility functions and helpers

pub mod names;
pub mod time;

pub use names::{clean_name_for_image, normalize_id, placeholder_image};
pub use time::format_clock;
