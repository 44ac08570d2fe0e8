//! HTTP request handlers organized by resource

pub mod admin;
pub mod catalog;
pub mod health;
pub mod manifest;
pub mod meta;
pub mod streams;

/// Catalog id served by this addon
pub const CATALOG_ID: &str = "live_tv";
/// Content type of every item
pub const CONTENT_TYPE: &str = "tv";
