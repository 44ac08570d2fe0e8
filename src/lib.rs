pub mod cache;
pub mod config;
pub mod epg;
pub mod errors;
pub mod models;
pub mod proxy;
pub mod resolver;
pub mod services;
pub mod utils;
pub mod web;
