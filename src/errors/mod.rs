//! Centralized error handling for the live catalog service
//!
//! Errors are split by layer:
//!
//! - **Application Errors**: file and parse failures while loading data, and
//!   collaborator failures surfaced by the admin endpoint
//! - **Stream Errors**: failures of external collaborators (resolver, proxy,
//!   playlist regeneration, channel cache)
//!
//! The catalog and stream read paths never return these to a client. They
//! are logged and demoted to fallback results at the branch that produced them.
//!
//! # Usage
//!
//! ```rust
//! use live_catalog::errors::{AppError, AppResult, StreamError};
//!
//! fn regenerate() -> AppResult<usize> {
//!     Err(StreamError::regeneration_failed("generator exited with status 1").into())
//! }
//!
//! assert!(matches!(regenerate(), Err(AppError::Stream(_))));
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for collaborator Results
pub type StreamResult<T> = Result<T, StreamError>;
