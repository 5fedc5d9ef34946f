//! Core error types shared across the crate.
//!
//! See [`error`] for how rendering failures degrade and which failures are
//! surfaced to callers.

pub mod error;

pub use error::{ErrorContext, FormatterError, user_friendly_error};
