//! Error handling for token formatters
//!
//! Rendering itself never fails: unknown placeholders resolve to empty text,
//! missing link relations degrade a batch to plain text, and collaborator
//! failures are caught at the boundary and logged. The errors in this module
//! cover the outer surface instead: loading persisted formatter settings,
//! validating patterns, and pairing a formatter with a field it cannot display.
//!
//! # Architecture
//!
//! - [`FormatterError`] - Enumerated failure cases
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//! - [`user_friendly_error`] - Turns an [`anyhow::Error`] from the outer surface
//!   into an [`ErrorContext`]
//!
//! Nothing inside the crate displays errors. A host that loads a display
//! configuration or renders with [`Presenter::render_configured`] gets an
//! [`anyhow::Error`] back; passing it through [`user_friendly_error`] gives
//! the message to show an administrator, with a suggestion for the variants
//! that have one.
//!
//! [`Presenter::render_configured`]: crate::presenter::Presenter::render_configured
//!
//! # Examples
//!
//! ```rust,no_run
//! use token_formatters::core::{FormatterError, ErrorContext};
//!
//! let error = FormatterError::UnknownFormatter {
//!     name: "tokenized_label".to_string(),
//! };
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Use one of: reference, string, text, text_summary");
//!
//! eprintln!("{context}");
//! ```

use std::fmt;
use thiserror::Error;

/// The main error type for formatter configuration and dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatterError {
    /// A formatter was asked to display a field type it does not support
    ///
    /// # Fields
    /// - `formatter`: The formatter kind (e.g. "reference")
    /// - `field_type`: The field type that was rejected (e.g. "string_long")
    #[error("Formatter '{formatter}' cannot display fields of type '{field_type}'")]
    IncompatibleField {
        /// The formatter kind
        formatter: String,
        /// The field type machine name
        field_type: String,
    },

    /// A pattern failed validation
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why the pattern was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// No formatter is registered under the given name
    #[error("Unknown formatter: {name}")]
    UnknownFormatter {
        /// Name that was looked up
        name: String,
    },

    /// No settings exist for the requested field
    #[error("No formatter configured for field '{field}'")]
    FieldNotConfigured {
        /// Field machine name
        field: String,
    },

    /// A collaborator (token, relation or filter service) failed
    ///
    /// Only surfaced by explicit probing APIs; the render path converts
    /// these into degraded output instead.
    #[error("{service} failed: {reason}")]
    CollaboratorFailed {
        /// Which service failed
        service: String,
        /// Reason reported by the service
        reason: String,
    },
}

/// Error wrapper carrying a suggestion and extra details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: FormatterError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: FormatterError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Recognises [`FormatterError`] variants and TOML parse errors; anything
/// else is wrapped as a configuration error carrying the full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(formatter_error) = error.downcast_ref::<FormatterError>() {
        return create_error_context(formatter_error.clone());
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(FormatterError::ConfigError {
            message: toml_error.message().to_string(),
        })
        .with_suggestion("Check the TOML syntax of the display configuration")
        .with_details(format!("{error:#}"));
    }

    ErrorContext::new(FormatterError::ConfigError {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: FormatterError) -> ErrorContext {
    match &error {
        FormatterError::IncompatibleField {
            formatter,
            ..
        } => {
            let suggestion = match formatter.as_str() {
                "reference" => "Use the reference formatter on entity_reference fields only",
                "string" => "Use the string formatter on string or string_long fields",
                _ => "Use text formatters on text, text_long or text_with_summary fields",
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        FormatterError::InvalidPattern {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Patterns use placeholders of the form [context:property]"),
        FormatterError::UnknownFormatter {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use one of: reference, string, text, text_summary"),
        FormatterError::FieldNotConfigured {
            field,
        } => {
            let suggestion = format!("Add a [fields.{field}] table to the display configuration");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        _ => ErrorContext::new(error),
    }
}
