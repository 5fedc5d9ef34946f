//! Test utilities for token formatters
//!
//! Shared helpers for unit and integration tests: logging setup and
//! in-memory collaborators whose behaviour tests can script.
//!
//! # Example
//!
//! ```rust,no_run
//! use token_formatters::link::LinkRelation;
//! use token_formatters::test_utils::{StaticRelations, init_test_logging};
//!
//! init_test_logging(None);
//! let relations = StaticRelations::new()
//!     .with_relation("node", LinkRelation::Canonical)
//!     .with_failure("node", "13");
//! ```

pub mod fixtures;

pub use fixtures::{DISPLAY_CONFIG, FailingResolver, StaticRelations, UppercaseFilter};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once regardless of how many times it's
/// called. Uses `level` when given, otherwise `RUST_LOG` if set, otherwise
/// leaves logging off.
///
/// ```bash
/// RUST_LOG=token_formatters=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
