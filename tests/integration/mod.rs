//! Integration test suite for token formatters
//!
//! End-to-end tests that drive the presenter through its public API with
//! scripted collaborators from `test_utils`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **display_config**: Loading configuration and rendering with persisted settings
//! - **link_latch**: Batch link latch, relation preference and unsaved records
//! - **ordering**: One fragment per item in delta order
//! - **reference_binding**: Binding contexts for reference fields and token types
//! - **summaries**: Summary selection, markup-safe trimming and filter fallbacks

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod display_config;
mod link_latch;
mod ordering;
mod summaries;
