//! Shared test utilities for schooldir integration tests.
//!
//! This module provides:
//! - `TestHarness` with an in-memory database, a temp image directory and the router
//! - Builders for forms and multipart request bodies

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
