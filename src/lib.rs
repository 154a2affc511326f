//! Catalog E2E - API test suite for a book catalog service
//!
//! This library drives create/read/update/delete scenarios for books and
//! categories over HTTP and checks status codes and JSON shapes.

pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Config, Error, Result};
pub use testing::{FixtureData, FixtureFactory, Suite};
