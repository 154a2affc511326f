//! E2E scenario runner for the catalog service
//!
//! Scenarios are sequences of dependent HTTP calls; each step's input comes
//! from a previous step's response. Assertions inspect the structured JSON
//! rather than matching response text.

pub mod checks;
pub mod context;
pub mod fixtures;
pub mod runner;
pub mod scenarios;

pub use checks::Checks;
pub use context::{ScenarioContext, Teardown};
pub use fixtures::{FixtureData, FixtureFactory};
pub use runner::{Suite, SuiteReport, TestResult};
pub use scenarios::Scenario;
