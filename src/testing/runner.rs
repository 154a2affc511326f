//! Test runner implementation
//!
//! Runs scenarios one at a time: authenticate, execute the steps in order,
//! then tear down whatever the scenario provisioned, pass or fail.

use colored::Colorize;

use crate::api::{authenticate, AuthProvider, CatalogClient};
use crate::common::Error;

use super::context::ScenarioContext;
use super::fixtures::FixtureFactory;
use super::scenarios::Scenario;

/// Result of a test run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    /// Label of the step that failed
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub teardown_failures: usize,
}

/// Results of a whole suite run
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub results: Vec<TestResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Print the pass/fail table
    pub fn print_summary(&self) {
        println!("\n{}", "Summary:".cyan().bold());
        for result in &self.results {
            if result.passed {
                println!(
                    "  {} {} ({}/{} steps)",
                    "✓".green(),
                    result.name,
                    result.steps_run,
                    result.steps_total
                );
            } else {
                println!(
                    "  {} {} (failed at step {}/{}{})",
                    "✗".red(),
                    result.name.red(),
                    result.steps_run + 1,
                    result.steps_total,
                    result
                        .failed_step
                        .as_deref()
                        .map(|s| format!(": {}", s))
                        .unwrap_or_default()
                );
                if let Some(error) = &result.error {
                    println!("      {}", error.dimmed());
                }
            }
            if result.teardown_failures > 0 {
                println!(
                    "      {} {} cleanup action(s) failed",
                    "!".yellow(),
                    result.teardown_failures
                );
            }
        }

        let line = format!("{} passed, {} failed", self.passed(), self.failed());
        if self.all_passed() {
            println!("\n{}\n", line.green().bold());
        } else {
            println!("\n{}\n", line.red().bold());
        }
    }
}

/// Everything a scenario run needs
pub struct Suite {
    client: CatalogClient,
    auth: Box<dyn AuthProvider>,
    fixtures: FixtureFactory,
    verbose: bool,
}

impl Suite {
    pub fn new(client: CatalogClient, auth: Box<dyn AuthProvider>, fixtures: FixtureFactory) -> Self {
        Self {
            client,
            auth,
            fixtures,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run scenarios sequentially, in the given order
    pub async fn run(&self, scenarios: &[Box<dyn Scenario>]) -> SuiteReport {
        if let Some(tag) = self.fixtures.run_tag() {
            tracing::info!(run_tag = tag, base_url = self.client.base_url(), "Starting suite");
        }

        let mut report = SuiteReport::default();
        for scenario in scenarios {
            report.results.push(self.run_scenario(scenario.as_ref()).await);
        }
        report
    }

    /// Run a single scenario
    pub async fn run_scenario(&self, scenario: &dyn Scenario) -> TestResult {
        let steps_total = scenario.steps().len();

        println!(
            "\n{} {}",
            "Running Test:".blue().bold(),
            scenario.name().white().bold()
        );
        println!("  {}", scenario.description().dimmed());

        let client = match authenticate(self.client.clone(), self.auth.as_ref()).await {
            Ok(client) => client,
            Err(e) => {
                println!("  {} {}", "✗".red(), e);
                return TestResult {
                    name: scenario.name().to_string(),
                    passed: false,
                    steps_run: 0,
                    steps_total,
                    failed_step: Some("authenticate".to_string()),
                    error: Some(e.to_string()),
                    teardown_failures: 0,
                };
            }
        };
        println!("  {} Authenticated ({})", "✓".green(), self.auth.describe().dimmed());

        println!("\n{}", "Steps:".cyan());
        let mut ctx = ScenarioContext::new(client, self.fixtures.clone(), self.verbose);
        let outcome = scenario.run(&mut ctx).await;
        let teardown_failures = ctx.teardown().await;
        let steps_run = ctx.steps_run();

        let result = match outcome {
            Ok(()) => {
                println!("\n{} {}", "✓".green().bold(), "Test Passed".green().bold());
                TestResult {
                    name: scenario.name().to_string(),
                    passed: true,
                    steps_run,
                    steps_total,
                    failed_step: None,
                    error: None,
                    teardown_failures,
                }
            }
            Err(e) => {
                let failed_step = scenario.steps().get(steps_run).map(|s| s.to_string());
                print_failure(steps_run + 1, failed_step.as_deref(), &e);
                TestResult {
                    name: scenario.name().to_string(),
                    passed: false,
                    steps_run,
                    steps_total,
                    failed_step,
                    error: Some(e.to_string()),
                    teardown_failures,
                }
            }
        };

        tracing::info!(
            scenario = scenario.name(),
            passed = result.passed,
            steps_run = result.steps_run,
            steps_total,
            "Scenario finished"
        );
        result
    }
}

fn print_failure(step_num: usize, label: Option<&str>, error: &Error) {
    let label = label.unwrap_or("after last step");
    match error {
        Error::Assertion(messages) if messages.len() > 1 => {
            println!("  {} Step {}: {}", "✗".red(), step_num, label);
            for message in messages {
                println!("      - {}", message);
            }
        }
        _ => println!("  {} Step {}: {}: {}", "✗".red(), step_num, label, error),
    }
}
