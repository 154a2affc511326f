//! Per-scenario state: the authenticated client, test data, step progress,
//! and the teardown actions for every fixture the scenario provisioned.

use colored::Colorize;

use crate::api::CatalogClient;
use crate::common::Result;

use super::checks::ensure_ok;
use super::fixtures::FixtureFactory;

/// Cleanup for a provisioned fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teardown {
    DeleteCategory(String),
    DeleteBook(String),
}

impl Teardown {
    fn path(&self) -> String {
        match self {
            Teardown::DeleteCategory(id) => format!("category/{}", id),
            Teardown::DeleteBook(id) => format!("book/{}", id),
        }
    }
}

/// Execution state of one scenario run
pub struct ScenarioContext {
    client: CatalogClient,
    fixtures: FixtureFactory,
    teardowns: Vec<Teardown>,
    steps_run: usize,
    verbose: bool,
}

impl ScenarioContext {
    pub fn new(client: CatalogClient, fixtures: FixtureFactory, verbose: bool) -> Self {
        Self {
            client,
            fixtures,
            teardowns: Vec::new(),
            steps_run: 0,
            verbose,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn fixtures(&self) -> &FixtureFactory {
        &self.fixtures
    }

    /// Number of steps completed so far
    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    /// Mark the next step as passed
    pub fn pass(&mut self, label: &str, detail: impl AsRef<str>) {
        self.steps_run += 1;
        println!(
            "  {} Step {}: {}",
            "✓".green(),
            self.steps_run,
            label
        );
        let detail = detail.as_ref();
        if self.verbose && !detail.is_empty() {
            println!("      {}", detail.dimmed());
        }
    }

    /// Register cleanup for a fixture this scenario created
    pub fn on_teardown(&mut self, teardown: Teardown) {
        tracing::debug!(?teardown, "Registered teardown");
        self.teardowns.push(teardown);
    }

    /// Drop cleanup for a fixture the scenario already removed itself
    pub fn forget(&mut self, teardown: &Teardown) {
        self.teardowns.retain(|t| t != teardown);
    }

    pub fn pending_teardowns(&self) -> &[Teardown] {
        &self.teardowns
    }

    /// Run every registered teardown, newest first
    ///
    /// Failures are logged and counted; they never stop the remaining teardowns.
    pub async fn teardown(&mut self) -> usize {
        let mut failures = 0;
        while let Some(teardown) = self.teardowns.pop() {
            if let Err(e) = self.run_teardown(&teardown).await {
                failures += 1;
                tracing::warn!(?teardown, error = %e, "Teardown failed");
            } else if self.verbose {
                println!("  {} cleanup {}", "·".dimmed(), teardown.path().dimmed());
            }
        }
        failures
    }

    async fn run_teardown(&self, teardown: &Teardown) -> Result<()> {
        let response = self.client.delete(&teardown.path()).await?;
        ensure_ok(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::ServiceConfig;
    use crate::testing::fixtures::FixtureData;

    fn context() -> ScenarioContext {
        ScenarioContext::new(
            CatalogClient::new(&ServiceConfig::default()).unwrap(),
            FixtureFactory::with_tag(FixtureData::default(), None),
            false,
        )
    }

    #[test]
    fn test_forget_removes_only_matching_teardown() {
        let mut ctx = context();
        ctx.on_teardown(Teardown::DeleteCategory("c1".to_string()));
        ctx.on_teardown(Teardown::DeleteBook("b1".to_string()));
        ctx.forget(&Teardown::DeleteBook("b1".to_string()));

        assert_eq!(
            ctx.pending_teardowns(),
            &[Teardown::DeleteCategory("c1".to_string())]
        );
    }

    #[test]
    fn test_pass_counts_steps() {
        let mut ctx = context();
        ctx.pass("first", "");
        ctx.pass("second", "detail");
        assert_eq!(ctx.steps_run(), 2);
    }

    #[test]
    fn test_teardown_paths() {
        assert_eq!(Teardown::DeleteCategory("x".into()).path(), "category/x");
        assert_eq!(Teardown::DeleteBook("y".into()).path(), "book/y");
    }
}
