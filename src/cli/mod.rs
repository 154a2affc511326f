//! CLI command handling
//!
//! Resolves configuration and fixtures, then hands off to the runner.

use colored::Colorize;

use crate::api::{provider_for, CatalogClient};
use crate::commands::{Commands, ServiceArgs};
use crate::common::{Config, Error, Result};
use crate::testing::{scenarios, FixtureData, FixtureFactory, Suite};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            scenarios: names,
            service,
            fixtures,
            no_tag,
            verbose,
        } => {
            let config = resolve_config(&service)?;
            let selected = scenarios::select(&names)?;

            let data = FixtureData::load(fixtures.as_deref())?;
            let factory = if no_tag {
                FixtureFactory::with_tag(data, None)
            } else {
                FixtureFactory::new(data)
            };

            let client = CatalogClient::new(&config.service)?;
            println!("Target: {}", client.base_url().cyan());
            if let Some(tag) = factory.run_tag() {
                println!("Run tag: {}", tag.dimmed());
            }

            let suite = Suite::new(client, provider_for(&config.auth), factory).verbose(verbose);
            let report = suite.run(&selected).await;
            report.print_summary();

            if report.all_passed() {
                Ok(())
            } else {
                Err(Error::assertion(format!(
                    "{} of {} scenarios failed",
                    report.failed(),
                    report.results.len()
                )))
            }
        }

        Commands::List => {
            for scenario in scenarios::all() {
                println!("{}", scenario.name().bold());
                println!("  {}", scenario.description());
                for (i, step) in scenario.steps().iter().enumerate() {
                    println!("    {}. {}", i + 1, step.dimmed());
                }
            }
            Ok(())
        }

        Commands::Config { service } => {
            let config = resolve_config(&service)?;
            print!("{}", config.to_redacted_toml()?);
            Ok(())
        }
    }
}

/// Load configuration, then apply command-line overrides
fn resolve_config(args: &ServiceArgs) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &ServiceArgs) {
    if let Some(url) = &args.base_url {
        config.service.base_url = url.clone();
    }
    if let Some(token) = &args.token {
        config.auth.token = Some(token.clone());
    }
}
