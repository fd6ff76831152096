use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::core::registry::EnvironmentRegistry;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Installs one or more packages into an environment."
)]
struct InstallArgs {
    /// The registered name of the target environment.
    name: String,

    /// Package specs to install (e.g. "requests" or "flask==3.1.0").
    #[arg(required = true, num_args = 1..)]
    packages: Vec<String>,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let install_args = InstallArgs::try_parse_from(&args)?;

    // A single package takes the simple path; a batch goes through the
    // combined-then-fallback flow and can succeed partially.
    if let [only] = install_args.packages.as_slice() {
        registry.install_package(&install_args.name, only)?;
        println!(
            "\n{} Installed '{}' into '{}'.",
            "Success:".green().bold(),
            only.cyan(),
            install_args.name.cyan()
        );
        return Ok(());
    }

    let outcome = registry.install_many(&install_args.name, &install_args.packages)?;

    for failure in &outcome.failures {
        println!(
            "  {} '{}' failed: {}",
            "✗".red(),
            failure.package,
            failure.detail.lines().next().unwrap_or("unknown error")
        );
    }

    if outcome.is_complete() {
        println!(
            "\n{} Installed {} packages into '{}'.",
            "Success:".green().bold(),
            outcome.total,
            install_args.name.cyan()
        );
        Ok(())
    } else if outcome.succeeded > 0 {
        println!(
            "\n{} {}/{} packages installed into '{}'.",
            "Partial:".yellow().bold(),
            outcome.succeeded,
            outcome.total,
            install_args.name.cyan()
        );
        Ok(())
    } else {
        Err(anyhow!(
            "none of the {} requested packages could be installed",
            outcome.total
        ))
    }
}
