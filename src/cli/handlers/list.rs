use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::core::registry::EnvironmentRegistry;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists all registered environments.")]
struct ListArgs {
    /// Only print the environment names, one per line.
    #[arg(long, short)]
    quiet: bool,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;

    let summaries = registry.list();
    if summaries.is_empty() {
        println!("No environments registered. Create one with 'venvm create <name>'.");
        return Ok(());
    }

    if list_args.quiet {
        for summary in summaries {
            println!("{}", summary.name);
        }
        return Ok(());
    }

    println!("\nRegistered environments:");
    for summary in summaries {
        // Entries whose directory vanished are shown, not hidden, so the
        // user knows a cleanup (or a reload) will prune them.
        let marker = if summary.exists {
            "•".green()
        } else {
            "✗".red()
        };
        let mut line = format!(
            "  {} {}  {}",
            marker,
            summary.name.cyan(),
            summary.path.display().to_string().dimmed()
        );
        if !summary.exists {
            line.push_str(&format!("  {}", "(missing)".red()));
        }
        println!("{line}");
    }
    Ok(())
}
