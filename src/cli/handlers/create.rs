use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::registry::EnvironmentRegistry;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Creates a new virtual environment and registers it."
)]
struct CreateArgs {
    /// The name for the new environment (also the on-disk directory name).
    name: String,

    /// The directory to create the environment in. Defaults to the current
    /// directory; `~` and environment variables are expanded.
    dir: Option<String>,

    /// Create without pip, then bootstrap it via `ensurepip` (usually faster).
    #[arg(long)]
    fast: bool,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let create_args = CreateArgs::try_parse_from(&args)?;

    // 1. Resolve the base directory; it is the caller's job to make it usable.
    let base_dir = match &create_args.dir {
        Some(raw) => {
            let expanded = shellexpand::full(raw)
                .map_err(|e| anyhow!("Could not expand directory '{raw}': {e}"))?;
            PathBuf::from(expanded.into_owned())
        }
        None => env::current_dir().context("Could not determine the current directory.")?,
    };
    if !base_dir.exists() {
        fs::create_dir_all(&base_dir).with_context(|| {
            format!("Could not create base directory '{}'.", base_dir.display())
        })?;
    }

    // 2. Create and register. Key deduplication happens inside the registry.
    println!(
        "Creating virtual environment '{}' in {}...",
        create_args.name.cyan(),
        base_dir.display().to_string().dimmed()
    );
    let created = registry.create(&base_dir, &create_args.name, create_args.fast)?;

    println!(
        "\n{} Environment '{}' created at {}",
        "Success:".green().bold(),
        created.name.cyan(),
        created.path.display()
    );
    if created.name != create_args.name {
        println!(
            "  {} the name '{}' was taken, so it was registered as '{}'.",
            "note:".yellow(),
            create_args.name,
            created.name.cyan()
        );
    }
    Ok(())
}
