use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::Command;

use crate::core::registry::EnvironmentRegistry;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Reveals an environment's directory in the file manager."
)]
struct OpenArgs {
    /// The registered name of the environment.
    name: String,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let open_args = OpenArgs::try_parse_from(&args)?;

    let path = registry
        .path_of(&open_args.name)
        .ok_or_else(|| anyhow!("No environment named '{}' is registered.", open_args.name))?;
    if !path.is_dir() {
        return Err(anyhow!(
            "Environment '{}' is registered but its directory '{}' no longer exists.",
            open_args.name,
            path.display()
        ));
    }

    launch_file_manager(path)
        .with_context(|| format!("Could not open '{}' in the file manager.", path.display()))?;

    println!("Opened '{}'.", open_args.name.cyan());
    Ok(())
}

/// Fire-and-forget: the file manager outlives this process.
fn launch_file_manager(path: &Path) -> std::io::Result<()> {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    Command::new(opener).arg(path).spawn().map(|_| ())
}
