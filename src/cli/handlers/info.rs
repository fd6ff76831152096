use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::registry::{EnvironmentRegistry, RegistryError};
use crate::core::venv;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows an environment's path, size and installed packages."
)]
struct InfoArgs {
    /// The registered name of the environment.
    name: String,

    /// Skip querying the installed-package list.
    #[arg(long)]
    no_packages: bool,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let info_args = InfoArgs::try_parse_from(&args)?;

    let path = registry
        .path_of(&info_args.name)
        .map(std::path::Path::to_path_buf)
        .ok_or_else(|| anyhow!("No environment named '{}' is registered.", info_args.name))?;

    println!("\n{}", info_args.name.cyan().bold());
    println!("  path:   {}", path.display());

    if !path.is_dir() {
        println!("  status: {}", "missing on disk".red());
        println!("  (the entry will be pruned on the next reload)");
        return Ok(());
    }

    println!("  status: {}", "ok".green());
    println!(
        "  size:   {}",
        commons::format_size(commons::directory_size(&path))
    );
    if !venv::has_pip(&path) {
        println!("  pip:    {}", "not provisioned".yellow());
        return Ok(());
    }

    if info_args.no_packages {
        return Ok(());
    }

    // Package state is never cached; every query goes to pip itself.
    match registry.installed_packages(&info_args.name) {
        Ok(packages) => {
            println!("  packages ({}):", packages.len());
            for package in packages {
                println!("    {} {}", package.name, package.version.dimmed());
            }
        }
        Err(RegistryError::CommandFailed { output }) => {
            println!(
                "  packages: {} ({})",
                "unavailable".yellow(),
                output.stderr.lines().next().unwrap_or("pip list failed")
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
