use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::registry::EnvironmentRegistry;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Deletes an environment's directory and unregisters it."
)]
struct DeleteArgs {
    /// The registered name of the environment to delete.
    name: String,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let delete_args = DeleteArgs::try_parse_from(&args)?;

    // Show what is about to be removed before asking.
    if let Some(path) = registry.path_of(&delete_args.name) {
        println!(
            "\n{} '{}' and its directory {} will be removed.",
            "Warning:".red().bold(),
            delete_args.name.cyan(),
            path.display()
        );
    }

    if !delete_args.yes
        && !commons::confirm_destruction(&format!(
            "Delete environment '{}'?",
            delete_args.name
        ))?
    {
        return Ok(());
    }

    registry.delete(&delete_args.name)?;

    println!(
        "\n{} Deleted environment '{}'.",
        "Success:".green().bold(),
        delete_args.name.cyan()
    );
    Ok(())
}
