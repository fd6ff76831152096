// src/bin/venvm.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use venvm::{
    cli::{self, Cli, handlers},
    core::{paths, registry::EnvironmentRegistry},
};

// --- Command Definition and Registry ---

/// Defines a user-facing command, its aliases, and its handler function.
/// The handler signature is kept consistent across all commands so the
/// dispatcher can treat them uniformly.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut EnvironmentRegistry) -> Result<()>,
}

/// The single source of truth for all commands. To add one, add an entry.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "create",
        aliases: &["new"],
        handler: handlers::create::handle,
    },
    CommandDefinition {
        name: "delete",
        aliases: &["del", "rm"],
        handler: handlers::delete::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "install",
        aliases: &["add"],
        handler: handlers::install::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "open",
        aliases: &[],
        handler: handlers::open::handle,
    },
    CommandDefinition {
        name: "pip",
        aliases: &[],
        handler: handlers::pip::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point of the `venvm` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// The main application dispatcher.
///
/// Routes `venvm <command> ...`, the environment-first shorthand
/// `venvm <env> <command> ...`, and the bare pip pass-through
/// `venvm <env> <pip args...>`.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {cli:?}");

    let mut args = cli.args.into_iter();
    let Some(arg1) = args.next() else {
        cli::print_help();
        return Ok(());
    };
    let remaining: Vec<String> = args.collect();

    if arg1 == "help" {
        cli::print_help();
        return Ok(());
    }

    // The registry is constructed exactly once per process, with the default
    // path injected here; handlers receive it by reference. One operation is
    // in flight at a time, which is also the mutation-serialization contract.
    let mut registry = EnvironmentRegistry::open(paths::get_registry_path()?)?;

    if let Some(command) = find_command(&arg1) {
        // Case: `venvm <command> [args...]`
        return (command.handler)(remaining, &mut registry);
    }

    if let Some(arg2) = remaining.first() {
        if let Some(command) = find_command(arg2) {
            // Case: `venvm <env> <command> [args...]`
            let mut handler_args = vec![arg1];
            handler_args.extend(remaining.into_iter().skip(1));
            return (command.handler)(handler_args, &mut registry);
        }
        // Case: `venvm <env> <pip args...>` — raw pass-through shortcut.
        let mut handler_args = vec![arg1];
        handler_args.extend(remaining);
        return handlers::pip::handle(handler_args, &mut registry);
    }

    Err(anyhow!(
        "'{arg1}' is not a command, and an environment name needs an action after it. Try 'venvm help'."
    ))
}
