use clap::Parser;
use colored::Colorize;

pub mod handlers;

/// venvm: a fast, registry-backed manager for Python virtual environments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The sequence of arguments passed to venvm. Parsed by the dispatcher,
    /// not by clap, so that both `venvm create app` and `venvm app install
    /// requests` work without a rigid subcommand tree.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Prints the full, command-oriented help text.
pub fn print_help() {
    println!(
        "\n{} - manage Python virtual environments from one registry\n",
        "venvm".cyan().bold()
    );
    println!("{}", "Usage:".yellow().bold());
    println!("  venvm <command> [args...]");
    println!("  venvm <env> <command> [args...]    (environment-first shorthand)");
    println!("  venvm <env> <pip args...>          (raw pip pass-through)\n");
    println!("{}", "Commands:".yellow().bold());
    println!(
        "  {}  <name> [dir] [--fast]   Create and register a new environment",
        "create".cyan()
    );
    println!(
        "  {}  <name> [--yes]          Delete an environment and unregister it",
        "delete".cyan()
    );
    println!(
        "  {} <name> <pkg>...         Install packages (batch may succeed partially)",
        "install".cyan()
    );
    println!(
        "  {}     <name> <args>...       Forward a raw command to the env's pip",
        "pip".cyan()
    );
    println!(
        "  {}    [--quiet]              List registered environments",
        "list".cyan()
    );
    println!(
        "  {}    <name>                 Show path, size and installed packages",
        "info".cyan()
    );
    println!(
        "  {}    <name>                 Reveal the environment in the file manager",
        "open".cyan()
    );
    println!("\n{}", "Examples:".yellow().bold());
    println!("  venvm create venv ~/projects/demo");
    println!("  venvm demo install requests flask");
    println!("  venvm pip demo list --outdated");
}
