use anyhow::Result;
use clap::Parser;
use std::io::Write;

use crate::core::registry::{EnvironmentRegistry, RegistryError};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Forwards a raw command to the environment's pip."
)]
struct PipArgs {
    /// The registered name of the target environment.
    name: String,

    /// Arguments passed verbatim to pip (e.g. `list --outdated`).
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

pub fn handle(args: Vec<String>, registry: &mut EnvironmentRegistry) -> Result<()> {
    let pip_args = PipArgs::try_parse_from(&args)?;

    // The command's exit status is a result value, not a fatal error: relay
    // pip's own output and mirror its exit code, like any faithful wrapper.
    match registry.run_command(&pip_args.name, &pip_args.args) {
        Ok(output) => {
            relay(&output.stdout, &output.stderr);
            Ok(())
        }
        Err(RegistryError::CommandFailed { output }) => {
            relay(&output.stdout, &output.stderr);
            std::process::exit(output.status.unwrap_or(1));
        }
        Err(e) => Err(e.into()),
    }
}

fn relay(stdout: &str, stderr: &str) {
    if !stdout.is_empty() {
        print!("{stdout}");
    }
    if !stderr.is_empty() {
        let _ = write!(std::io::stderr(), "{stderr}");
    }
}
