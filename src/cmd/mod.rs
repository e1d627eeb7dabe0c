//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], or [`validate`]. Each handler
//! lives in its own submodule.

pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::PatchbayError;

pub async fn dispatch(cli: Cli) -> Result<(), PatchbayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  patchbay v{version} \u{2014} content-based telemetry routing transport\n\n  \
         No command provided. To get started:\n\n    \
         patchbay init                   Generate a starter routes file\n    \
         patchbay run                    Start the demo server (auto-detects ./patchbay.json)\n    \
         patchbay run -c routes.json     Start with a specific routes file\n    \
         patchbay --help                 See all commands and options\n"
    );
}
