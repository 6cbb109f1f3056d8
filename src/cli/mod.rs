//! Command-line interface: argument parsing, dispatch and reporting.

use anyhow::Result;

pub mod args;
pub mod commands;
mod exit_status;
pub mod logger;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
