use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use compmeta::cli::{Arguments, ExitStatus, logger::init_logger, run_cli};

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logger(args.verbose());

    match run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
