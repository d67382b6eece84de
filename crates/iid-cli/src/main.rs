//! `iid` command line tool
//!
//! Reports which objects of an update package would be installed.

use anyhow::Result;
use clap::Parser;
use iid_cli::{logging, Cli};
use std::io;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format)?;

    let stdout = io::stdout();
    let succeeded = iid_cli::run(&cli.command, &mut stdout.lock())?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
