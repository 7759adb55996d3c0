//! # Driver Binary
//!
//! `driver evaluate` runs dataset episodes against the kinematic
//! environment; `driver explore` random-walks discovered scenes and exports
//! what the agent sees.

use anyhow::Result;
use clap::Parser;
use driver::cli::{Cli, Command};
use tracing::info;

fn main() -> Result<()> {
    driver::init_logging();

    match Cli::parse().command {
        Command::Evaluate(args) => {
            driver::evaluate::run(&args)?;
        }
        Command::Explore(args) => {
            let reports = driver::explore::run(&args)?;
            info!("Explored {} scenes", reports.len());
        }
    }
    Ok(())
}
