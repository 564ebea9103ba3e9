//! Dispatches to the command handler for the parsed arguments.
//!
//! # Returns
//! - `Ok(CommandResult)` with the run log and counts
//! - `Err` when the command cannot run at all (bad config, unreadable root)

use std::env;

use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, compile, extract, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Compile(cmd)) => compile(cmd),
        Some(Command::Init) => {
            let dir = env::current_dir().context("Cannot determine current directory")?;
            init(&dir)
        }
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
