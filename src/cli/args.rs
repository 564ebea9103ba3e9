//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: update catalog templates and `.po` files from sources and markup
//! - `compile`: build `.mo` files, translated markup and JavaScript message maps
//! - `init`: write a default `.mgettextrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mgettext", author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Compile(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by the run commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Process only the module whose directory has this name
    #[arg(short, long)]
    pub module: Option<String>,

    /// Supported locale (overrides config file)
    /// Can be specified multiple times: --locale en_US --locale cs_CZ
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CompileCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable strings into messages.pot and update the .po files
    Extract(ExtractCommand),
    /// Compile .po files and generate translated HTML and JavaScript catalogs
    Compile(CompileCommand),
    /// Initialize a new .mgettextrc.json configuration file
    Init,
}
