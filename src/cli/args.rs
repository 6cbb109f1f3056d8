//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract component and configuration metadata
//! - `init`: Initialize compmeta configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
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

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Overrides of `.compmetarc.json` values.
#[derive(Debug, Clone, Default, Args)]
pub struct ExtractCommand {
    /// Project manifest (overrides config file)
    #[arg(long)]
    pub tsconfig: Option<PathBuf>,

    /// Library name tagging every record (overrides config file)
    #[arg(long)]
    pub name: Option<String>,

    /// Allow-listed library, can be specified multiple times (overrides config file)
    #[arg(long = "library")]
    pub libraries: Vec<String>,

    /// Make unsupported constructs fatal
    #[arg(long, env = "COMPMETA_STRICT")]
    pub strict: bool,

    /// Keep EXPOSED_COMPONENT configurations
    #[arg(long)]
    pub exposed_component_support: bool,

    /// Placeholders metadata file (overrides config file)
    #[arg(long)]
    pub placeholders: Option<PathBuf>,

    /// Components document path (overrides config file)
    #[arg(long)]
    pub component_output: Option<PathBuf>,

    /// Configurations document path (overrides config file)
    #[arg(long)]
    pub config_output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    pub inline: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract component and configuration metadata from the project
    Extract(ExtractCommand),
    /// Initialize a new .compmetarc.json configuration file
    Init,
}
