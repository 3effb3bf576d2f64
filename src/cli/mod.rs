use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_SETTINGS_PATH, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use clap::{Parser, Subcommand};

/// A single-file journal with optional encryption at rest
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Where to find the settings (diary.md and template.md live next to it)
    #[clap(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: String,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT)]
    #[clap(value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Creates a new daily entry in the diary
    Add,
    /// Opens the editor with the diary file
    Edit,
    /// Copies settings.yml and template.md examples into the settings directory
    Init,
}

impl Commands {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add => "add",
            Commands::Edit => "edit",
            Commands::Init => "init",
        }
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}
