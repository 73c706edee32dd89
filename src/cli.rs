use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crease",
    version,
    about = "Ball-by-ball scoring for amateur cricket matches"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter crease.toml into a match directory
    Init(InitCommand),
    /// Load and validate a match directory's configuration
    Check(CheckCommand),
    /// Replay a scorer script and print the scoreboard
    Play(PlayCommand),
    /// List finished matches saved in a match directory
    History(HistoryCommand),
}

#[derive(Args)]
pub struct InitCommand {
    pub path: PathBuf,
    /// Overwrite an existing crease.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CheckCommand {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct PlayCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub script: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Stop at the first rejected action
    #[arg(long)]
    pub strict: bool,
    /// Do not save the finished match
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct HistoryCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
