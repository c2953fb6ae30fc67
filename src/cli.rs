use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::solver::Policy;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext
{
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
}

#[derive(Parser)]
#[command(name = "unriddle")]
#[command(about = "Solve obfuscated arithmetic verification challenges")]
#[command(version, long_about = None)]
pub struct Cli
{
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands
{
    /// Solve a challenge and print the answer
    Solve(SolveArgs),

    /// Show how the deterministic solver reads a challenge
    Inspect(InspectArgs),

    /// Answer a platform verification-required response
    Respond(RespondArgs),

    /// Classify a platform claim error as done, terminal or retryable
    Triage(TriageArgs),

    /// Initialize an unriddle.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Parser)]
pub struct SolveArgs
{
    /// Challenge text; words are joined with spaces. Read from stdin when omitted
    pub challenge: Vec<String>,

    /// Solving policy (defaults to the configured one)
    #[arg(long, value_enum)]
    pub policy: Option<Policy>,
}

#[derive(Debug, Parser)]
pub struct InspectArgs
{
    /// Challenge text; words are joined with spaces. Read from stdin when omitted
    pub challenge: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat
{
    Text,
    Json,
}

#[derive(Debug, Parser)]
pub struct RespondArgs
{
    /// JSON response file; `-` or omitted reads stdin
    pub input: Option<PathBuf>,

    /// Solving policy (defaults to the configured one)
    #[arg(long, value_enum)]
    pub policy: Option<Policy>,
}

#[derive(Debug, Parser)]
pub struct TriageArgs
{
    /// Error message returned by the platform
    #[arg(required = true)]
    pub message: Vec<String>,

    /// Emit JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct InitArgs
{
    /// Directory to write unriddle.toml into
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Parser)]
pub struct CompletionsArgs
{
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to stdout
    #[arg(long)]
    pub stdout: bool,

    /// Directory to write the completion file into
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell
{
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
