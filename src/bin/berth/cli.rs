//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use berth::core::TaskKind;

/// Berth - build convention resolution for multi-module JVM projects
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Berth.toml (default: search upward from the current directory)
    #[arg(long, global = true, env = "BERTH_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered conventions
    Conventions(ConventionsArgs),

    /// Show resolved flags for a module
    Flags(FlagsArgs),

    /// Resolve every module and emit the build plan
    Plan(PlanArgs),

    /// Validate the manifest and toolchains
    Check,

    /// Toolchain discovery
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConventionsArgs {
    /// Also list superseded revisions
    #[arg(long)]
    pub all_revisions: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Module to show flags for
    pub module: String,

    /// Show a single task kind (compile, execute, test)
    #[arg(long)]
    pub kind: Option<TaskKind>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the JSON plan to a file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(subcommand)]
    pub command: ToolchainCommands,
}

#[derive(Subcommand)]
pub enum ToolchainCommands {
    /// Show the toolchain selected for a language version
    Show(ToolchainShowArgs),

    /// List every discovered toolchain
    List,
}

#[derive(Args)]
pub struct ToolchainShowArgs {
    /// Language version (e.g. 17)
    pub version: i64,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
