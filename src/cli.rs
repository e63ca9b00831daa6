use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cmake::BuildConfig;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "vibevst", version, about = "AI-powered VST plugin development")]
pub struct Cli {
    /// Run as if started in this directory.
    #[arg(short = 'C', long = "chdir", global = true)]
    pub chdir: Option<PathBuf>,
    /// Use this config file instead of discovering one.
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new VST plugin project.
    ///
    /// Example: vibevst init "MyAwesomeSynth" --synth
    Init(InitArgs),
    /// Build the VST plugin in the current directory.
    Build(BuildArgs),
    /// Start an AI coding session with your prompt.
    ///
    /// Example: vibevst vibe "Add a lowpass filter with cutoff parameter"
    Vibe(VibeArgs),
    /// Show environment information.
    Info,
    /// List available plugin templates.
    Templates,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Display name of the plugin; the project name is derived from it.
    pub name: String,
    /// Create a synthesizer plugin (generates audio, takes MIDI).
    #[arg(long)]
    pub synth: bool,
    /// Company/developer name [default: VibeVST].
    #[arg(long)]
    pub company: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[arg(long = "config", value_enum, default_value_t = BuildConfig::Release)]
    pub config: BuildConfig,
    /// Clean the build directory first.
    #[arg(long)]
    pub clean: bool,
}

#[derive(Args, Debug)]
pub struct VibeArgs {
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,
    /// Model passed to the assistant [default: claude-sonnet-4-20250514].
    #[arg(long)]
    pub model: Option<String>,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
