use std::path::PathBuf;

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use clap::Parser;

use vibevst::config::Settings;
use vibevst::{logging, patcher};

/// Let JUCE's juceaide build use a pre-built binary passed as `JUCE_TOOL_JUCEAIDE`.
#[derive(Parser, Debug)]
#[command(name = "patch-juceaide", version)]
struct Args {
    /// CMake file to patch [default: $JUCE_PATH/extras/Build/juceaide/CMakeLists.txt].
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let target = match args.file {
        Some(path) => Utf8PathBuf::from_path_buf(path)
            .map_err(|path| anyhow!("{} is not valid UTF-8", path.display()))?,
        None => {
            let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
                .map_err(|path| anyhow!("current directory {} is not valid UTF-8", path.display()))?;
            let settings = Settings::load(None, &cwd)?;
            patcher::default_target(&settings.juce_path)
        }
    };

    patcher::patch_file(&target, args.dry_run)?;
    Ok(())
}
