use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

use crate::assistant::{self, SessionRequest};
use crate::cli::{BuildArgs, Cli, Command, InitArgs, VibeArgs};
use crate::cmake::{self, BuildOptions};
use crate::config::{API_KEY_VAR, Settings};
use crate::identity::ProjectIdentity;
use crate::scaffold::{self, PluginKind};
use crate::templates;
use crate::ui;
use crate::util::process;

/// Flags shared by every subcommand.
struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    dry_run: bool,
    no_color: bool,
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            dry_run: cli.dry_run,
            no_color: cli.no_color,
        }
    }
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }

    fn config_file(&self) -> Result<Option<Utf8PathBuf>> {
        self.file
            .clone()
            .map(|path| {
                Utf8PathBuf::from_path_buf(path).map_err(|_| anyhow!("config path must be valid UTF-8"))
            })
            .transpose()
    }
}

struct AppState {
    ctx: CliContext,
    cwd: Utf8PathBuf,
    settings: Settings,
}

impl AppState {
    fn new(ctx: CliContext) -> Result<Self> {
        let cwd = current_dir()?;
        let file = ctx.config_file()?;
        let settings = Settings::load(file.as_deref(), &cwd)?;
        Ok(Self { ctx, cwd, settings })
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    if ctx.no_color {
        ui::disable_color();
    }
    ctx.apply_chdir()?;

    let state = AppState::new(ctx)?;
    match cli.command {
        Command::Init(args) => handle_init(&state, args),
        Command::Build(args) => handle_build(&state, args),
        Command::Vibe(args) => handle_vibe(&state, args),
        Command::Info => handle_info(&state),
        Command::Templates => handle_templates(),
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
        anyhow!("current directory {} is not valid UTF-8", path.display())
    })
}

fn handle_init(state: &AppState, args: InitArgs) -> Result<()> {
    let company = args.company.unwrap_or_else(|| state.settings.company.clone());
    let identity = ProjectIdentity::new(&args.name, &company)?;
    let kind = PluginKind::from_synth_flag(args.synth);
    let root = state.cwd.join(&identity.project_name);

    ui::panel(
        "🎸 VibeVST Init",
        &[
            ui::heading("Creating VST Plugin Project").to_string(),
            String::new(),
            format!("📁 Project: {}", identity.project_name),
            format!("📍 Location: {}", root),
            format!("🎹 Type: {}", kind.label()),
        ],
    );

    scaffold::init_project(&state.cwd, &identity, kind, state.ctx.dry_run)?;
    if state.ctx.dry_run {
        return Ok(());
    }

    println!();
    ui::panel(
        "🎉 Success",
        &[
            ui::heading("✅ Project Created Successfully!").to_string(),
            String::new(),
            "Next steps:".to_owned(),
            format!("  1. cd {}", identity.project_name),
            "  2. Use AI agent to add DSP/GUI code".to_owned(),
            "  3. vibevst build".to_owned(),
            format!("  4. Find your VST3 in build/{}_artefacts/", identity.project_name),
        ],
    );
    Ok(())
}

fn handle_build(state: &AppState, args: BuildArgs) -> Result<()> {
    cmake::require_descriptor(&state.cwd)?;

    ui::panel(
        "🔨 VibeVST Build",
        &[
            ui::heading("Building VST Plugin").to_string(),
            String::new(),
            format!("📁 Directory: {}", state.cwd),
            format!("⚙️  Config: {}", args.config),
        ],
    );

    let options = BuildOptions {
        cmake: state.settings.cmake.clone(),
        config: args.config,
        clean: args.clean,
        dry_run: state.ctx.dry_run,
    };
    let artifacts = cmake::build(&state.cwd, &state.settings.juce_path, &options)?;
    if state.ctx.dry_run {
        return Ok(());
    }

    println!("\n{}", ui::heading("✅ Build completed successfully!"));
    if !artifacts.is_empty() {
        println!("\nOutput files:");
        for artifact in artifacts {
            println!("  📦 {}", artifact);
        }
    }
    Ok(())
}

fn handle_vibe(state: &AppState, args: VibeArgs) -> Result<()> {
    let prompt = assistant::join_prompt(&args.prompt);
    let model = args.model.unwrap_or_else(|| state.settings.model.clone());

    ui::panel(
        "🎸 VibeVST Vibe Mode",
        &[
            ui::heading("Starting AI Coding Session").to_string(),
            String::new(),
            format!("🤖 Model: {}", model),
            format!("💬 Prompt: {}", assistant::preview(&prompt)),
        ],
    );

    let request = SessionRequest {
        prompt,
        model,
        assistant: state.settings.assistant.clone(),
        juce_path: state.settings.juce_path.clone(),
    };
    assistant::start_session(
        &request,
        state.settings.api_key.as_deref(),
        &state.cwd,
        state.ctx.dry_run,
    )?;
    Ok(())
}

fn handle_info(state: &AppState) -> Result<()> {
    ui::panel("ℹ️ Info", &info_lines(&state.settings));
    Ok(())
}

fn info_lines(settings: &Settings) -> Vec<String> {
    let config = match &settings.config_path {
        Some(resolved) if settings.config_loaded => {
            format!("{} ({})", resolved.path, resolved.source.as_str())
        }
        Some(resolved) => format!("{} (not found, using defaults)", resolved.path),
        None => "none".to_owned(),
    };
    let key = if settings.api_key.is_some() { "Set" } else { "Not Set" };

    vec![
        ui::heading("VibeVST Environment Info").to_string(),
        String::new(),
        format!("🔧 JUCE Path: {}", settings.juce_path),
        format!("📦 JUCE Modules: {}", settings.juce_modules_path),
        format!("🗂️  Config: {}", config),
        format!("🦀 vibevst: {}", env!("CARGO_PKG_VERSION")),
        format!("🛠️  Tools: {}", tool_summary(&[settings.cmake.as_str(), "ninja", settings.assistant.as_str()])),
        format!("🔑 {}: {}", API_KEY_VAR, key),
    ]
}

fn tool_summary(tools: &[&str]) -> String {
    tools
        .iter()
        .map(|tool| {
            let mark = if process::is_available(tool) { "found" } else { "missing" };
            format!("{tool} ({mark})")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn handle_templates() -> Result<()> {
    let mut lines = vec![
        ui::heading("Available Templates").to_string(),
        String::new(),
        format!("{} (default)", PluginKind::Effect.template_name()),
        "  Basic audio effect plugin with stereo I/O".to_owned(),
        "  Usage: vibevst init \"MyEffect\"".to_owned(),
        String::new(),
        PluginKind::Synth.template_name().to_owned(),
        "  Synthesizer plugin with MIDI input".to_owned(),
        "  Usage: vibevst init \"MySynth\" --synth".to_owned(),
        String::new(),
        "Files:".to_owned(),
    ];
    for name in templates::list("juce/") {
        let target = Utf8Path::new(&name).strip_prefix("juce").map(Utf8Path::to_string);
        lines.push(format!("  • {}", target.unwrap_or(name)));
    }
    lines.extend([
        String::new(),
        "Coming Soon:".to_owned(),
        "  • Spectral Analyzer".to_owned(),
        "  • Multi-band Processor".to_owned(),
        "  • Sampler".to_owned(),
    ]);

    ui::panel("📋 Templates", &lines);
    Ok(())
}
