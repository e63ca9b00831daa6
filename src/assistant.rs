use std::io;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::config::API_KEY_VAR;
use crate::ui;
use crate::util::process;

const PREVIEW_CHARS: usize = 100;

#[derive(Clone, Debug)]
pub struct SessionRequest {
    pub prompt: String,
    pub model: String,
    /// Executable of the coding assistant, looked up on `PATH`.
    pub assistant: String,
    pub juce_path: Utf8PathBuf,
}

#[derive(Debug)]
pub enum SessionOutcome {
    Launched(ExitStatus),
    /// The assistant could not be found; the context was printed instead.
    Fallback { context: String },
    DryRun { argv: Vec<String> },
}

/// Join the words given on the command line into one request.
pub fn join_prompt(words: &[String]) -> String {
    words.join(" ")
}

/// First 100 characters of the prompt, with `...` when cut.
pub fn preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn build_context(juce_path: &Utf8Path, prompt: &str) -> String {
    format!(
        "You are helping develop a JUCE VST3 plugin.
The JUCE framework is located at {juce_path}.
Use JUCE 7 syntax and modern C++20 features.

Project structure:
- Source/PluginProcessor.cpp - Audio processing callback
- Source/PluginEditor.cpp - GUI code
- Source/DSP/ - Put DSP classes here (filters, oscillators, etc.)
- Source/GUI/ - Put custom GUI components here

User's request: {prompt}
"
    )
}

pub fn assistant_argv(assistant: &str, model: &str, context: &str) -> Vec<String> {
    vec![
        assistant.to_owned(),
        "--model".to_owned(),
        model.to_owned(),
        "--message".to_owned(),
        context.to_owned(),
        "--no-git".to_owned(),
    ]
}

/// Hand the request to the assistant in `project`.
///
/// The credential is checked first and its absence is fatal. A missing
/// assistant executable is not: the context is printed for manual use.
pub fn start_session(
    request: &SessionRequest,
    api_key: Option<&str>,
    project: &Utf8Path,
    dry_run: bool,
) -> Result<SessionOutcome> {
    if api_key.is_none_or(str::is_empty) {
        bail!("No API key found!\nSet the {} environment variable.", API_KEY_VAR);
    }

    let context = build_context(&request.juce_path, &request.prompt);
    let argv = assistant_argv(&request.assistant, &request.model, &context);

    if dry_run {
        println!("[dry-run] {}", process::format_command(&argv));
        return Ok(SessionOutcome::DryRun { argv });
    }

    let spawned = which::which(&request.assistant)
        .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))
        .and_then(|program| Command::new(program).args(&argv[1..]).current_dir(project).status());

    match spawned {
        Ok(status) => {
            if status.success() {
                info!(assistant = %request.assistant, "assistant session finished");
            } else {
                warn!(assistant = %request.assistant, code = ?status.code(), "assistant exited with failure");
            }
            Ok(SessionOutcome::Launched(status))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            ui::warn(&format!(
                "{} not found, falling back to simple mode...",
                request.assistant
            ));
            println!("\n{}\n", ui::heading("Context for your AI assistant:"));
            println!("{}", context);
            Ok(SessionOutcome::Fallback { context })
        }
        Err(err) => {
            Err(err).with_context(|| format!("executing `{}`", process::format_command(&argv)))
        }
    }
}
