use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_JUCE_PATH: &str = "/opt/JUCE";
pub const DEFAULT_COMPANY: &str = "VibeVST";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ASSISTANT: &str = "aider";
pub const DEFAULT_CMAKE: &str = "cmake";

pub const JUCE_PATH_VAR: &str = "JUCE_PATH";
pub const JUCE_MODULES_PATH_VAR: &str = "JUCE_MODULES_PATH";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const CONFIG_DIR: &str = ".vibevst";
const CONFIG_FILE: &str = "config.toml";

/// Optional `config.toml` document. Every key falls back to the environment or a default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub juce_path: Option<String>,
    pub juce_modules_path: Option<String>,
    pub company: Option<String>,
    pub model: Option<String>,
    pub assistant: Option<String>,
    pub cmake: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigPathSource,
}

/// Effective configuration for one invocation.
#[derive(Clone, Debug)]
pub struct Settings {
    pub juce_path: Utf8PathBuf,
    pub juce_modules_path: Utf8PathBuf,
    pub company: String,
    pub model: String,
    pub assistant: String,
    /// CMake executable used by `build`.
    pub cmake: String,
    /// Credential for the assistant session; never printed.
    pub api_key: Option<String>,
    pub config_path: Option<ResolvedConfigPath>,
    pub config_loaded: bool,
}

impl Settings {
    /// Load settings from the process environment and the resolved config file.
    pub fn load(explicit: Option<&Utf8Path>, cwd: &Utf8Path) -> Result<Self> {
        let config_path = resolve_config_path(explicit, cwd);
        let file = match &config_path {
            Some(resolved) if resolved.path.exists() => Some(load_from_path(&resolved.path)?),
            Some(resolved) if resolved.source == ConfigPathSource::Explicit => {
                return Err(anyhow!("config file {} does not exist", resolved.path));
            }
            _ => None,
        };

        let mut settings = Self::resolve(file.as_ref(), |key| std::env::var(key).ok());
        settings.config_loaded = file.is_some();
        settings.config_path = config_path;
        debug!(
            juce_path = %settings.juce_path,
            config = ?settings.config_path,
            "resolved settings"
        );
        Ok(settings)
    }

    /// Merge values: environment first, then the config file, then built-in defaults.
    pub fn resolve(file: Option<&FileConfig>, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| env(key).filter(|value| !value.is_empty());
        let from_file = |pick: fn(&FileConfig) -> Option<&String>| file.and_then(pick).cloned();

        let juce_path = lookup(JUCE_PATH_VAR)
            .or_else(|| from_file(|f| f.juce_path.as_ref()))
            .unwrap_or_else(|| DEFAULT_JUCE_PATH.to_owned());
        let juce_path = Utf8PathBuf::from(juce_path);

        let juce_modules_path = lookup(JUCE_MODULES_PATH_VAR)
            .or_else(|| from_file(|f| f.juce_modules_path.as_ref()))
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| juce_path.join("modules"));

        Self {
            juce_path,
            juce_modules_path,
            company: from_file(|f| f.company.as_ref()).unwrap_or_else(|| DEFAULT_COMPANY.to_owned()),
            model: from_file(|f| f.model.as_ref()).unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            assistant: from_file(|f| f.assistant.as_ref())
                .unwrap_or_else(|| DEFAULT_ASSISTANT.to_owned()),
            cmake: from_file(|f| f.cmake.as_ref()).unwrap_or_else(|| DEFAULT_CMAKE.to_owned()),
            api_key: lookup(API_KEY_VAR),
            config_path: None,
            config_loaded: false,
        }
    }
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// `--file`, then the nearest `.vibevst/config.toml` above `cwd`, then the home directory.
pub fn resolve_config_path(explicit: Option<&Utf8Path>, cwd: &Utf8Path) -> Option<ResolvedConfigPath> {
    if let Some(path) = explicit {
        return Some(ResolvedConfigPath {
            path: path.to_owned(),
            source: ConfigPathSource::Explicit,
        });
    }

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.exists() {
            return Some(ResolvedConfigPath {
                path: candidate,
                source: ConfigPathSource::Discovered,
            });
        }
    }

    let home = dirs::home_dir().and_then(|home| Utf8PathBuf::from_path_buf(home).ok())?;
    Some(ResolvedConfigPath {
        path: home.join(CONFIG_DIR).join(CONFIG_FILE),
        source: ConfigPathSource::HomeDefault,
    })
}
