//! Scaffold, build, and vibe-code JUCE audio plugin projects.

pub mod assistant;
pub mod cli;
pub mod cmake;
pub mod config;
pub mod identity;
pub mod logging;
pub mod patcher;
pub mod runner;
pub mod scaffold;
pub mod templates;
pub mod ui;
pub mod util;
