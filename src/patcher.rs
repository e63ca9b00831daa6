//! Teach JUCE's juceaide build to accept a pre-built binary.
//!
//! JUCE builds its `juceaide` helper during configure, which fails or is slow
//! on cross-compiling and containerised toolchains. The patch inserts a branch
//! ahead of `if(JUCE_BUILD_HELPER_TOOLS)` that imports the executable named by
//! `JUCE_TOOL_JUCEAIDE` instead.

use std::fs;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Location of the juceaide CMake file relative to the JUCE root.
pub const JUCEAIDE_CMAKELISTS: &str = "extras/Build/juceaide/CMakeLists.txt";

/// Either marker means the file already carries the patch.
pub const PATCH_MARKERS: [&str; 2] = ["DEFINED JUCE_TOOL_JUCEAIDE", "Using provided juceaide:"];

pub const ANCHOR: &str = "if(JUCE_BUILD_HELPER_TOOLS)";

const PATCH_BLOCK: &str = r#"if(DEFINED JUCE_TOOL_JUCEAIDE)
    message(STATUS "Using provided juceaide: ${JUCE_TOOL_JUCEAIDE}")

    add_executable(juceaide IMPORTED GLOBAL)
    set_target_properties(juceaide PROPERTIES IMPORTED_LOCATION "${JUCE_TOOL_JUCEAIDE}")
    add_executable(juce::juceaide ALIAS juceaide)

    get_filename_component(_juce_juceaide_name "${JUCE_TOOL_JUCEAIDE}" NAME)
    set(JUCE_JUCEAIDE_NAME "${_juce_juceaide_name}" CACHE INTERNAL "The name of the juceaide program")
elseif(JUCE_BUILD_HELPER_TOOLS)"#;

#[derive(Debug, Eq, PartialEq)]
pub enum PatchOutcome {
    AlreadyPatched,
    Patched(String),
}

pub fn default_target(juce_path: &Utf8Path) -> Utf8PathBuf {
    juce_path.join(JUCEAIDE_CMAKELISTS)
}

pub fn is_patched(text: &str) -> bool {
    PATCH_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Apply the patch to `text` without touching the filesystem.
pub fn patch_text(text: &str) -> Result<PatchOutcome> {
    if is_patched(text) {
        return Ok(PatchOutcome::AlreadyPatched);
    }
    if !text.contains(ANCHOR) {
        bail!("Marker not found: {}", ANCHOR);
    }
    Ok(PatchOutcome::Patched(text.replacen(ANCHOR, PATCH_BLOCK, 1)))
}

/// Patch `path` in place. Nothing is written when the file is already
/// patched, when the anchor is missing, or on a dry run.
pub fn patch_file(path: &Utf8Path, dry_run: bool) -> Result<PatchOutcome> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let outcome = patch_text(&text).with_context(|| format!("patching {}", path))?;

    match &outcome {
        PatchOutcome::AlreadyPatched => println!("Already patched: {}", path),
        PatchOutcome::Patched(patched) if dry_run => {
            debug!(bytes = patched.len(), "skipping write on dry run");
            println!("[dry-run] would patch: {}", path);
        }
        PatchOutcome::Patched(patched) => {
            fs::write(path, patched).with_context(|| format!("writing {}", path))?;
            println!("Patched: {}", path);
        }
    }

    Ok(outcome)
}
