pub mod plugin;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::identity::ProjectIdentity;
use crate::templates;
use crate::ui;
use crate::util;

pub use plugin::PluginKind;

/// Directories created under the project root.
pub const PROJECT_DIRS: [&str; 4] = ["Source", "Source/DSP", "Source/GUI", "Resources"];

/// Empty files that keep otherwise-empty source folders under version control.
pub const RETENTION_MARKERS: [&str; 2] = ["Source/DSP/.gitkeep", "Source/GUI/.gitkeep"];

/// What `init` created (or would create on a dry run), relative to `root`.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub root: Utf8PathBuf,
    pub dirs: Vec<Utf8PathBuf>,
    pub files: Vec<Utf8PathBuf>,
}

/// Materialise a plugin project named after `identity` inside `parent`.
///
/// Generated files are overwritten; anything else in the directory is left alone.
pub fn init_project(
    parent: &Utf8Path,
    identity: &ProjectIdentity,
    kind: PluginKind,
    dry_run: bool,
) -> Result<ScaffoldReport> {
    let root = parent.join(&identity.project_name);
    let vars = plugin::template_vars(identity, kind);

    let mut report = ScaffoldReport {
        root: root.clone(),
        dirs: Vec::new(),
        files: Vec::new(),
    };

    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        if dry_run {
            println!("[dry-run] would create {}/", dir);
        } else {
            util::fs::ensure_dir(path.as_std_path())
                .with_context(|| format!("creating directory {}", path))?;
            ui::ok(&format!("Created {}/", dir));
        }
        report.dirs.push(Utf8PathBuf::from(dir));
    }

    for (template, target) in plugin::MANIFEST {
        let destination = root.join(target);
        let rendered = templates::render_embedded(template, &vars)?;
        if dry_run {
            println!("[dry-run] would generate {}", target);
        } else {
            templates::write_to(&destination, rendered.as_bytes())?;
            ui::ok(&format!("Generated {}", target));
        }
        report.files.push(Utf8PathBuf::from(target));
    }

    for marker in RETENTION_MARKERS {
        let path = root.join(marker);
        if !dry_run {
            util::fs::touch(path.as_std_path()).with_context(|| format!("creating {}", path))?;
        }
        report.files.push(Utf8PathBuf::from(marker));
    }

    if !dry_run {
        debug!(project = %identity.project_name, root = %root, "scaffolded plugin project");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn synth_project_layout() {
        let (_tmp, parent) = temp_root();
        let identity = ProjectIdentity::new("My Synth!", "Acme").unwrap();

        let report = init_project(&parent, &identity, PluginKind::Synth, false).unwrap();
        let root = parent.join("MySynth");
        assert_eq!(report.root, root);

        for dir in PROJECT_DIRS {
            assert!(root.join(dir).is_dir(), "missing {dir}");
        }
        for file in [
            "CMakeLists.txt",
            "Source/PluginProcessor.cpp",
            "Source/PluginProcessor.h",
            "Source/PluginEditor.cpp",
            "Source/PluginEditor.h",
        ] {
            assert!(root.join(file).is_file(), "missing {file}");
        }
        for marker in RETENTION_MARKERS {
            assert_eq!(fs::metadata(root.join(marker)).unwrap().len(), 0);
        }
        assert_eq!(report.files.len(), 7);

        let cmake = fs::read_to_string(root.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("project(MySynth VERSION 1.0.0)"));
        assert!(cmake.contains("COMPANY_NAME \"Acme\""));
        assert!(cmake.contains("IS_SYNTH TRUE"));
        assert!(cmake.contains("NEEDS_MIDI_INPUT TRUE"));
        assert!(cmake.contains("PLUGIN_MANUFACTURER_CODE \"ACME\""));
        assert!(cmake.contains("PLUGIN_CODE \"MYSY\""));
        assert!(cmake.contains("PRODUCT_NAME \"My Synth!\""));
        assert!(cmake.contains("${DSP_SOURCES}"));

        let editor = fs::read_to_string(root.join("Source/PluginEditor.cpp")).unwrap();
        assert!(editor.contains("MySynthAudioProcessorEditor::MySynthAudioProcessorEditor"));
        assert!(editor.contains("drawFittedText (\"My Synth!\""));
    }

    #[test]
    fn effect_project_disables_midi() {
        let (_tmp, parent) = temp_root();
        let identity = ProjectIdentity::new("Tape_Delay", "VibeVST").unwrap();
        init_project(&parent, &identity, PluginKind::Effect, false).unwrap();

        let root = parent.join("Tape_Delay");
        let cmake = fs::read_to_string(root.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("IS_SYNTH FALSE"));
        assert!(cmake.contains("NEEDS_MIDI_INPUT FALSE"));

        let header = fs::read_to_string(root.join("Source/PluginProcessor.h")).unwrap();
        assert!(header.contains("class TapeDelayAudioProcessor"));
    }

    #[test]
    fn rerun_overwrites_generated_files_and_keeps_user_files() {
        let (_tmp, parent) = temp_root();
        let identity = ProjectIdentity::new("Chorus", "Acme").unwrap();
        init_project(&parent, &identity, PluginKind::Effect, false).unwrap();

        let root = parent.join("Chorus");
        fs::write(root.join("Source/PluginEditor.h"), "edited").unwrap();
        fs::write(root.join("Source/DSP/Lfo.h"), "// user code").unwrap();

        init_project(&parent, &identity, PluginKind::Effect, false).unwrap();
        assert_ne!(fs::read_to_string(root.join("Source/PluginEditor.h")).unwrap(), "edited");
        assert_eq!(fs::read_to_string(root.join("Source/DSP/Lfo.h")).unwrap(), "// user code");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (_tmp, parent) = temp_root();
        let identity = ProjectIdentity::new("Ghost", "Acme").unwrap();
        let report = init_project(&parent, &identity, PluginKind::Effect, true).unwrap();
        assert_eq!(report.dirs.len(), PROJECT_DIRS.len());
        assert!(!parent.join("Ghost").exists());
    }
}
