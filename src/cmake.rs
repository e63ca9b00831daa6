use std::fmt;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use tracing::debug;
use walkdir::WalkDir;

use crate::ui;
use crate::util::process;

pub const DESCRIPTOR: &str = "CMakeLists.txt";
pub const BUILD_DIR: &str = "build";
pub const ARTIFACT_EXTENSION: &str = "vst3";

#[derive(ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BuildConfig {
    #[value(name = "Debug")]
    Debug,
    #[default]
    #[value(name = "Release")]
    Release,
}

impl BuildConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// CMake executable, looked up on `PATH` unless it is a path.
    pub cmake: String,
    pub config: BuildConfig,
    pub clean: bool,
    pub dry_run: bool,
}

pub fn configure_argv(cmake: &str, config: BuildConfig, juce_path: &Utf8Path) -> Vec<String> {
    vec![
        cmake.to_owned(),
        "-B".to_owned(),
        BUILD_DIR.to_owned(),
        "-G".to_owned(),
        "Ninja".to_owned(),
        format!("-DCMAKE_BUILD_TYPE={}", config),
        format!("-DJUCE_DIR={}", juce_path),
    ]
}

pub fn build_argv(cmake: &str, config: BuildConfig) -> Vec<String> {
    vec![
        cmake.to_owned(),
        "--build".to_owned(),
        BUILD_DIR.to_owned(),
        "--config".to_owned(),
        config.to_string(),
        "-j".to_owned(),
    ]
}

/// Fail early, before any side effect, when `project` has no descriptor.
pub fn require_descriptor(project: &Utf8Path) -> Result<Utf8PathBuf> {
    let descriptor = project.join(DESCRIPTOR);
    if !descriptor.is_file() {
        bail!(
            "no {} found in {}\nRun `vibevst init <name>` first, or cd into a project folder.",
            DESCRIPTOR,
            project
        );
    }
    Ok(descriptor)
}

/// Configure and compile the project in `project`, returning the produced plugin bundles.
pub fn build(project: &Utf8Path, juce_path: &Utf8Path, options: &BuildOptions) -> Result<Vec<Utf8PathBuf>> {
    require_descriptor(project)?;
    let build_dir = project.join(BUILD_DIR);
    let configure = configure_argv(&options.cmake, options.config, juce_path);
    let compile = build_argv(&options.cmake, options.config);

    if options.dry_run {
        if options.clean && build_dir.exists() {
            println!("[dry-run] would remove {}", build_dir);
        }
        println!("[dry-run] {}", process::format_command(&configure));
        println!("[dry-run] {}", process::format_command(&compile));
        return Ok(Vec::new());
    }

    if options.clean && build_dir.exists() {
        ui::warn("Cleaning build directory...");
        fs::remove_dir_all(&build_dir).with_context(|| format!("removing {}", build_dir))?;
    }

    ui::step("Step 1: Configuring CMake...");
    process::run_checked(&configure, project).context("CMake configuration failed")?;

    ui::step("Step 2: Building...");
    process::run_checked(&compile, project).context("Build failed")?;

    let artifacts = find_artifacts(&build_dir);
    debug!(count = artifacts.len(), config = %options.config, "build finished");
    Ok(artifacts)
}

/// Collect `*.vst3` entries below `root`. VST3 plugins are usually bundle
/// directories, so a match is reported once and not descended into.
pub fn find_artifacts(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "skipping unreadable entry");
                continue;
            }
        };

        let is_artifact = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == ARTIFACT_EXTENSION);
        if !is_artifact {
            continue;
        }

        if entry.file_type().is_dir() {
            walker.skip_current_dir();
        }
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => found.push(path),
            Err(path) => debug!(path = %path.display(), "skipping non UTF-8 artifact path"),
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    fn options(clean: bool, dry_run: bool) -> BuildOptions {
        BuildOptions {
            cmake: "cmake".to_owned(),
            config: BuildConfig::Release,
            clean,
            dry_run,
        }
    }

    #[test]
    fn configure_command_targets_ninja_and_juce() {
        let argv = configure_argv("cmake", BuildConfig::Debug, Utf8Path::new("/opt/JUCE"));
        assert_eq!(
            argv,
            [
                "cmake",
                "-B",
                "build",
                "-G",
                "Ninja",
                "-DCMAKE_BUILD_TYPE=Debug",
                "-DJUCE_DIR=/opt/JUCE"
            ]
        );
    }

    #[test]
    fn build_command_uses_config() {
        assert_eq!(
            build_argv("cmake", BuildConfig::Release),
            ["cmake", "--build", "build", "--config", "Release", "-j"]
        );
    }

    #[test]
    fn missing_descriptor_has_no_side_effects() {
        let (_tmp, project) = temp_project();
        let err = build(&project, Utf8Path::new("/opt/JUCE"), &options(true, false)).unwrap_err();
        assert!(err.to_string().contains("no CMakeLists.txt found"));
        assert!(err.to_string().contains("vibevst init"));
        assert_eq!(fs::read_dir(&project).unwrap().count(), 0);
    }

    #[test]
    fn dry_run_keeps_existing_build_dir() {
        let (_tmp, project) = temp_project();
        fs::write(project.join(DESCRIPTOR), "project(X)\n").unwrap();
        fs::create_dir_all(project.join(BUILD_DIR)).unwrap();

        let artifacts = build(&project, Utf8Path::new("/opt/JUCE"), &options(true, true)).unwrap();
        assert!(artifacts.is_empty());
        assert!(project.join(BUILD_DIR).is_dir());
    }

    #[test]
    fn finds_bundles_and_files_without_descending() {
        let (_tmp, project) = temp_project();
        let build_dir = project.join(BUILD_DIR);
        let bundle = build_dir.join("Fuzz_artefacts/Release/VST3/Fuzz.vst3");
        fs::create_dir_all(bundle.join("Contents/x86_64-linux")).unwrap();
        fs::write(bundle.join("Contents/x86_64-linux/Inner.vst3"), b"").unwrap();
        fs::write(build_dir.join("Loose.vst3"), b"").unwrap();
        fs::write(build_dir.join("notes.txt"), b"").unwrap();

        let artifacts = find_artifacts(&build_dir);
        assert_eq!(artifacts, vec![bundle, build_dir.join("Loose.vst3")]);
    }

    #[test]
    fn empty_or_missing_build_tree_yields_nothing() {
        let (_tmp, project) = temp_project();
        assert!(find_artifacts(&project.join(BUILD_DIR)).is_empty());
    }

    /// Write an executable stand-in for cmake that logs each call next to itself.
    #[cfg(unix)]
    fn fake_cmake(dir: &Utf8Path, body: &str) -> (Utf8PathBuf, Utf8PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("cmake");
        let log = bin.join("calls.log");
        fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> \"{}\"\n{}\n", log, body),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    #[cfg(unix)]
    fn build_with(project: &Utf8Path, cmake: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let options = BuildOptions {
            cmake: cmake.to_string(),
            ..options(false, false)
        };
        build(project, Utf8Path::new("/opt/JUCE"), &options)
    }

    #[cfg(unix)]
    #[test]
    fn failed_configure_stops_before_compile() {
        let (_tmp, project) = temp_project();
        fs::write(project.join(DESCRIPTOR), "project(X)\n").unwrap();
        let (script, log) = fake_cmake(&project, "exit 3");

        let err = build_with(&project, &script).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("CMake configuration failed"), "{message}");
        assert!(message.contains("exit code Some(3)"), "{message}");

        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().count(), 1);
        assert!(calls.starts_with("-B build"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_compile_is_reported_after_configure() {
        let (_tmp, project) = temp_project();
        fs::write(project.join(DESCRIPTOR), "project(X)\n").unwrap();
        let (script, log) = fake_cmake(&project, "[ \"$1\" = \"-B\" ] && exit 0\nexit 4");

        let err = build_with(&project, &script).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Build failed"), "{message}");
        assert!(!message.contains("CMake configuration failed"), "{message}");

        let calls = fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].starts_with("--build build"));
    }

    #[cfg(unix)]
    #[test]
    fn successful_build_lists_artifacts() {
        let (_tmp, project) = temp_project();
        fs::write(project.join(DESCRIPTOR), "project(X)\n").unwrap();
        let bundle = project.join("build/X_artefacts/Release/VST3/X.vst3");
        fs::create_dir_all(&bundle).unwrap();
        let (script, _log) = fake_cmake(&project, "exit 0");

        assert_eq!(build_with(&project, &script).unwrap(), vec![bundle]);
    }

    #[test]
    fn release_is_the_default_config() {
        assert_eq!(BuildConfig::default(), BuildConfig::Release);
        assert_eq!(BuildConfig::from_str("Debug", false).unwrap(), BuildConfig::Debug);
    }
}
