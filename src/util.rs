/// Shared filesystem and subprocess helpers.
pub mod fs {
    use std::fs;
    use std::io;
    use std::path::Path;

    /// Ensure a directory exists, creating it recursively if needed.
    pub fn ensure_dir(path: &Path) -> io::Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Create an empty file, truncating one that already exists.
    pub fn touch(path: &Path) -> io::Result<()> {
        fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map(|_| ())
    }
}

pub mod process {
    use std::process::{Command, ExitStatus};

    use anyhow::{Context, Result, bail};
    use camino::Utf8Path;
    use tracing::debug;

    /// Run `argv` in `cwd`, inheriting the console, and wait for it to exit.
    pub fn run_process(argv: &[String], cwd: &Utf8Path) -> Result<ExitStatus> {
        let Some((program, args)) = argv.split_first() else {
            bail!("invalid command: empty argv");
        };
        debug!(command = %format_command(argv), %cwd, "spawning");
        Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("executing `{}`", format_command(argv)))
    }

    /// Run `argv` and fail unless it exits successfully.
    pub fn run_checked(argv: &[String], cwd: &Utf8Path) -> Result<()> {
        let status = run_process(argv, cwd)?;
        if status.success() {
            Ok(())
        } else {
            bail!(
                "command `{}` failed with exit code {:?}",
                format_command(argv),
                status.code()
            )
        }
    }

    pub fn format_command(argv: &[String]) -> String {
        argv.iter()
            .map(|arg| {
                if arg.chars().any(|c| c.is_whitespace()) {
                    let escaped = arg.replace('"', "\\\"");
                    format!("\"{}\"", escaped)
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether `program` resolves on `PATH`.
    pub fn is_available(program: &str) -> bool {
        which::which(program).is_ok()
    }

}
