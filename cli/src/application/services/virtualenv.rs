//! Application service: virtualenv provisioning through virtualenvwrapper.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::services::run_checked;
use crate::domain::{Config, DjangoVersion, PythonVersion, virtualenv_command};

/// Create the virtualenv `name` and install Django into it.
///
/// virtualenvwrapper commands are shell functions, so they run inside
/// `bash -c` after sourcing `virtualenvwrapper.sh`.
///
/// # Errors
///
/// Returns `CommandError::Failed` if the shell line exits non-zero (including
/// a failed `rmvirtualenv` in nuke mode).
pub fn create_virtualenv(
    runner: &impl CommandRunner,
    config: &Config,
    reporter: &impl ProgressReporter,
    name: &str,
    python: PythonVersion,
    django: &DjangoVersion,
    nuke: bool,
) -> Result<PathBuf> {
    reporter.step(&format!(
        "creating virtualenv with Python {python} and Django {django}..."
    ));
    let script = format!(
        "source virtualenvwrapper.sh && {}",
        virtualenv_command(name, python, django, nuke)
    );
    run_checked(runner, "bash", &["-c", script.as_str()]).context("creating virtualenv")?;
    Ok(config.virtualenv_path(name))
}
