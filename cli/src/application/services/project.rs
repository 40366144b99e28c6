//! Application service: Django project scaffolding, settings and static files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::run_checked;
use crate::domain::error::SettingsError;
use crate::domain::webapp::PROJECT_NAME;
use crate::domain::{Config, SettingsPatch, patch_settings};

/// Generate a fresh Django project in `~/<domain>`.
///
/// # Errors
///
/// Returns an error if the folder cannot be removed or created, or if
/// `django-admin startproject` exits non-zero.
pub fn start_django_project(
    runner: &impl CommandRunner,
    local_fs: &impl LocalFs,
    config: &Config,
    reporter: &impl ProgressReporter,
    domain: &str,
    virtualenv_path: &Path,
    nuke: bool,
) -> Result<PathBuf> {
    reporter.step("starting Django project...");
    let target = config.project_folder(domain);
    if nuke && local_fs.exists(&target) {
        local_fs.remove_dir_all(&target)?;
    }
    local_fs.create_dir(&target)?;

    let django_admin = virtualenv_path.join("bin").join("django-admin");
    let django_admin = django_admin.to_string_lossy().into_owned();
    let target_str = target.to_string_lossy().into_owned();
    run_checked(
        runner,
        &django_admin,
        &["startproject", PROJECT_NAME, target_str.as_str()],
    )
    .context("starting Django project")?;
    Ok(target)
}

/// Location of the generated settings module.
#[must_use]
pub fn settings_path(project_path: &Path) -> PathBuf {
    project_path.join(PROJECT_NAME).join("settings.py")
}

/// Allow `domain` and configure static/media roots in the project settings.
///
/// # Errors
///
/// Returns `SettingsError::AllowedHostsNotFound` if the file has neither the
/// generated empty `ALLOWED_HOSTS` nor a previous patch for `domain`, or an
/// I/O error reading or writing the file.
pub fn update_settings_file(
    local_fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    domain: &str,
    project_path: &Path,
) -> Result<()> {
    reporter.step("updating settings.py...");
    let path = settings_path(project_path);
    let settings = local_fs.read_to_string(&path)?;
    match patch_settings(&settings, domain) {
        SettingsPatch::Patched(content) => local_fs.write(&path, &content),
        SettingsPatch::AlreadyPatched => {
            reporter.warn(&format!("{} is already configured for {domain}", path.display()));
            Ok(())
        }
        SettingsPatch::Unrecognised => Err(SettingsError::AllowedHostsNotFound { path }.into()),
    }
}

/// Run `manage.py collectstatic --noinput` with the virtualenv's interpreter.
///
/// # Errors
///
/// Returns `CommandError::Failed` if collectstatic exits non-zero.
pub fn run_collectstatic(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    virtualenv_path: &Path,
    project_path: &Path,
) -> Result<()> {
    reporter.step("running collectstatic...");
    let python = virtualenv_path.join("bin").join("python");
    let python = python.to_string_lossy().into_owned();
    let manage = project_path.join("manage.py");
    let manage = manage.to_string_lossy().into_owned();
    run_checked(
        runner,
        &python,
        &[manage.as_str(), "collectstatic", "--noinput"],
    )
    .context("collecting static files")
}
