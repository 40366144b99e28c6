//! Application service: the full "start a Django webapp" pipeline.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{AssetSource, CommandRunner, LocalFs, ProgressReporter, WebappApi};
use crate::application::services::{project, sanity, virtualenv, webapp, wsgi};
use crate::domain::{
    Config, DjangoVersion, PythonVersion, resolve_domain, validate_domain, wsgi_file_path,
};

/// Per-invocation inputs to [`start_webapp`], as given on the command line.
pub struct StartOptions<'a, R: ProgressReporter> {
    /// Receives step and warning lines as the pipeline runs.
    pub reporter: &'a R,
    /// Requested domain; the placeholder default is resolved here.
    pub domain: &'a str,
    pub django: &'a DjangoVersion,
    pub python: PythonVersion,
    /// Destroy any existing virtualenv, project folder and webapp first.
    pub nuke: bool,
}

/// What the pipeline created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub domain: String,
    pub virtualenv_path: PathBuf,
    pub project_path: PathBuf,
    pub wsgi_file_path: PathBuf,
}

/// Provision a virtualenv and Django project for a domain and serve it.
///
/// Steps run strictly in order and the first failure aborts the pipeline
/// without compensation; re-running with `nuke` is the recovery path.
///
/// # Errors
///
/// Returns the first error raised by any step: an invalid domain, a sanity
/// conflict, a failed subprocess, an unrecognised settings file, or a failed
/// API call.
pub fn start_webapp(
    runner: &impl CommandRunner,
    local_fs: &impl LocalFs,
    api: &impl WebappApi,
    assets: &impl AssetSource,
    config: &Config,
    opts: StartOptions<'_, impl ProgressReporter>,
) -> Result<StartOutcome> {
    let StartOptions {
        reporter,
        domain,
        django,
        python,
        nuke,
    } = opts;
    let domain = resolve_domain(domain, &config.username, &config.pa_domain);
    validate_domain(&domain)?;
    tracing::info!(%domain, %python, %django, nuke, "starting webapp pipeline");

    sanity::sanity_checks(api, local_fs, config, reporter, &domain, nuke)?;
    reporter.success("sanity checks passed");

    let virtualenv_path =
        virtualenv::create_virtualenv(runner, config, reporter, &domain, python, django, nuke)?;
    reporter.success(&format!("virtualenv ready at {}", virtualenv_path.display()));

    let project_path = project::start_django_project(
        runner,
        local_fs,
        config,
        reporter,
        &domain,
        &virtualenv_path,
        nuke,
    )?;
    project::update_settings_file(local_fs, reporter, &domain, &project_path)?;
    project::run_collectstatic(runner, reporter, &virtualenv_path, &project_path)?;
    reporter.success(&format!("Django project ready at {}", project_path.display()));

    webapp::create_webapp(api, reporter, &domain, python, &virtualenv_path, nuke)?;
    webapp::add_static_file_mappings(api, reporter, &domain, &project_path)?;

    let wsgi_file_path = wsgi_file_path(&domain);
    wsgi::update_wsgi_file(assets, local_fs, reporter, &wsgi_file_path, &project_path)?;

    webapp::reload_webapp(api, reporter, &domain)?;
    reporter.success(&format!("{domain} reloaded"));

    Ok(StartOutcome {
        domain,
        virtualenv_path,
        project_path,
        wsgi_file_path,
    })
}
