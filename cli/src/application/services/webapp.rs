//! Application service: remote webapp registration, static mappings, reload.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, WebappApi};
use crate::domain::PythonVersion;
use crate::domain::error::WebappError;

/// URL prefixes served straight from the project folder.
pub const STATIC_FILE_MAPPINGS: &[(&str, &str)] = &[("/static/", "static"), ("/media/", "media")];

/// Create the webapp record for `domain` and point it at the virtualenv.
///
/// In nuke mode any existing record is deleted first. The delete response is
/// not inspected: a missing record and a failed delete look the same.
///
/// # Errors
///
/// Returns `WebappError::CreateFailed` if the create call fails or its body
/// reports an error, `WebappError::PatchFailed` if the virtualenv patch fails,
/// or any transport/authentication error.
pub fn create_webapp(
    api: &impl WebappApi,
    reporter: &impl ProgressReporter,
    domain: &str,
    python: PythonVersion,
    virtualenv_path: &Path,
    nuke: bool,
) -> Result<()> {
    reporter.step("creating web app via API...");
    if nuke {
        let response = api
            .delete_webapp(domain)
            .context("deleting existing webapp")?;
        tracing::debug!(status = response.status, "delete webapp response ignored");
    }

    let response = api
        .create_webapp(domain, python.api_name())
        .context("creating webapp")?;
    if !response.is_ok() || response.reports_error() {
        return Err(WebappError::CreateFailed {
            status: response.status,
            body: response.body,
        }
        .into());
    }

    let virtualenv = virtualenv_path.to_string_lossy().into_owned();
    let response = api
        .patch_webapp(domain, &[("virtualenv_path", virtualenv.as_str())])
        .context("setting virtualenv path")?;
    if !response.is_ok() {
        return Err(WebappError::PatchFailed {
            status: response.status,
            body: response.body,
        }
        .into());
    }
    Ok(())
}

/// Map `/static/` and `/media/` to folders inside the project.
///
/// Mappings are created unconditionally; re-running against a record that
/// already has them is left to the provider.
///
/// # Errors
///
/// Returns `WebappError::StaticMappingFailed` on the first non-2xx response.
pub fn add_static_file_mappings(
    api: &impl WebappApi,
    reporter: &impl ProgressReporter,
    domain: &str,
    project_path: &Path,
) -> Result<()> {
    reporter.step("adding static files mappings for /static/ and /media/...");
    for (url, folder) in STATIC_FILE_MAPPINGS {
        let path = project_path.join(folder);
        let response = api
            .add_static_file(domain, url, &path.to_string_lossy())
            .with_context(|| format!("adding static files mapping for {url}"))?;
        if !response.is_ok() {
            return Err(WebappError::StaticMappingFailed {
                url: (*url).to_string(),
                status: response.status,
                body: response.body,
            }
            .into());
        }
    }
    Ok(())
}

/// Reload the webapp so the new configuration is served.
///
/// # Errors
///
/// Returns `WebappError::ReloadFailed` on a non-2xx response.
pub fn reload_webapp(
    api: &impl WebappApi,
    reporter: &impl ProgressReporter,
    domain: &str,
) -> Result<()> {
    reporter.step(&format!("reloading {domain} via API..."));
    let response = api.reload_webapp(domain).context("reloading webapp")?;
    if !response.is_ok() {
        return Err(WebappError::ReloadFailed {
            status: response.status,
            body: response.body,
        }
        .into());
    }
    Ok(())
}
