//! Application service: pre-flight checks.
//!
//! Runs before anything is mutated and performs no mutating calls.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, Presence, ProgressReporter, WebappApi};
use crate::domain::Config;
use crate::domain::error::{ApiError, SanityError};

/// Fail if the API token is missing, or if anything keyed by `domain` already
/// exists and `nuke` is not set.
///
/// # Errors
///
/// Returns `ApiError::NoToken` without a token, `SanityError` on the first
/// conflicting resource, or any error raised while querying the API.
pub fn sanity_checks(
    api: &impl WebappApi,
    local_fs: &impl LocalFs,
    config: &Config,
    reporter: &impl ProgressReporter,
    domain: &str,
    nuke: bool,
) -> Result<()> {
    reporter.step("running sanity checks...");
    if config.api_token.is_none() {
        return Err(ApiError::NoToken.into());
    }
    if nuke {
        return Ok(());
    }

    let response = api
        .get_webapp(domain)
        .context("checking for an existing webapp")?;
    match Presence::from_status(response.status) {
        Presence::Exists => {
            return Err(SanityError::WebappExists {
                domain: domain.to_string(),
            }
            .into());
        }
        Presence::Unknown { status } => reporter.warn(&format!(
            "could not confirm whether a webapp exists for {domain} (HTTP {status}), continuing"
        )),
        Presence::Absent => {}
    }

    let virtualenv = config.virtualenv_path(domain);
    if Presence::from_exists(local_fs.exists(&virtualenv)) == Presence::Exists {
        return Err(SanityError::VirtualenvExists {
            domain: domain.to_string(),
            path: virtualenv,
        }
        .into());
    }

    let project = config.project_folder(domain);
    if Presence::from_exists(local_fs.exists(&project)) == Presence::Exists {
        return Err(SanityError::ProjectFolderExists { path: project }.into());
    }

    Ok(())
}
