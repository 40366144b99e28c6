//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process` or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

// ── API errors ────────────────────────────────────────────────────────────────

/// Errors raised by the management API client itself.
///
/// Non-2xx responses other than 401 are not errors at this level; the caller
/// inspects the returned status and decides.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Oops, you don't seem to have an API token. \
Please go to the 'Account' page on PythonAnywhere, then to the 'API Token' tab. \
Click the 'Create a new API token' button to create the token, then start a new \
console and try running this command again."
    )]
    NoToken,

    #[error("Authentication error {status} calling API: {body}")]
    Authentication { status: u16, body: String },

    #[error("cannot reach {url}: {message}")]
    Transport { url: String, message: String },
}

// ── Sanity errors ─────────────────────────────────────────────────────────────

/// A resource keyed by the domain already exists and `--nuke` was not given.
#[derive(Debug, Error)]
pub enum SanityError {
    #[error("You already have a webapp for {domain}.\n\nUse the --nuke option if you want to replace it.")]
    WebappExists { domain: String },

    #[error(
        "You already have a virtualenv for {domain} at {}.\n\nUse the --nuke option if you want to replace it.",
        path.display()
    )]
    VirtualenvExists { domain: String, path: PathBuf },

    #[error(
        "You already have a project folder at {}.\n\nUse the --nuke option if you want to replace it.",
        path.display()
    )]
    ProjectFolderExists { path: PathBuf },
}

// ── Webapp registration errors ────────────────────────────────────────────────

/// The API answered a registration or reload call with a failure.
#[derive(Debug, Error)]
pub enum WebappError {
    #[error("POST to create webapp via API failed, got HTTP {status}: {body}")]
    CreateFailed { status: u16, body: String },

    #[error("PATCH to set virtualenv path via API failed, got HTTP {status}: {body}")]
    PatchFailed { status: u16, body: String },

    #[error("POST to add static files mapping for {url} via API failed, got HTTP {status}: {body}")]
    StaticMappingFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("POST to reload webapp via API failed, got HTTP {status}: {body}")]
    ReloadFailed { status: u16, body: String },
}

// ── Subprocess errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{command}` failed ({status})")]
    Failed { command: String, status: ExitStatus },
}

// ── Settings errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(
        "could not find `ALLOWED_HOSTS = []` in {}; the Django project template may have changed",
        path.display()
    )]
    AllowedHostsNotFound { path: PathBuf },
}

// ── Input validation errors ───────────────────────────────────────────────────

/// Errors related to user-supplied domain, Python and Django values.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid domain '{0}': expected a hostname such as www.example.com")]
    InvalidDomain(String),

    #[error("Unsupported Python version '{version}'. Valid versions: {valid}")]
    UnsupportedPython { version: String, valid: String },

    #[error("Invalid Django version '{0}': expected 'latest' or a version such as 1.8.4")]
    InvalidDjangoVersion(String),
}
