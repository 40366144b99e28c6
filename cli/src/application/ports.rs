//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::Result;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Status and body of a management API response.
///
/// 401 never reaches this type; the client turns it into
/// `ApiError::Authentication`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// `true` for any 2xx status.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `true` when the JSON body carries `"status": "ERROR"`.
    ///
    /// The create endpoint can report failure this way under a 2xx status.
    #[must_use]
    pub fn reports_error(&self) -> bool {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .is_ok_and(|v| v.get("status").and_then(serde_json::Value::as_str) == Some("ERROR"))
    }
}

/// Result of an existence query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Exists,
    Absent,
    /// The query neither confirmed nor ruled out the resource.
    Unknown { status: u16 },
}

impl Presence {
    /// Interpret the status of a `GET` on a single resource.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Exists,
            404 => Self::Absent,
            status => Self::Unknown { status },
        }
    }

    /// Interpret a filesystem existence check.
    #[must_use]
    pub fn from_exists(exists: bool) -> Self {
        if exists { Self::Exists } else { Self::Absent }
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner {
    /// Run a program to completion with inherited stdio and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the local filesystem operations the pipeline performs.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

// ── Webapps API Port ──────────────────────────────────────────────────────────

/// The hosting provider's webapps collection for the current user.
///
/// Implementations return the raw response; callers decide what a non-2xx
/// status means.
pub trait WebappApi {
    /// `GET webapps/<domain>/`.
    fn get_webapp(&self, domain: &str) -> Result<ApiResponse>;
    /// `DELETE webapps/<domain>/`.
    fn delete_webapp(&self, domain: &str) -> Result<ApiResponse>;
    /// `POST webapps/` with the domain and the API's python version name.
    fn create_webapp(&self, domain: &str, python_version: &str) -> Result<ApiResponse>;
    /// `PATCH webapps/<domain>/` with form fields.
    fn patch_webapp(&self, domain: &str, fields: &[(&str, &str)]) -> Result<ApiResponse>;
    /// `POST webapps/<domain>/static_files/` mapping `url` to `path`.
    fn add_static_file(&self, domain: &str, url: &str, path: &str) -> Result<ApiResponse>;
    /// `POST webapps/<domain>/reload/`.
    fn reload_webapp(&self, domain: &str) -> Result<ApiResponse>;
}

// ── Asset Port ────────────────────────────────────────────────────────────────

/// Abstracts access to assets shipped with the binary.
pub trait AssetSource {
    /// Get the raw bytes of a single embedded asset.
    ///
    /// # Errors
    ///
    /// Returns an error if no asset with that name exists.
    fn get_asset(&self, name: &str) -> Result<&'static [u8]>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
