//! Webapp domain types and pure derivation functions.
//!
//! Everything keyed by the domain name (virtualenv, project folder, WSGI file,
//! remote record) is derived here without touching the filesystem.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// Placeholder accepted for `--domain`; replaced by the user's free domain.
pub const DEFAULT_DOMAIN_PLACEHOLDER: &str = "your-username.pythonanywhere.com";

/// Name passed to `django-admin startproject`.
pub const PROJECT_NAME: &str = "mysite";

/// Directory holding the WSGI entry points served by the host.
pub const WSGI_DIR: &str = "/var/www";

/// Supported interpreter versions and the names the API expects for them.
pub const PYTHON_VERSIONS: &[(&str, &str)] = &[
    ("2.7", "python27"),
    ("3.4", "python34"),
    ("3.5", "python35"),
    ("3.6", "python36"),
    ("3.7", "python37"),
    ("3.8", "python38"),
];

#[allow(clippy::expect_used)] // Compile-time constant pattern
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_-]*[A-Za-z0-9_])?(\.[A-Za-z0-9_]([A-Za-z0-9_-]*[A-Za-z0-9_])?)*$")
        .expect("valid domain regex")
});

#[allow(clippy::expect_used)] // Compile-time constant pattern
static DJANGO_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9A-Za-z]+)*$").expect("valid version regex")
});

// ── Python version ────────────────────────────────────────────────────────────

/// A Python version from [`PYTHON_VERSIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    version: &'static str,
    api_name: &'static str,
}

impl PythonVersion {
    /// Dotted version, e.g. `3.8`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.version
    }

    /// Name used by the webapps API, e.g. `python38`.
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        self.api_name
    }

    /// System interpreter handed to `mkvirtualenv --python`.
    #[must_use]
    pub fn interpreter(&self) -> String {
        format!("/usr/bin/python{}", self.version)
    }
}

impl FromStr for PythonVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PYTHON_VERSIONS
            .iter()
            .find(|(version, _)| *version == s)
            .map(|&(version, api_name)| Self { version, api_name })
            .ok_or_else(|| DomainError::UnsupportedPython {
                version: s.to_string(),
                valid: PYTHON_VERSIONS
                    .iter()
                    .map(|(v, _)| *v)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version)
    }
}

// ── Django version ────────────────────────────────────────────────────────────

/// Requested Django release: the `latest` sentinel or an exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DjangoVersion {
    Latest,
    Exact(String),
}

impl DjangoVersion {
    /// Requirement string handed to `pip install`.
    #[must_use]
    pub fn requirement(&self) -> String {
        match self {
            Self::Latest => "django".to_string(),
            Self::Exact(version) => format!("django=={version}"),
        }
    }
}

impl FromStr for DjangoVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "latest" {
            return Ok(Self::Latest);
        }
        if DJANGO_VERSION_RE.is_match(s) {
            Ok(Self::Exact(s.to_string()))
        } else {
            Err(DomainError::InvalidDjangoVersion(s.to_string()))
        }
    }
}

impl fmt::Display for DjangoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

// ── Domain name ───────────────────────────────────────────────────────────────

/// Replace the placeholder domain with `<user>.<pa_domain>`.
///
/// Any other value is returned unchanged.
#[must_use]
pub fn resolve_domain(requested: &str, username: &str, pa_domain: &str) -> String {
    if requested == DEFAULT_DOMAIN_PLACEHOLDER {
        format!("{}.{pa_domain}", username.to_lowercase())
    } else {
        requested.to_string()
    }
}

/// Check that `domain` is usable both as a path component and an API key.
///
/// # Errors
///
/// Returns `DomainError::InvalidDomain` if the domain is empty, too long, or
/// contains anything other than hostname characters.
pub fn validate_domain(domain: &str) -> Result<(), DomainError> {
    if domain.len() > 253 || !DOMAIN_RE.is_match(domain) {
        return Err(DomainError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}

/// WSGI entry point for `domain`: dots become underscores.
#[must_use]
pub fn wsgi_file_path(domain: &str) -> PathBuf {
    PathBuf::from(WSGI_DIR).join(format!("{}_wsgi.py", domain.replace('.', "_")))
}

/// virtualenvwrapper command line creating the environment and installing Django.
///
/// In nuke mode the existing environment is removed first; a failing
/// `rmvirtualenv` aborts the whole line.
#[must_use]
pub fn virtualenv_command(
    name: &str,
    python: PythonVersion,
    django: &DjangoVersion,
    nuke: bool,
) -> String {
    let create = format!(
        "mkvirtualenv --python={} {name} && pip install {}",
        python.interpreter(),
        django.requirement()
    );
    if nuke {
        format!("rmvirtualenv {name} && {create}")
    } else {
        create
    }
}
