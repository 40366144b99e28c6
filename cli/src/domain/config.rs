//! Runtime configuration, resolved once at startup and passed by reference.
//!
//! Pure data only: reading the process environment lives in
//! `crate::infra::config`.

use std::path::PathBuf;

/// Hosting domain used when neither `PYTHONANYWHERE_SITE` nor
/// `PYTHONANYWHERE_DOMAIN` is set.
pub const DEFAULT_PA_DOMAIN: &str = "pythonanywhere.com";

/// Everything the pipeline needs from its surroundings.
#[derive(Debug, Clone)]
pub struct Config {
    /// API token (`API_TOKEN`). `None` when unset or empty.
    pub api_token: Option<String>,
    /// Endpoint template containing `{username}` and `{flavor}` placeholders.
    pub api_endpoint: String,
    /// Hosting domain, e.g. `pythonanywhere.com` or `eu.pythonanywhere.com`.
    pub pa_domain: String,
    /// Skip TLS certificate verification for API calls.
    pub insecure_api: bool,
    /// Current OS user; owner of every remote record.
    pub username: String,
    /// Home directory: project folders live directly under it.
    pub home_dir: PathBuf,
    /// virtualenvwrapper's `WORKON_HOME`.
    pub workon_home: PathBuf,
}

impl Config {
    /// Deterministic virtualenv location for `name`.
    #[must_use]
    pub fn virtualenv_path(&self, name: &str) -> PathBuf {
        self.workon_home.join(name)
    }

    /// Deterministic project folder for `domain`.
    #[must_use]
    pub fn project_folder(&self, domain: &str) -> PathBuf {
        self.home_dir.join(domain)
    }

    /// Fill the endpoint template for one resource collection.
    #[must_use]
    pub fn api_url(&self, flavor: &str) -> String {
        self.api_endpoint
            .replace("{username}", &self.username)
            .replace("{flavor}", flavor)
    }
}

/// Resolve the API hostname from the optional site and domain overrides.
///
/// `site` wins outright; otherwise the hostname is `www.` + `domain`.
#[must_use]
pub fn api_hostname(site: Option<&str>, domain: Option<&str>) -> String {
    match site {
        Some(site) => site.to_string(),
        None => format!("www.{}", domain.unwrap_or(DEFAULT_PA_DOMAIN)),
    }
}

/// Build the endpoint template for a hostname.
#[must_use]
pub fn api_endpoint_template(hostname: &str) -> String {
    format!("https://{hostname}/api/v0/user/{{username}}/{{flavor}}/")
}
