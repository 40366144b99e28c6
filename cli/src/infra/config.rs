//! Loads [`Config`] from the process environment.
//!
//! This is the only place the pipeline's settings are read from the
//! environment; everything downstream receives the built `Config`.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Config;
use crate::domain::config::{DEFAULT_PA_DOMAIN, api_endpoint_template, api_hostname};

/// Raw environment variables, as deserialized by `envy`.
#[derive(Debug, Default, Deserialize)]
pub struct EnvConfig {
    pub api_token: Option<String>,
    pub workon_home: Option<PathBuf>,
    pub pythonanywhere_site: Option<String>,
    pub pythonanywhere_domain: Option<String>,
    pub pythonanywhere_insecure_api: Option<String>,
    pub logname: Option<String>,
    pub user: Option<String>,
    pub lname: Option<String>,
    pub username: Option<String>,
}

/// Read the environment and build the startup configuration.
///
/// # Errors
///
/// Returns an error if the environment cannot be deserialized, the home
/// directory is unknown, or no user name variable is set.
pub fn load_config() -> Result<Config> {
    let env: EnvConfig = envy::from_iter(utf8_vars(std::env::vars_os()))
        .context("reading configuration from environment")?;
    build_config(env, dirs::home_dir())
}

/// Keep only variables whose name and value are valid UTF-8.
///
/// Unrelated non-UTF-8 variables are skipped instead of aborting startup.
fn utf8_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Build a [`Config`] from already-read environment values.
///
/// # Errors
///
/// Returns an error if `home_dir` is `None` or no user name is available.
pub fn build_config(env: EnvConfig, home_dir: Option<PathBuf>) -> Result<Config> {
    let home_dir = home_dir.ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    let username = [env.logname, env.user, env.lname, env.username]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .context("cannot determine current user: set LOGNAME or USER")?;

    let hostname = api_hostname(
        non_empty(env.pythonanywhere_site.as_deref()),
        non_empty(env.pythonanywhere_domain.as_deref()),
    );
    let pa_domain = non_empty(env.pythonanywhere_domain.as_deref())
        .unwrap_or(DEFAULT_PA_DOMAIN)
        .to_string();
    let workon_home = env
        .workon_home
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| home_dir.join(".virtualenvs"));

    Ok(Config {
        api_token: env.api_token.filter(|t| !t.is_empty()),
        api_endpoint: api_endpoint_template(&hostname),
        pa_domain,
        insecure_api: env.pythonanywhere_insecure_api.as_deref() == Some("true"),
        username,
        home_dir,
        workon_home,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
