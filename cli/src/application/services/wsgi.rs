//! Application service: WSGI entry point generation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{AssetSource, LocalFs, ProgressReporter};
use crate::domain::render_wsgi;
use crate::domain::wsgi::WSGI_TEMPLATE;

/// Render the embedded template for `project_path` and overwrite `wsgi_file_path`.
///
/// # Errors
///
/// Returns an error if the template is missing or not UTF-8, or the file
/// cannot be written.
pub fn update_wsgi_file(
    assets: &impl AssetSource,
    local_fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    wsgi_file_path: &Path,
    project_path: &Path,
) -> Result<()> {
    reporter.step(&format!("updating wsgi file at {}...", wsgi_file_path.display()));
    let template = std::str::from_utf8(assets.get_asset(WSGI_TEMPLATE)?)
        .context("wsgi template is not valid UTF-8")?;
    let content = render_wsgi(template, &project_path.to_string_lossy());
    local_fs.write(wsgi_file_path, &content)
}
