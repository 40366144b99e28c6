//! WSGI entry point rendering.

/// Embedded asset holding the entry point template.
pub const WSGI_TEMPLATE: &str = "wsgi_file_template.py";

/// The template's single substitution point.
pub const PROJECT_PATH_PLACEHOLDER: &str = "{project_path}";

/// Substitute `project_path` into `template`.
#[must_use]
pub fn render_wsgi(template: &str, project_path: &str) -> String {
    template.replace(PROJECT_PATH_PLACEHOLDER, project_path)
}
