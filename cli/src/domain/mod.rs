//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process` or `std::net`.
//! All functions take data in and return data out.

pub mod config;
pub mod error;
pub mod settings;
pub mod webapp;
pub mod wsgi;

pub use config::Config;
pub use error::{ApiError, CommandError, DomainError, SanityError, SettingsError, WebappError};
pub use settings::{SettingsPatch, patch_settings};
pub use webapp::{
    DjangoVersion, PythonVersion, resolve_domain, validate_domain, virtualenv_command,
    wsgi_file_path,
};
pub use wsgi::render_wsgi;
