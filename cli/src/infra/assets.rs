//! Embedded assets: static files compiled into the CLI binary.
//!
//! At compile time, `include_dir!` embeds everything under `cli/assets/`:
//!   - `wsgi_file_template.py`: the WSGI entry point, with one
//!     `{project_path}` placeholder

use anyhow::Result;
use include_dir::{Dir, include_dir};

use crate::application::ports::AssetSource;

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Return the raw bytes of a single embedded asset.
///
/// # Errors
///
/// Returns an error if no asset with the given `name` exists.
pub fn get_asset(name: &str) -> Result<&'static [u8]> {
    EMBEDDED_ASSETS
        .get_file(name)
        .map(|f| f.contents())
        .ok_or_else(|| anyhow::anyhow!("embedded asset not found: {name}"))
}

/// Production `AssetSource` backed by the embedded directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn get_asset(&self, name: &str) -> Result<&'static [u8]> {
        get_asset(name)
    }
}
