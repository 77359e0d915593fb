use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::CatalogSettings;

use super::model::{Catalog, CatalogError, Track};
use super::scan::scan;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

impl Catalog {
    /// Parse a TOML catalog made of `[[tracks]]` tables.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Catalog::new(file.tracks)
    }

    /// Read a catalog file; relative locators resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;
        let catalog = match path.parent() {
            Some(dir) => catalog.with_base_dir(dir),
            None => catalog,
        };

        tracing::info!(path = %path.display(), tracks = catalog.len(), "loaded catalog file");
        Ok(catalog)
    }
}

/// Open `target` as a catalog: directories are scanned, anything else is
/// read as a catalog file.
pub fn open(target: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    if target.is_dir() {
        let catalog = scan(target, settings)?.with_base_dir(target);
        tracing::info!(dir = %target.display(), tracks = catalog.len(), "scanned catalog directory");
        Ok(catalog)
    } else {
        Catalog::load(target)
    }
}
