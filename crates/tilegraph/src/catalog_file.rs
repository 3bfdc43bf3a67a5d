//! File-backed tile catalogs.
//!
//! Both formats carry a single `tiles` list of templates:
//!
//! ```toml
//! [[tiles]]
//! id = "corridor"
//! size = [2, 2, 4]
//! tags = ["Corridor"]
//! connectors = [
//!     { direction = "North", type = "Hall", local_position = [1, 0, 0] },
//!     { direction = "South", type = "Hall", local_position = [1, 0, 4] },
//! ]
//! ```
//!
//! The format is picked from the file extension (`.toml` or `.json`). Loaded templates go
//! through the same validation as [`TileCatalog::new`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, TileCatalog, TileTemplate};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct CatalogFile {
    #[serde(default)]
    tiles: Vec<TileTemplate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("catalog {} has no .toml or .json extension", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("malformed catalog: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

pub fn parse_catalog(source: &str, format: CatalogFormat) -> Result<TileCatalog, CatalogLoadError> {
    let file: CatalogFile = match format {
        CatalogFormat::Toml => {
            toml::from_str(source).map_err(|err| CatalogLoadError::Parse(err.to_string()))?
        }
        CatalogFormat::Json => serde_json::from_str(source)
            .map_err(|err| CatalogLoadError::Parse(err.to_string()))?,
    };
    Ok(TileCatalog::new(file.tiles)?)
}

pub fn load_catalog_from_file(path: &Path) -> Result<TileCatalog, CatalogLoadError> {
    let format = CatalogFormat::from_path(path)
        .ok_or_else(|| CatalogLoadError::UnsupportedFormat { path: path.to_path_buf() })?;
    let source = fs::read_to_string(path)
        .map_err(|source| CatalogLoadError::Io { path: path.to_path_buf(), source })?;
    let catalog = parse_catalog(&source, format)?;
    log::debug!(
        "loaded {} tile templates from {} (content hash {:016x})",
        catalog.len(),
        path.display(),
        catalog.content_hash()
    );
    Ok(catalog)
}

/// Serializes a catalog in the same layout [`parse_catalog`] reads.
pub fn catalog_to_string(
    catalog: &TileCatalog,
    format: CatalogFormat,
) -> Result<String, CatalogLoadError> {
    let file = CatalogFile { tiles: catalog.templates().to_vec() };
    match format {
        CatalogFormat::Toml => {
            toml::to_string(&file).map_err(|err| CatalogLoadError::Parse(err.to_string()))
        }
        CatalogFormat::Json => serde_json::to_string_pretty(&file)
            .map_err(|err| CatalogLoadError::Parse(err.to_string())),
    }
}

#[cfg(test)]
mod tests;
