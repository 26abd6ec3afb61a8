//! Built-in and External Catalogs
//!
//! The default LCSC tables are embedded JSON. Users can point the picker at
//! their own file with the same schema without recompiling.

use std::path::Path;

use super::{Catalog, CatalogError};

const EMBEDDED_LCSC: &str = include_str!("../../catalog/lcsc.json");

/// Parse the embedded LCSC catalog.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(EMBEDDED_LCSC)
}

/// Load a catalog from a JSON file
pub fn load_catalog_from_file(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = Catalog::from_json(&content)?;
    tracing::info!(
        "Loaded {} catalog with {} parts from {:?}",
        catalog.source,
        catalog.part_count(),
        path.file_name()
    );
    Ok(catalog)
}
