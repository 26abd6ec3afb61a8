//! Build pipeline shared by the library API and the CLI.
//! Defaults, then part resolution, then ERC.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::{build_vindriktning, BoardOptions};
use crate::catalog::{builtin_catalog, load_catalog_from_file, Catalog, CatalogError};
use crate::defaults::{fill_defaults, ParameterDefaults};
use crate::erc::check_connectivity;
use crate::graph::{Design, DesignError, DesignStats};
use crate::issue::{Issue, Severity};
use crate::resolver::{resolve_all, Resolution, ResolveError, ResolvedPart};

#[derive(Debug, thiserror::Error)]
pub enum PartPickError {
    #[error("Design error: {0}")]
    Design(#[from] DesignError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Options for a board build (CLI or library).
#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
    /// External catalog; the embedded LCSC tables when unset
    pub catalog_path: Option<PathBuf>,
    pub defaults: ParameterDefaults,
    pub board: BoardOptions,
}

impl BuildOptions {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => load_catalog_from_file(path),
            None => builtin_catalog(),
        }
    }
}

/// Everything a successful build produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub design: String,
    pub catalog: String,
    pub generated_at: DateTime<Utc>,
    pub parts: Vec<ResolvedPart>,
    pub issues: Vec<Issue>,
    pub stats: BuildStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    pub components: usize,
    pub interfaces: usize,
    pub links: usize,
    pub picked: usize,
    pub pin_maps: usize,
    pub warnings: usize,
    pub info: usize,
}

impl BuildReport {
    pub fn has_warnings(&self) -> bool {
        self.stats.warnings > 0
    }

    pub fn part(&self, path: &str) -> Option<&ResolvedPart> {
        self.parts.iter().find(|p| p.path == path)
    }
}

fn build_stats(design: &DesignStats, resolution: &Resolution, issues: &[Issue]) -> BuildStats {
    let warnings = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();
    BuildStats {
        components: design.component_count,
        interfaces: design.interface_count,
        links: design.link_count,
        picked: resolution.parts.len(),
        pin_maps: resolution.pin_maps.len(),
        warnings,
        info: issues.len() - warnings,
    }
}

/// Core build API used by both the library and the CLI.
pub struct PartPickCore;

impl PartPickCore {
    /// Build, resolve and check the reference board.
    pub fn build_reference_board(options: &BuildOptions) -> Result<(Design, BuildReport), PartPickError> {
        let catalog = options.load_catalog()?;
        let design = build_vindriktning(&options.board)?;
        Self::finish(design, &catalog, &options.defaults)
    }

    /// Run the post-assembly passes over an already wired design.
    pub fn finish(
        mut design: Design,
        catalog: &Catalog,
        defaults: &ParameterDefaults,
    ) -> Result<(Design, BuildReport), PartPickError> {
        let mut issues = fill_defaults(&mut design, defaults)?;

        let resolution = resolve_all(&mut design, catalog)?;
        tracing::info!(
            "Picked {} parts for {} from {}",
            resolution.parts.len(),
            design.metadata.name,
            catalog.source
        );

        let erc = check_connectivity(&design);
        if erc.is_empty() {
            tracing::info!("ERC passed");
        }
        issues.extend(erc);

        let stats = build_stats(&design.stats(), &resolution, &issues);
        let report = BuildReport {
            design: design.metadata.name.clone(),
            catalog: catalog.source.clone(),
            generated_at: Utc::now(),
            parts: resolution.parts,
            issues,
            stats,
        };
        Ok((design, report))
    }
}
