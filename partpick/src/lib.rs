//! Partpick - parameter-constrained part picking for circuit graphs
//!
//! Walks a hierarchical design, chooses a concrete catalog part for every
//! component that needs one, narrows open parameter ranges to the chosen
//! value and records footprint pin maps. A connectivity check then reports
//! electrical pins left without a connection.
//!
//! # Quick Start
//!
//! ```no_run
//! use partpick::{BuildOptions, PartPickCore};
//!
//! let options = BuildOptions::default();
//! let (_design, report) = PartPickCore::build_reference_board(&options).unwrap();
//!
//! for part in &report.parts {
//!     println!("{} -> {}", part.path, part.part_id);
//! }
//! for issue in &report.issues {
//!     println!("{:?}: {}", issue.severity, issue.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Catalog picking**: canonical modules, first-fit resistors and
//!   capacitors, LEDs and MOSFETs by channel and saturation type
//! - **Parameter narrowing**: an interval collapses to the value of the
//!   part that was picked
//! - **ERC**: unconnected electrical interfaces reported as warnings
//! - **External catalogs**: same JSON schema as the embedded LCSC tables

pub mod board;
pub mod catalog;
pub mod core;
pub mod defaults;
pub mod erc;
pub mod graph;
pub mod issue;
pub mod parameter;
pub mod resolver;
pub mod units;

// Re-export main types
pub use core::{BuildOptions, BuildReport, BuildStats, PartPickCore, PartPickError};
pub use catalog::{builtin_catalog, load_catalog_from_file, Catalog, CatalogError};
pub use defaults::{fill_defaults, ParameterDefaults};
pub use erc::check_connectivity;
pub use graph::{ComponentId, ComponentKind, Design, DesignError, InterfaceId};
pub use issue::{Issue, Severity};
pub use parameter::{Bounds, ParamKind, Parameter, ParameterError};
pub use resolver::{resolve_all, PartResolver, ResolveError, ResolvedPart};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::board::{build_vindriktning, BoardOptions};
    pub use crate::{
        BuildOptions, BuildReport, Catalog, ComponentKind, Design, Issue, ParamKind, Parameter,
        PartPickCore, PartPickError, Severity,
    };
}
