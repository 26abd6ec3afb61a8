//! Part Resolution
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Component   │───▶│  Pick Rules  │───▶│   Catalog    │
//! │    (kind)    │    │ (first wins) │    │    Tables    │
//! └──────────────┘    └──────┬───────┘    └──────┬───────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌──────────────┐    ┌──────────────┐
//!                     │   Pin Map    │    │  Narrowed    │
//!                     │  Side Table  │    │  Parameter   │
//!                     └──────┬───────┘    └──────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐
//!                     │ ResolvedPart │
//!                     └──────────────┘
//! ```
//!
//! A component that fits no catalog entry makes the whole board unbuildable,
//! so the first failure aborts the run.

pub mod engine;
pub mod footprint;
pub mod rules;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::graph::{Design, DesignError, MosfetTags};
use crate::parameter::{ParamKind, Parameter};

pub use engine::PartResolver;
pub use footprint::{attach_footprint, PinMap, PinMaps, PinRole, ResolvedPart};
pub use rules::{PickRule, Strategy, PICK_ORDER};

/// The constraint that failed to match, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    Parameter { param: ParamKind, value: Parameter },
    Tags(MosfetTags),
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Parameter { param, value } => {
                write!(f, "{} {}", param, value.display(param.unit()))
            }
            Constraint::Tags(tags) => write!(f, "{}", tags),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No fitting part for {component}: {constraint}")]
    NoFittingPart {
        component: String,
        constraint: Constraint,
    },

    #[error("{component} has no {param} to match against")]
    MissingParameter { component: String, param: ParamKind },

    #[error("Catalog has no entry for {0}")]
    MissingCatalogEntry(String),

    #[error(transparent)]
    Design(#[from] DesignError),
}

/// Parts chosen for a whole design plus the pin maps attached on the way.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub parts: Vec<ResolvedPart>,
    pub pin_maps: PinMaps,
}

/// Resolve every component once, in creation order.
pub fn resolve_all(design: &mut Design, catalog: &Catalog) -> Result<Resolution, ResolveError> {
    let resolver = PartResolver::new(catalog);
    let mut resolution = Resolution::default();

    let ids: Vec<_> = design.component_ids().collect();
    for id in ids {
        let Some(part_id) = resolver.resolve(design, id, &mut resolution.pin_maps)? else {
            continue;
        };
        let part = attach_footprint(design, id, part_id, &resolution.pin_maps);
        tracing::debug!("Picked {} for {}", part.part_id, part.path);
        resolution.parts.push(part);
    }

    Ok(resolution)
}
