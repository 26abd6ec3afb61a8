//! Electrical Rule Check
//!
//! One read-only sweep: every top-level `Electrical` interface of every
//! component must have at least one direct link to another interface.
//! Unconnected pins are warnings, not failures; test points and unpopulated
//! options are legitimately left open.

use crate::graph::{Design, InterfaceKind};
use crate::issue::{Issue, Severity};

pub const UNCONNECTED_RULE: &str = "erc_unconnected_interface";

/// Report every electrical pin without a direct connection.
pub fn check_connectivity(design: &Design) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (id, component) in design.components() {
        for &iface in &component.interfaces {
            if design.interface(iface).kind != InterfaceKind::Electrical {
                continue;
            }
            if !design.direct_connections(iface).is_empty() {
                continue;
            }

            let path = design.interface_path(iface);
            tracing::warn!("{} is not connected!", path);
            issues.push(
                Issue::new(
                    UNCONNECTED_RULE,
                    Severity::Warning,
                    format!("{} is not connected", path),
                )
                .with_component(design.path(id))
                .with_interface(path),
            );
        }
    }

    issues
}
