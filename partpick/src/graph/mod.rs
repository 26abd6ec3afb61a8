//! Circuit Graph Module
//!
//! A minimal schematic model: a component arena with hierarchical names and a
//! petgraph interface graph whose edges are direct connections. This is the
//! collaborator surface the picker and the ERC sweep consume:
//! - a kind tag per component
//! - declared parameter slots
//! - declared sub-interfaces
//! - side data (designator, bridge pair) attached to a component

pub mod schema;
pub mod circuit;

use thiserror::Error;

pub use schema::*;
pub use circuit::{Design, DesignMetadata, DesignStats};

use crate::parameter::{ParamKind, ParameterError};

/// Errors raised while assembling or mutating a design
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("no interface '{name}' on {owner}")]
    UnknownInterface { owner: String, name: String },

    #[error("no component '{name}' under {parent}")]
    UnknownComponent { parent: String, name: String },

    #[error("cannot connect {a} ({a_kind}) to {b} ({b_kind})")]
    InterfaceMismatch {
        a: String,
        a_kind: InterfaceKind,
        b: String,
        b_kind: InterfaceKind,
    },

    #[error("{0} has no defined bridge")]
    NotABridge(String),

    #[error("{path} is not a {expected}")]
    WrongKind { path: String, expected: &'static str },

    #[error("{param} of {component} is already bound")]
    ParameterAlreadyBound { component: String, param: ParamKind },

    #[error("{param} of {component} is unbound")]
    MissingParameter { component: String, param: ParamKind },

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}
