//! Part Catalog
//!
//! Ordered part tables, one per resolvable kind. Order is significant: the
//! picker scans a table front to back and takes the first entry that fits,
//! so when two entries satisfy an interval the earlier one wins.
//!
//! The builtin catalog is compiled into the binary from `catalog/lcsc.json`;
//! a file with the same schema can replace it at runtime.

pub mod builtin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{MosfetTags, PartKind};
use crate::parameter::ParamKind;

pub use builtin::{builtin_catalog, load_catalog_from_file};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Part with a single catalog identifier regardless of parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    pub part: PartKind,
    pub part_id: String,
}

/// Part implementing one fixed scalar value (ohms, farads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarEntry {
    pub part_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosfetEntry {
    pub part_id: String,
    #[serde(flatten)]
    pub tags: MosfetTags,
}

/// Which scalar table a component kind is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarTable {
    Resistors,
    Capacitors,
}

impl ScalarTable {
    pub fn param(&self) -> ParamKind {
        match self {
            ScalarTable::Resistors => ParamKind::Resistance,
            ScalarTable::Capacitors => ParamKind::Capacitance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Distributor the part identifiers belong to
    pub source: String,
    #[serde(default)]
    pub canonical: Vec<CanonicalEntry>,
    pub led: Option<String>,
    #[serde(default)]
    pub resistors: Vec<ScalarEntry>,
    #[serde(default)]
    pub capacitors: Vec<ScalarEntry>,
    #[serde(default)]
    pub mosfets: Vec<MosfetEntry>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject tables the picker could not scan meaningfully.
    fn validate(&self) -> Result<(), CatalogError> {
        for entry in self.resistors.iter().chain(self.capacitors.iter()) {
            if !entry.value.is_finite() {
                return Err(CatalogError::Invalid(format!(
                    "{} has non-finite value",
                    entry.part_id
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.canonical {
            if !seen.insert(entry.part) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate canonical entry for {}",
                    entry.part.model()
                )));
            }
        }

        let mut seen_tags = std::collections::HashSet::new();
        for entry in &self.mosfets {
            if !seen_tags.insert(entry.tags) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate MOSFET entry for {} ({})",
                    entry.tags, entry.part_id
                )));
            }
        }

        Ok(())
    }

    pub fn canonical_part(&self, part: PartKind) -> Option<&str> {
        self.canonical
            .iter()
            .find(|e| e.part == part)
            .map(|e| e.part_id.as_str())
    }

    pub fn scalar_table(&self, table: ScalarTable) -> &[ScalarEntry] {
        match table {
            ScalarTable::Resistors => &self.resistors,
            ScalarTable::Capacitors => &self.capacitors,
        }
    }

    pub fn part_count(&self) -> usize {
        self.canonical.len()
            + usize::from(self.led.is_some())
            + self.resistors.len()
            + self.capacitors.len()
            + self.mosfets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ChannelType, SaturationType};

    #[test]
    fn test_from_json_keeps_table_order() {
        let catalog = Catalog::from_json(
            r#"{
                "source": "test",
                "led": null,
                "resistors": [
                    { "part_id": "B", "value": 20.0 },
                    { "part_id": "A", "value": 10.0 }
                ],
                "mosfets": [
                    { "part_id": "M", "channel": "p_channel", "saturation": "depletion" }
                ]
            }"#,
        )
        .unwrap();

        let ids: Vec<&str> = catalog.resistors.iter().map(|e| e.part_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert!(catalog.capacitors.is_empty());
        assert_eq!(
            catalog.mosfets[0].tags,
            MosfetTags {
                channel: ChannelType::PChannel,
                saturation: SaturationType::Depletion,
            }
        );
        assert_eq!(catalog.part_count(), 3);
    }

    #[test]
    fn test_duplicate_canonical_rejected() {
        let err = Catalog::from_json(
            r#"{
                "source": "test",
                "led": "L1",
                "canonical": [
                    { "part": "usb_type_c_receptacle_24_pin", "part_id": "C134092" },
                    { "part": "usb_type_c_receptacle_24_pin", "part_id": "C138392" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_duplicate_mosfet_tags_rejected() {
        let err = Catalog::from_json(
            r#"{
                "source": "test",
                "led": null,
                "mosfets": [
                    { "part_id": "C8545", "channel": "n_channel", "saturation": "enhancement" },
                    { "part_id": "C20917", "channel": "n_channel", "saturation": "enhancement" }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("N-channel enhancement"));
        assert!(err.to_string().contains("C20917"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
