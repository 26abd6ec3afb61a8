//! Non-fatal findings reported alongside a successful run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

impl Issue {
    pub fn new(rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message: message.into(),
            component: None,
            interface: None,
        }
    }

    pub fn with_component(mut self, path: impl Into<String>) -> Self {
        self.component = Some(path.into());
        self
    }

    pub fn with_interface(mut self, path: impl Into<String>) -> Self {
        self.interface = Some(path.into());
        self
    }
}
