//! Transient alert banner attached to a navigator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A local alert shown by a navigator until it is explicitly hidden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocalAlert {
    /// Text shown in the alert bar.
    pub message: String,
    /// Presentation options (colors, duration, style), interpreted by the
    /// rendering layer.
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl LocalAlert {
    /// Create an alert with no options.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add a presentation option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}
