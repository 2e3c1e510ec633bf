//! Enumeration types shared across the navigation crates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of container a navigator is.
///
/// Stack navigators use back-stack semantics (push/pop). Tab and drawer
/// navigators keep one entry per item and move the selected item to the
/// end of their route list when it is jumped to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum NavigatorType {
    /// Back-stack of routes; the last pushed route is active.
    #[default]
    Stack,
    /// Tab bar; one route per tab.
    Tab,
    /// Side drawer; one route per drawer item.
    Drawer,
}

impl NavigatorType {
    /// Lowercase name as used in serialized state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Tab => "tab",
            Self::Drawer => "drawer",
        }
    }
}

impl core::fmt::Display for NavigatorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stack() {
        assert_eq!(NavigatorType::default(), NavigatorType::Stack);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&NavigatorType::Drawer).unwrap_or_default();
        assert_eq!(json, "\"drawer\"");
        let parsed: Result<NavigatorType, _> = serde_json::from_str("\"tab\"");
        assert_eq!(parsed.ok(), Some(NavigatorType::Tab));
    }
}
