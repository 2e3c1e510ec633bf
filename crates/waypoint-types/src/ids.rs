//! Type-safe identifiers for routes and navigators.
//!
//! Route keys are generated by the router when a route name is resolved and
//! stay stable for the lifetime of the logical navigation entry, including
//! every clone and every save/restore cycle. Navigator UIDs are never
//! generated here: the component that owns a navigator assigns them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Identity of one logical navigation entry.
///
/// Two routes with the same key are the same entry even after independent
/// clones; cloning never regenerates the key. Only the router mints keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct RouteKey(Uuid);

impl RouteKey {
    /// Mint a fresh random key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RouteKey {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a navigator, assigned by the component that owns it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct NavigatorUid(String);

impl NavigatorUid {
    /// Wrap an owner-assigned identifier.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for NavigatorUid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NavigatorUid {
    fn from(uid: &str) -> Self {
        Self(uid.to_owned())
    }
}

impl From<String> for NavigatorUid {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}
