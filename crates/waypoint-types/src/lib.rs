//! Shared type definitions for Waypoint navigation.
//!
//! The router and the navigation state reducer both depend on this crate
//! for identifiers and parameter values. Types that cross into the
//! rendering or persistence layers are exported to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Route keys (generated) and navigator UIDs (owner-assigned)
//! - [`enums`] -- Navigator kinds
//! - [`params`] -- Route parameter values and the serializability check
//! - [`alert`] -- Local alert banner state

pub mod alert;
pub mod enums;
pub mod ids;
pub mod params;

pub use alert::LocalAlert;
pub use enums::NavigatorType;
pub use ids::{NavigatorUid, RouteKey};
pub use params::{OpaqueValue, ParamValue, Params, find_unserializable};
