//! Navigation state, transitions, and persistence for Waypoint navigation.
//!
//! This crate owns the navigation state tree and the pure reducer that
//! moves it from one state to the next: stacks push and pop, tabs and
//! drawer items are selected, navigators register and tear down, and
//! input focus is restored when a pushed-to navigator goes away.
//!
//! # Modules
//!
//! - [`action`] -- The [`Action`] enum describing every transition.
//! - [`config`] -- Configuration loading from `waypoint-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`NavigationError`] for invalid transitions.
//! - [`persist`] -- Snapshots for saving and restoring state.
//! - [`reducer`] -- The [`Reducer`] and its restoration stack.
//! - [`state`] -- [`NavigationState`] and [`NavigatorState`].
//! - [`store`] -- [`NavigationStore`], the single-writer state container.
//! - [`telemetry`] -- Log subscriber setup.

pub mod action;
pub mod config;
pub mod error;
pub mod persist;
pub mod reducer;
pub mod state;
pub mod store;
pub mod telemetry;

pub use action::{Action, ActionKind};
pub use config::{ConfigError, LoggingConfig, NavigationConfig, RouterSettings, StoreSettings};
pub use error::NavigationError;
pub use persist::{NavigationSnapshot, NavigatorSnapshot, PersistError, RouteSnapshot};
pub use reducer::{Reducer, initial_state};
pub use state::{NavigationState, NavigatorState};
pub use store::{DEFAULT_CHANGE_CAPACITY, NavigationStore, StateChange};
pub use telemetry::{TelemetryError, init_logging};
