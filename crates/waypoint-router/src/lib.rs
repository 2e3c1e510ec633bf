//! Route registry and route resolution for Waypoint navigation.
//!
//! The router resolves an abstract route name plus params into a
//! [`Route`]: a value with a stable key, merged configuration, a per-route
//! event channel, and a render function bound to the route. Navigation
//! state stores these values and treats them as opaque apart from their
//! key and their configuration.
//!
//! # Modules
//!
//! - [`definition`] -- Route definitions, the registry, and the
//!   [`make_route`] component decorator.
//! - [`error`] -- Error types for resolution failures.
//! - [`events`] -- The per-route [`EventEmitter`].
//! - [`route`] -- The resolved [`Route`] value.
//! - [`route_config`] -- [`RouteConfig`] and its shallow/deep merge rules.
//! - [`router`] -- The lazily built registry and the creation algorithm.

pub mod definition;
pub mod error;
pub mod events;
pub mod route;
pub mod route_config;
pub mod router;

pub use definition::{
    ConfigFn, ConfigMapper, DefinitionConfig, EnhancedComponent, ParamsMapper, Props,
    RouteComponent, RouteDefinition, RouteMaker, RouteRegistry, RouteThunk, make_route,
};
pub use error::RouterError;
pub use events::{BLUR_EVENT, DEFAULT_EVENT_CAPACITY, EventEmitter, FOCUS_EVENT, RouteEvent};
pub use route::{RenderFn, Route};
pub use route_config::{NAVIGATION_BAR_KEY, RouteConfig, TITLE_KEY, TitleFn};
pub use router::{RegistryProducer, Router, RouterOptions, create_router};
