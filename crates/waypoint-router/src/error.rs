//! Error types for the `waypoint-router` crate.
//!
//! Both variants are programming errors: a route name that was never
//! registered, or a registration that cannot be rendered. Callers are not
//! expected to recover from them.

/// Errors that can occur while resolving a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// No route definition is registered under the requested name.
    #[error("route '{route_name}' does not exist")]
    RouteNotFound {
        /// The name that was looked up.
        route_name: String,
    },

    /// The registered definition cannot produce a renderable route.
    #[error("invalid definition for route '{route_name}': {reason}")]
    InvalidRouteDefinition {
        /// The route whose definition is malformed.
        route_name: String,
        /// What is wrong with the definition.
        reason: String,
    },
}
