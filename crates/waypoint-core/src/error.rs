//! Error types for the navigation state reducer.
//!
//! Every variant is a programming error in the caller: acting on a
//! navigator that was never registered, using a tab action on a stack,
//! or pointing an index past the end of a route list. Benign no-ops
//! (popping the root, reselecting the active tab) are not errors.

use waypoint_types::{NavigatorType, NavigatorUid, RouteKey};

/// Errors returned by [`Reducer::reduce`](crate::reducer::Reducer::reduce).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The action requires a navigator that does not exist.
    #[error("navigator does not exist: {0}")]
    NavigatorNotFound(NavigatorUid),

    /// A type-specific action targeted a navigator of another type.
    #[error("navigator {navigator_uid} is a {actual} navigator, expected {expected}")]
    WrongNavigatorType {
        /// The targeted navigator.
        navigator_uid: NavigatorUid,
        /// The type the action applies to.
        expected: NavigatorType,
        /// The navigator's actual type.
        actual: NavigatorType,
    },

    /// An index does not point into the navigator's route list.
    #[error("index {index} is out of bounds for navigator {navigator_uid} with {len} routes")]
    IndexOutOfBounds {
        /// The targeted navigator.
        navigator_uid: NavigatorUid,
        /// The offending index.
        index: usize,
        /// Number of routes.
        len: usize,
    },

    /// A push supplied a route whose key the navigator already holds.
    #[error("navigator {navigator_uid} already holds route {route_key}")]
    DuplicateRouteKey {
        /// The targeted navigator.
        navigator_uid: NavigatorUid,
        /// The repeated key.
        route_key: RouteKey,
    },

    /// A reset supplied no routes.
    #[error("cannot reset navigator {navigator_uid} to an empty route list")]
    EmptyRoutes {
        /// The targeted navigator.
        navigator_uid: NavigatorUid,
    },
}
