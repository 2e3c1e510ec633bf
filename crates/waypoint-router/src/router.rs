//! Route resolution.
//!
//! The [`Router`] turns a route name and params into a [`Route`]. Its
//! registry is produced by a caller-supplied function the first time a
//! route is resolved, and never again.
//!
//! # Creation algorithm
//!
//! 1. Take the registered definition for the route name.
//! 2. Start the config with a fresh [`EventEmitter`].
//! 3. Shallow-merge the definition's config layer (a mapping, or a
//!    function of the base config and params).
//! 4. Deep-merge the config declared by the route's component.
//! 5. Bind the definition's render function and assign a key.

use std::sync::OnceLock;

use tracing::{debug, info, warn};
use waypoint_types::{Params, RouteKey, find_unserializable};

use crate::definition::{ConfigMapper, ParamsMapper, Props, RouteMaker, RouteRegistry, make_route};
use crate::error::RouterError;
use crate::events::{DEFAULT_EVENT_CAPACITY, EventEmitter};
use crate::route::Route;
use crate::route_config::RouteConfig;

/// Produces the route registry on first use.
pub type RegistryProducer<E> = Box<dyn Fn() -> RouteRegistry<E> + Send + Sync>;

/// Tunables for a [`Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    /// Warn about route params that cannot be persisted.
    pub dev_mode: bool,
    /// Buffer size of each route's event channel.
    pub event_channel_capacity: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            dev_mode: cfg!(debug_assertions),
            event_channel_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Resolves route names into renderable [`Route`]s.
pub struct Router<E> {
    producer: RegistryProducer<E>,
    registry: OnceLock<RouteRegistry<E>>,
    options: RouterOptions,
}

/// Create a router with default options.
pub fn create_router<E, F>(producer: F) -> Router<E>
where
    E: 'static,
    F: Fn() -> RouteRegistry<E> + Send + Sync + 'static,
{
    Router::new(producer)
}

impl<E: 'static> Router<E> {
    /// Create a router with default options.
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> RouteRegistry<E> + Send + Sync + 'static,
    {
        Self::with_options(producer, RouterOptions::default())
    }

    /// Create a router with explicit options.
    pub fn with_options<F>(producer: F, options: RouterOptions) -> Self
    where
        F: Fn() -> RouteRegistry<E> + Send + Sync + 'static,
    {
        Self {
            producer: Box::new(producer),
            registry: OnceLock::new(),
            options,
        }
    }

    /// The options this router was built with.
    pub const fn options(&self) -> RouterOptions {
        self.options
    }

    /// See [`make_route`].
    pub fn make_route(
        &self,
        map_params_to_props: Option<ParamsMapper>,
        map_config_to_props: Option<ConfigMapper>,
        extra_props: Props,
    ) -> RouteMaker {
        make_route(map_params_to_props, map_config_to_props, extra_props)
    }

    /// Whether a route name is registered.
    pub fn has_route(&self, route_name: &str) -> bool {
        self.registry().contains(route_name)
    }

    /// All registered route names, sorted.
    pub fn route_names(&self) -> Vec<String> {
        self.registry().names().map(str::to_owned).collect()
    }

    /// Resolve a route name with params into a new route.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RouteNotFound`] if the name is not registered,
    /// or [`RouterError::InvalidRouteDefinition`] if its definition has no
    /// render function.
    pub fn get_route(&self, route_name: &str, params: Params) -> Result<Route<E>, RouterError> {
        if !self.has_route(route_name) {
            return Err(RouterError::RouteNotFound {
                route_name: route_name.to_owned(),
            });
        }
        self.validate_params(route_name, &params);
        self.create_route(route_name, params, RouteKey::new())
    }

    /// Re-resolve a route with `new_params` merged over its params.
    ///
    /// The result is a fresh resolution (new key, new emitter, config
    /// derived again), not a clone.
    ///
    /// # Errors
    ///
    /// Same as [`get_route`](Self::get_route).
    pub fn update_route_with_params(
        &self,
        route: &Route<E>,
        new_params: Params,
    ) -> Result<Route<E>, RouterError> {
        let mut params = route.params().clone();
        params.extend(new_params);
        self.validate_params(route.route_name(), &params);
        self.create_route(route.route_name(), params, RouteKey::new())
    }

    /// Resolve a route under an existing key.
    ///
    /// Used when restoring persisted navigation state so that route
    /// identity survives the save/restore cycle.
    ///
    /// # Errors
    ///
    /// Same as [`get_route`](Self::get_route).
    pub fn restore_route(
        &self,
        key: RouteKey,
        route_name: &str,
        params: Params,
    ) -> Result<Route<E>, RouterError> {
        self.validate_params(route_name, &params);
        self.create_route(route_name, params, key)
    }

    /// In development mode, warn when `params` hold a value that cannot be
    /// persisted. Returns the path of the offending value.
    ///
    /// Navigation proceeds either way.
    pub fn validate_params(&self, route_name: &str, params: &Params) -> Option<String> {
        if !self.options.dev_mode {
            return None;
        }
        let path = find_unserializable(params)?;
        warn!(
            route_name,
            parameter = %path,
            "non-serializable route parameter; navigation state may not be saved and restored properly"
        );
        Some(path)
    }

    fn registry(&self) -> &RouteRegistry<E> {
        self.registry.get_or_init(|| {
            let registry = (self.producer)();
            info!(route_count = registry.len(), "route registry built");
            registry
        })
    }

    fn create_route(
        &self,
        route_name: &str,
        params: Params,
        key: RouteKey,
    ) -> Result<Route<E>, RouterError> {
        let thunk = self
            .registry()
            .get(route_name)
            .ok_or_else(|| RouterError::RouteNotFound {
                route_name: route_name.to_owned(),
            })?;
        let definition = thunk();

        let render = definition.render_fn().cloned().ok_or_else(|| {
            RouterError::InvalidRouteDefinition {
                route_name: route_name.to_owned(),
                reason: String::from("a route definition must have a render function"),
            }
        })?;

        let mut config = RouteConfig::new().with_event_emitter(EventEmitter::with_capacity(
            self.options.event_channel_capacity,
        ));
        if let Some(layer) = definition.definition_config() {
            let layer = layer.layer(&config, &params);
            config.shallow_merge(&layer);
        }
        if let Some(declared) = definition.declared_config() {
            config.deep_merge(declared);
        }

        debug!(route_name, %key, "route resolved");
        Ok(Route::new(key, route_name, params, config, render))
    }
}

impl<E> core::fmt::Debug for Router<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("registry_built", &self.registry.get().is_some())
            .finish_non_exhaustive()
    }
}
