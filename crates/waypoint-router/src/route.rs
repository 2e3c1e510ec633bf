//! The resolved route value.
//!
//! A [`Route`] is one navigation entry: identity, route name, params,
//! merged configuration, and a bound render function. Routes are treated
//! as immutable values except for their configuration, which a navigator
//! rewrites on its own clone when applying its route defaults.

use std::sync::Arc;

use serde_json::Value;
use waypoint_types::{Params, RouteKey};

use crate::events::EventEmitter;
use crate::route_config::RouteConfig;

/// Renders a route into a UI element of type `E`.
pub type RenderFn<E> = Arc<dyn Fn(&Route<E>) -> E + Send + Sync>;

/// A resolved, renderable navigation entry with stable identity.
pub struct Route<E> {
    key: RouteKey,
    route_name: String,
    params: Arc<Params>,
    config: RouteConfig,
    render: RenderFn<E>,
}

impl<E> Route<E> {
    /// Assemble a route from already-merged parts.
    ///
    /// The router is the usual caller; `config` is expected to be fully
    /// layered already.
    pub fn new(
        key: RouteKey,
        route_name: impl Into<String>,
        params: Params,
        config: RouteConfig,
        render: RenderFn<E>,
    ) -> Self {
        Self {
            key,
            route_name: route_name.into(),
            params: Arc::new(params),
            config,
            render,
        }
    }

    /// Identity of this navigation entry, shared by all clones.
    pub const fn key(&self) -> RouteKey {
        self.key
    }

    /// Name under which the route is registered.
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// The route's parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The merged configuration.
    pub const fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Mutable access to this instance's configuration.
    pub const fn config_mut(&mut self) -> &mut RouteConfig {
        &mut self.config
    }

    /// Replace this instance's configuration.
    pub fn set_config(&mut self, config: RouteConfig) {
        self.config = config;
    }

    /// Produce the UI element for this route.
    pub fn render(&self) -> E {
        (self.render)(self)
    }

    /// The navigation bar title.
    ///
    /// A title function is invoked with the route's params and config;
    /// otherwise the stored `navigationBar.title` scalar is returned.
    pub fn title(&self) -> Option<String> {
        if let Some(title_fn) = self.config.title_fn() {
            return title_fn(&self.params, &self.config);
        }
        match self.config.static_title()? {
            Value::String(title) => Some(title.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The event channel created when this route was resolved.
    pub const fn event_emitter(&self) -> Option<&EventEmitter> {
        self.config.event_emitter()
    }

    /// Clone this route and deep-merge its config over `defaults`.
    ///
    /// This is how a navigator adopts a child: the child's own settings
    /// win, the navigator's defaults fill the gaps.
    #[must_use]
    pub fn configured_under(&self, defaults: &RouteConfig) -> Self {
        let mut child = self.clone();
        child.config = self.config.merged_over(defaults);
        child
    }

    /// Whether both values are the same logical navigation entry.
    pub fn same_entry(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<E> Clone for Route<E> {
    /// Same key, name, params, and render function; the configuration is
    /// copied so the clone can be reconfigured independently.
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            route_name: self.route_name.clone(),
            params: Arc::clone(&self.params),
            config: self.config.clone(),
            render: Arc::clone(&self.render),
        }
    }
}

/// Render functions are not compared.
impl<E> PartialEq for Route<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.route_name == other.route_name
            && self.params == other.params
            && self.config == other.config
    }
}

impl<E> core::fmt::Debug for Route<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("route_name", &self.route_name)
            .field("params", &self.params)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
