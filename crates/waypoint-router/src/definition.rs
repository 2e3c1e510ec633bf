//! Route definitions, the registry, and the component decorator.
//!
//! A [`RouteDefinition`] is what gets registered under a route name: a
//! render function, an optional config layer (a mapping or a function of
//! the base config and params), and an optional config declared by the
//! route's component. The component-declared layer is an explicit field
//! so the router can read it without rendering anything.
//!
//! [`make_route`] wraps a [`RouteComponent`] so that its props are
//! assembled from the route: `extra_props`, overridden by what
//! `map_config_to_props` returns, overridden by what `map_params_to_props`
//! returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use waypoint_types::Params;

use crate::route::{RenderFn, Route};
use crate::route_config::RouteConfig;

/// Props handed to a route component.
pub type Props = Params;

/// Computes a definition's config layer from the base config and params.
pub type ConfigFn = Arc<dyn Fn(&RouteConfig, &Params) -> RouteConfig + Send + Sync>;

/// Maps route params to component props.
pub type ParamsMapper = Arc<dyn Fn(&Params) -> Props + Send + Sync>;

/// Maps route config to component props.
pub type ConfigMapper = Arc<dyn Fn(&RouteConfig) -> Props + Send + Sync>;

/// Zero-argument producer of a route definition, stored in the registry.
pub type RouteThunk<E> = Box<dyn Fn() -> RouteDefinition<E> + Send + Sync>;

/// The config layer a definition contributes (shallow-merged).
#[derive(Clone)]
pub enum DefinitionConfig {
    /// A fixed mapping.
    Static(RouteConfig),
    /// A function of the base config and the route params.
    Dynamic(ConfigFn),
}

impl DefinitionConfig {
    /// Produce the layer for one resolution.
    pub fn layer(&self, base: &RouteConfig, params: &Params) -> RouteConfig {
        match self {
            Self::Static(config) => config.clone(),
            Self::Dynamic(config_fn) => config_fn(base, params),
        }
    }
}

impl core::fmt::Debug for DefinitionConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Static(config) => f.debug_tuple("Static").field(config).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// A registered route definition.
pub struct RouteDefinition<E> {
    render: Option<RenderFn<E>>,
    config: Option<DefinitionConfig>,
    static_config: Option<RouteConfig>,
}

impl<E> RouteDefinition<E> {
    /// An empty definition; a render function must be added before it can
    /// be resolved.
    pub const fn new() -> Self {
        Self {
            render: None,
            config: None,
            static_config: None,
        }
    }

    /// A definition that only renders.
    pub fn from_render<F>(render: F) -> Self
    where
        F: Fn(&Route<E>) -> E + Send + Sync + 'static,
    {
        Self::new().render(render)
    }

    /// Set the render function.
    #[must_use]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Route<E>) -> E + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Set a fixed config layer.
    #[must_use]
    pub fn config(mut self, config: RouteConfig) -> Self {
        self.config = Some(DefinitionConfig::Static(config));
        self
    }

    /// Compute the config layer from the base config and params.
    #[must_use]
    pub fn config_fn<F>(mut self, config_fn: F) -> Self
    where
        F: Fn(&RouteConfig, &Params) -> RouteConfig + Send + Sync + 'static,
    {
        self.config = Some(DefinitionConfig::Dynamic(Arc::new(config_fn)));
        self
    }

    /// Set the config declared by the route's component (highest precedence).
    #[must_use]
    pub fn static_config(mut self, config: RouteConfig) -> Self {
        self.static_config = Some(config);
        self
    }

    /// The render function, if set.
    pub const fn render_fn(&self) -> Option<&RenderFn<E>> {
        self.render.as_ref()
    }

    /// The definition's config layer, if any.
    pub const fn definition_config(&self) -> Option<&DefinitionConfig> {
        self.config.as_ref()
    }

    /// The component-declared config, if any.
    pub const fn declared_config(&self) -> Option<&RouteConfig> {
        self.static_config.as_ref()
    }
}

impl<E> Default for RouteDefinition<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for RouteDefinition<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .field("config", &self.config)
            .field("static_config", &self.static_config)
            .finish()
    }
}

/// Route name to definition producer.
pub struct RouteRegistry<E> {
    routes: BTreeMap<String, RouteThunk<E>>,
}

impl<E> RouteRegistry<E> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Register a definition producer (builder form).
    #[must_use]
    pub fn route<F>(mut self, route_name: impl Into<String>, thunk: F) -> Self
    where
        F: Fn() -> RouteDefinition<E> + Send + Sync + 'static,
    {
        self.insert(route_name, thunk);
        self
    }

    /// Register a definition producer, replacing any previous one.
    pub fn insert<F>(&mut self, route_name: impl Into<String>, thunk: F)
    where
        F: Fn() -> RouteDefinition<E> + Send + Sync + 'static,
    {
        self.routes.insert(route_name.into(), Box::new(thunk));
    }

    /// Look up the producer for a route name.
    pub fn get(&self, route_name: &str) -> Option<&RouteThunk<E>> {
        self.routes.get(route_name)
    }

    /// Whether a route name is registered.
    pub fn contains(&self, route_name: &str) -> bool {
        self.routes.contains_key(route_name)
    }

    /// Registered route names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<E> Default for RouteRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A UI component that can be used as a route.
pub trait RouteComponent<E>: Send + Sync + 'static {
    /// Render the component with assembled props.
    fn render(&self, props: &Props) -> E;

    /// Navigation settings the component declares for itself.
    ///
    /// Deep-merged over everything else the router computes.
    fn navigation_config(&self) -> Option<RouteConfig> {
        None
    }
}

/// Decorator produced by [`make_route`].
#[derive(Clone)]
pub struct RouteMaker {
    map_params_to_props: ParamsMapper,
    map_config_to_props: ConfigMapper,
    extra_props: Props,
}

/// Build a decorator that turns a [`RouteComponent`] into a route definition.
///
/// Without `map_params_to_props` every param is passed through; without
/// `map_config_to_props` nothing from the config is passed.
pub fn make_route(
    map_params_to_props: Option<ParamsMapper>,
    map_config_to_props: Option<ConfigMapper>,
    extra_props: Props,
) -> RouteMaker {
    RouteMaker {
        map_params_to_props: match map_params_to_props {
            Some(mapper) => mapper,
            None => Arc::new(|params: &Params| params.clone()),
        },
        map_config_to_props: match map_config_to_props {
            Some(mapper) => mapper,
            None => Arc::new(|_: &RouteConfig| Props::new()),
        },
        extra_props,
    }
}

impl RouteMaker {
    /// Assemble props: extra props, then config-derived, then params-derived.
    pub fn props(&self, params: &Params, config: &RouteConfig) -> Props {
        let mut props = self.extra_props.clone();
        props.extend((self.map_config_to_props)(config));
        props.extend((self.map_params_to_props)(params));
        props
    }

    /// Wrap a component.
    pub fn wrap<E, C>(&self, component: C) -> EnhancedComponent<E>
    where
        C: RouteComponent<E>,
    {
        EnhancedComponent {
            component: Arc::new(component),
            maker: self.clone(),
        }
    }
}

impl core::fmt::Debug for RouteMaker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteMaker")
            .field("extra_props", &self.extra_props)
            .finish_non_exhaustive()
    }
}

/// A component wrapped by a [`RouteMaker`].
pub struct EnhancedComponent<E> {
    component: Arc<dyn RouteComponent<E>>,
    maker: RouteMaker,
}

impl<E> Clone for EnhancedComponent<E> {
    fn clone(&self) -> Self {
        Self {
            component: Arc::clone(&self.component),
            maker: self.maker.clone(),
        }
    }
}

impl<E: 'static> EnhancedComponent<E> {
    /// Render the wrapped component for a route.
    pub fn render(&self, route: &Route<E>) -> E {
        let props = self.maker.props(route.params(), route.config());
        self.component.render(&props)
    }

    /// A route definition rendering this component, carrying the
    /// component's declared navigation config.
    pub fn definition(&self) -> RouteDefinition<E> {
        let enhanced = self.clone();
        let definition = RouteDefinition::from_render(move |route: &Route<E>| enhanced.render(route));
        match self.component.navigation_config() {
            Some(config) => definition.static_config(config),
            None => definition,
        }
    }
}

impl<E: 'static> From<EnhancedComponent<E>> for RouteDefinition<E> {
    fn from(component: EnhancedComponent<E>) -> Self {
        component.definition()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use waypoint_types::{ParamValue, RouteKey};

    use super::*;

    struct Greeting;

    impl RouteComponent<String> for Greeting {
        fn render(&self, props: &Props) -> String {
            let name = props.get("name").and_then(ParamValue::as_str).unwrap_or("?");
            let tone = props.get("tone").and_then(ParamValue::as_str).unwrap_or("?");
            format!("{tone}:{name}")
        }

        fn navigation_config(&self) -> Option<RouteConfig> {
            Some(RouteConfig::new().with_title("Greeting"))
        }
    }

    fn params(entries: &[(&str, &str)]) -> Params {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), ParamValue::from(*v)))
            .collect()
    }

    #[test]
    fn default_mappers_pass_params_only() {
        let maker = make_route(None, None, Props::new());
        let config = RouteConfig::from_json(json!({ "tone": "loud" }));
        let props = maker.props(&params(&[("name", "ada")]), &config);
        assert_eq!(props, params(&[("name", "ada")]));
    }

    #[test]
    fn params_override_config_override_extra_props() {
        let maker = make_route(
            None,
            Some(Arc::new(|config: &RouteConfig| {
                let mut props = Props::new();
                if let Some(tone) = config.get("tone").and_then(|v| v.as_str()) {
                    props.insert(String::from("tone"), ParamValue::from(tone));
                }
                props.insert(String::from("name"), ParamValue::from("from-config"));
                props
            })),
            params(&[("tone", "quiet"), ("name", "extra"), ("badge", "1")]),
        );
        let config = RouteConfig::from_json(json!({ "tone": "loud" }));
        let props = maker.props(&params(&[("name", "ada")]), &config);

        assert_eq!(props, params(&[("tone", "loud"), ("name", "ada"), ("badge", "1")]));
    }

    #[test]
    fn wrapped_component_definition_carries_declared_config() {
        let definition: RouteDefinition<String> =
            make_route(None, None, params(&[("tone", "hi")])).wrap(Greeting).into();

        assert!(definition.render_fn().is_some());
        assert_eq!(
            definition.declared_config().and_then(RouteConfig::static_title),
            Some(&json!("Greeting"))
        );

        let Some(render) = definition.render_fn().cloned() else {
            panic!("render missing");
        };
        let route = Route::new(
            RouteKey::new(),
            "greeting",
            params(&[("name", "ada")]),
            RouteConfig::new(),
            render,
        );
        assert_eq!(route.render(), "hi:ada");
    }

    #[test]
    fn registry_builder_registers_routes() {
        let registry: RouteRegistry<String> = RouteRegistry::new()
            .route("home", || RouteDefinition::from_render(|_| String::from("home")))
            .route("about", RouteDefinition::new);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("home"));
        assert!(!registry.contains("missing"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["about", "home"]);
    }

    #[test]
    fn dynamic_config_sees_base_and_params() {
        let config = DefinitionConfig::Dynamic(Arc::new(|base: &RouteConfig, params: &Params| {
            let id = params.get("id").and_then(ParamValue::as_str).unwrap_or_default();
            RouteConfig::new()
                .with_value("id", json!(id))
                .with_value("had_emitter", json!(base.event_emitter().is_some()))
        }));
        let layer = config.layer(&RouteConfig::new(), &params(&[("id", "7")]));
        assert_eq!(layer.to_json(), json!({ "id": "7", "had_emitter": false }));
    }
}
