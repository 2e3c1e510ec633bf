//! Per-route configuration and the layering rules that produce it.
//!
//! A route's configuration is assembled from up to four layers, lowest
//! precedence first:
//!
//! 1. the navigator's `default_route_config`,
//! 2. the resolution base (the route's [`EventEmitter`]),
//! 3. the definition's own config (static mapping or function),
//! 4. the config declared by the route component.
//!
//! Layer 3 is applied with a *shallow* merge; layers 1 and 4 with a *deep*
//! merge. Deep merge recurses into JSON objects key by key; any other
//! overlay value, arrays and `null` included, replaces the base value.
//! Arrays are never concatenated.
//!
//! The navigation bar title may be a plain value at `navigationBar.title`
//! or a function of the route's params. The highest layer that defines a
//! title in either form wins, so a static title in a higher layer hides a
//! title function from a lower one.

use std::sync::Arc;

use serde_json::{Map, Value};
use waypoint_types::Params;

use crate::events::EventEmitter;

/// Config key holding navigation bar settings.
pub const NAVIGATION_BAR_KEY: &str = "navigationBar";

/// Key of the title inside the navigation bar settings.
pub const TITLE_KEY: &str = "title";

/// Computes a navigation bar title from a route's params and config.
pub type TitleFn = Arc<dyn Fn(&Params, &RouteConfig) -> Option<String> + Send + Sync>;

/// Merged configuration of a route (or a navigator's route defaults).
///
/// Cloning copies the value mapping; the title function and the event
/// emitter are shared handles.
#[derive(Clone, Default)]
pub struct RouteConfig {
    values: Map<String, Value>,
    title_fn: Option<TitleFn>,
    event_emitter: Option<EventEmitter>,
}

impl RouteConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from a JSON mapping.
    pub const fn from_values(values: Map<String, Value>) -> Self {
        Self {
            values,
            title_fn: None,
            event_emitter: None,
        }
    }

    /// Create a configuration from a JSON value.
    ///
    /// Anything other than a JSON object yields an empty configuration.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(values) => Self::from_values(values),
            _ => Self::new(),
        }
    }

    /// Set a top-level value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Set a static navigation bar title, dropping any title function.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let bar = self
            .values
            .entry(NAVIGATION_BAR_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !bar.is_object() {
            *bar = Value::Object(Map::new());
        }
        if let Value::Object(bar) = bar {
            bar.insert(TITLE_KEY.to_owned(), Value::String(title.into()));
        }
        self.title_fn = None;
        self
    }

    /// Compute the navigation bar title from the route's params.
    #[must_use]
    pub fn with_title_fn<F>(mut self, title: F) -> Self
    where
        F: Fn(&Params, &Self) -> Option<String> + Send + Sync + 'static,
    {
        self.title_fn = Some(Arc::new(title));
        self
    }

    /// Attach an event emitter.
    #[must_use]
    pub fn with_event_emitter(mut self, emitter: EventEmitter) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    /// Look up a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Follow a path of object keys, e.g. `["navigationBar", "tintColor"]`.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.values.get(*first)?, |value, key| value.get(*key))
    }

    /// Set a top-level value in place.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// The JSON part of the configuration.
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The JSON part of the configuration as a value.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// The static title value, if one is stored.
    pub fn static_title(&self) -> Option<&Value> {
        self.lookup(&[NAVIGATION_BAR_KEY, TITLE_KEY])
    }

    /// The title function, if the title is computed.
    pub const fn title_fn(&self) -> Option<&TitleFn> {
        self.title_fn.as_ref()
    }

    /// The route's event emitter, if one is attached.
    pub const fn event_emitter(&self) -> Option<&EventEmitter> {
        self.event_emitter.as_ref()
    }

    /// Replace each top-level key of `self` with the overlay's.
    pub fn shallow_merge(&mut self, overlay: &Self) {
        for (key, value) in &overlay.values {
            self.values.insert(key.clone(), value.clone());
        }
        if overlay.title_fn.is_some() {
            self.title_fn.clone_from(&overlay.title_fn);
        } else if overlay.values.contains_key(NAVIGATION_BAR_KEY) {
            self.title_fn = None;
        }
        if overlay.event_emitter.is_some() {
            self.event_emitter.clone_from(&overlay.event_emitter);
        }
    }

    /// Recursively merge the overlay into `self`; the overlay wins.
    pub fn deep_merge(&mut self, overlay: &Self) {
        deep_merge_values(&mut self.values, &overlay.values);
        if overlay.title_fn.is_some() {
            self.title_fn.clone_from(&overlay.title_fn);
        } else if overlay.static_title().is_some() {
            self.title_fn = None;
        }
        if overlay.event_emitter.is_some() {
            self.event_emitter.clone_from(&overlay.event_emitter);
        }
    }

    /// A new configuration with `self` deep-merged over `base`.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        let mut merged = base.clone();
        merged.deep_merge(self);
        merged
    }
}

fn deep_merge_values(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = base.get_mut(key) {
                deep_merge_values(existing, incoming);
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
}

impl PartialEq for RouteConfig {
    fn eq(&self, other: &Self) -> bool {
        let same_title_fn = match (&self.title_fn, &other.title_fn) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        let same_emitter = match (&self.event_emitter, &other.event_emitter) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_channel(b),
            _ => false,
        };
        self.values == other.values && same_title_fn && same_emitter
    }
}

impl core::fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteConfig")
            .field("values", &self.values)
            .field("title_fn", &self.title_fn.as_ref().map(|_| "<fn>"))
            .field("event_emitter", &self.event_emitter)
            .finish()
    }
}

impl From<Map<String, Value>> for RouteConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deep_merge_recurses_into_objects() {
        let mut base = RouteConfig::from_json(json!({
            "navigationBar": { "title": "Base", "tintColor": "blue" },
            "gestures": true,
        }));
        let overlay = RouteConfig::from_json(json!({
            "navigationBar": { "title": "Top" },
        }));
        base.deep_merge(&overlay);

        assert_eq!(
            base.to_json(),
            json!({
                "navigationBar": { "title": "Top", "tintColor": "blue" },
                "gestures": true,
            })
        );
    }

    #[test]
    fn deep_merge_replaces_arrays_and_scalars() {
        let mut base = RouteConfig::from_json(json!({ "tabs": [1, 2, 3], "style": { "x": 1 } }));
        let overlay = RouteConfig::from_json(json!({ "tabs": [9], "style": null }));
        base.deep_merge(&overlay);
        assert_eq!(base.to_json(), json!({ "tabs": [9], "style": null }));
    }

    #[test]
    fn shallow_merge_replaces_top_level_mappings() {
        let mut base = RouteConfig::from_json(json!({
            "navigationBar": { "title": "Base", "tintColor": "blue" },
        }));
        let overlay = RouteConfig::from_json(json!({
            "navigationBar": { "visible": false },
        }));
        base.shallow_merge(&overlay);
        assert_eq!(base.to_json(), json!({ "navigationBar": { "visible": false } }));
    }

    #[test]
    fn static_title_in_higher_layer_hides_title_fn() {
        let mut base = RouteConfig::new().with_title_fn(|_, _| Some(String::from("computed")));
        assert!(base.title_fn().is_some());

        base.deep_merge(&RouteConfig::new().with_title("fixed"));
        assert!(base.title_fn().is_none());
        assert_eq!(base.static_title(), Some(&json!("fixed")));
    }

    #[test]
    fn title_fn_in_higher_layer_wins() {
        let mut base = RouteConfig::new().with_title("fixed");
        base.deep_merge(&RouteConfig::new().with_title_fn(|_, _| None));
        assert!(base.title_fn().is_some());
    }

    #[test]
    fn merged_over_leaves_inputs_untouched() {
        let defaults = RouteConfig::from_json(json!({ "color": "red", "title": "B" }));
        let own = RouteConfig::from_json(json!({ "title": "A" }));
        let merged = own.merged_over(&defaults);

        assert_eq!(merged.get("title"), Some(&json!("A")));
        assert_eq!(merged.get("color"), Some(&json!("red")));
        assert_eq!(defaults.get("title"), Some(&json!("B")));
        assert_eq!(own.get("color"), None);
    }

    #[test]
    fn emitter_is_kept_unless_overlay_has_one() {
        let emitter = EventEmitter::new();
        let mut config = RouteConfig::new().with_event_emitter(emitter.clone());
        config.deep_merge(&RouteConfig::from_json(json!({ "x": 1 })));
        assert!(config.event_emitter().is_some_and(|e| e.same_channel(&emitter)));

        let replacement = EventEmitter::new();
        config.shallow_merge(&RouteConfig::new().with_event_emitter(replacement.clone()));
        assert!(config.event_emitter().is_some_and(|e| e.same_channel(&replacement)));
    }

    #[test]
    fn lookup_follows_nested_keys() {
        let config = RouteConfig::from_json(json!({ "navigationBar": { "style": { "height": 44 } } }));
        assert_eq!(
            config.lookup(&["navigationBar", "style", "height"]),
            Some(&json!(44))
        );
        assert_eq!(config.lookup(&["navigationBar", "missing"]), None);
        assert_eq!(config.lookup(&[]), None);
    }
}
