//! Saving and restoring navigation state.
//!
//! A [`NavigationSnapshot`] is the serializable image of a
//! [`NavigationState`]: routes are reduced to their key, name, and params,
//! and are resolved again through the [`Router`] on restore. Restored routes
//! keep their keys, so route identity survives a save/restore cycle.
//!
//! Opaque route params (callbacks, handles) cannot be captured; the router
//! warns about them at navigation time in development mode, and
//! [`capture`] refuses them with [`PersistError::UnserializableParams`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use waypoint_router::{RouteConfig, Router, RouterError};
use waypoint_types::{
    LocalAlert, NavigatorType, NavigatorUid, Params, RouteKey, find_unserializable,
};

use crate::state::{NavigationState, NavigatorState};

/// Errors that can occur when capturing or restoring state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A route holds a param that has no serialized form.
    #[error("route {route_key} has a non-serializable param at '{path}'")]
    UnserializableParams {
        /// The offending route.
        route_key: RouteKey,
        /// Dotted path of the param.
        path: String,
    },

    /// A saved route could not be resolved again.
    #[error("failed to resolve saved route: {source}")]
    Route {
        /// The underlying router error.
        #[from]
        source: RouterError,
    },

    /// A saved navigator is internally inconsistent.
    #[error("invalid snapshot of navigator {navigator_uid}: {reason}")]
    InvalidSnapshot {
        /// The offending navigator.
        navigator_uid: NavigatorUid,
        /// What is wrong with it.
        reason: String,
    },

    /// Failed to encode or decode JSON.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Serialized form of one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    /// Route identity, reused on restore.
    pub key: RouteKey,
    /// Registered route name.
    pub route_name: String,
    /// Route params.
    #[serde(default)]
    pub params: Params,
}

/// Serialized form of one navigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorSnapshot {
    /// Routes in stack/tab order.
    pub routes: Vec<RouteSnapshot>,
    /// Position of the active route.
    pub index: usize,
    /// Kind of navigator.
    pub navigator_type: NavigatorType,
    /// Owning navigator, if nested.
    #[serde(default)]
    pub parent_navigator_uid: Option<NavigatorUid>,
    /// Static part of the navigator's route defaults.
    #[serde(default)]
    pub default_route_config: serde_json::Map<String, serde_json::Value>,
    /// Local alert, if one was showing.
    #[serde(default)]
    pub alert: Option<LocalAlert>,
}

/// Serialized form of the whole navigation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// When the snapshot was captured.
    pub saved_at: DateTime<Utc>,
    /// Focused navigator.
    pub current_navigator_uid: Option<NavigatorUid>,
    /// All navigators by UID.
    pub navigators: BTreeMap<NavigatorUid, NavigatorSnapshot>,
}

/// Capture the serializable image of `state`.
///
/// # Errors
///
/// Returns [`PersistError::UnserializableParams`] if any route holds an
/// opaque param.
pub fn capture<E>(state: &NavigationState<E>) -> Result<NavigationSnapshot, PersistError> {
    let mut navigators = BTreeMap::new();
    for (navigator_uid, navigator) in &state.navigators {
        let mut routes = Vec::with_capacity(navigator.routes.len());
        for route in &navigator.routes {
            if let Some(path) = find_unserializable(route.params()) {
                return Err(PersistError::UnserializableParams {
                    route_key: route.key(),
                    path,
                });
            }
            routes.push(RouteSnapshot {
                key: route.key(),
                route_name: route.route_name().to_owned(),
                params: route.params().clone(),
            });
        }
        navigators.insert(
            navigator_uid.clone(),
            NavigatorSnapshot {
                routes,
                index: navigator.index,
                navigator_type: navigator.navigator_type,
                parent_navigator_uid: navigator.parent_navigator_uid.clone(),
                default_route_config: navigator.default_route_config.values().clone(),
                alert: navigator.alert.clone(),
            },
        );
    }

    Ok(NavigationSnapshot {
        saved_at: Utc::now(),
        current_navigator_uid: state.current_navigator_uid.clone(),
        navigators,
    })
}

/// Rebuild navigation state from a snapshot, resolving every route again
/// under its saved key.
///
/// Every restored route is configured under its navigator's defaults,
/// including routes that entered the navigator without them (selected by a
/// jump or replaced in place). Their configuration after a restore is the
/// one a push would have given them.
///
/// # Errors
///
/// Returns [`PersistError::Route`] if a saved route name is no longer
/// registered, or [`PersistError::InvalidSnapshot`] if a navigator's index
/// does not point into its routes or the focused navigator is missing.
pub fn restore<E: 'static>(
    snapshot: &NavigationSnapshot,
    router: &Router<E>,
) -> Result<NavigationState<E>, PersistError> {
    let mut state = NavigationState::new();
    for (navigator_uid, saved) in &snapshot.navigators {
        let len = saved.routes.len();
        if saved.index >= len.max(1) {
            return Err(PersistError::InvalidSnapshot {
                navigator_uid: navigator_uid.clone(),
                reason: format!("index {} with {len} routes", saved.index),
            });
        }

        let default_route_config = RouteConfig::from_values(saved.default_route_config.clone());
        let mut routes = Vec::with_capacity(len);
        for route in &saved.routes {
            let resolved = router.restore_route(route.key, &route.route_name, route.params.clone())?;
            routes.push(resolved.configured_under(&default_route_config));
        }

        state.navigators.insert(
            navigator_uid.clone(),
            Arc::new(NavigatorState {
                navigator_uid: navigator_uid.clone(),
                routes,
                index: saved.index,
                navigator_type: saved.navigator_type,
                parent_navigator_uid: saved.parent_navigator_uid.clone(),
                default_route_config,
                alert: saved.alert.clone(),
            }),
        );
    }

    if let Some(missing) = snapshot
        .current_navigator_uid
        .as_ref()
        .filter(|uid| !state.navigators.contains_key(*uid))
    {
        return Err(PersistError::InvalidSnapshot {
            navigator_uid: missing.clone(),
            reason: String::from("focused navigator is not part of the snapshot"),
        });
    }

    info!(
        navigator_count = state.navigators.len(),
        saved_at = %snapshot.saved_at,
        "navigation state restored"
    );
    Ok(state.focused_on(snapshot.current_navigator_uid.clone()))
}

/// Encode a snapshot as JSON.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if encoding fails.
pub fn to_json(snapshot: &NavigationSnapshot) -> Result<String, PersistError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Decode a snapshot from JSON.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if the input is not a valid snapshot.
pub fn from_json(json: &str) -> Result<NavigationSnapshot, PersistError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;
    use waypoint_router::{Route, RouteDefinition, RouteRegistry, RouterOptions};
    use waypoint_types::ParamValue;

    use super::*;
    use crate::action::Action;
    use crate::reducer::{Reducer, initial_state};

    fn router() -> Router<String> {
        Router::with_options(
            || {
                RouteRegistry::new()
                    .route("home", || {
                        RouteDefinition::from_render(|_: &Route<String>| String::from("home"))
                            .config(RouteConfig::new().with_title("Home"))
                    })
                    .route("profile", || {
                        RouteDefinition::from_render(|route: &Route<String>| {
                            format!("profile:{}", route.params().len())
                        })
                    })
            },
            RouterOptions {
                dev_mode: false,
                ..RouterOptions::default()
            },
        )
    }

    fn user_params(id: i64) -> Params {
        let mut params = Params::new();
        params.insert(String::from("id"), ParamValue::from(id));
        params
    }

    fn sample_state(router: &Router<String>) -> Arc<NavigationState<String>> {
        let mut reducer = Reducer::new();
        let state = reducer
            .reduce(&initial_state(), Action::SetCurrentNavigator {
                navigator_uid: NavigatorUid::from("main"),
                parent_navigator_uid: None,
                navigator_type: NavigatorType::Stack,
                default_route_config: RouteConfig::from_json(json!({ "color": "red" })),
                routes: Some(vec![router.get_route("home", Params::new()).unwrap()]),
                index: 0,
            })
            .unwrap();
        reducer
            .reduce(&state, Action::Push {
                navigator_uid: NavigatorUid::from("main"),
                child: router.get_route("profile", user_params(7)).unwrap(),
            })
            .unwrap()
    }

    #[test]
    fn capture_records_keys_names_and_params() {
        let router = router();
        let state = sample_state(&router);
        let snapshot = capture(&state).unwrap();

        let main = &snapshot.navigators[&NavigatorUid::from("main")];
        let live = state.navigator(&NavigatorUid::from("main")).unwrap();
        assert_eq!(main.index, 1);
        assert_eq!(main.routes.len(), 2);
        assert_eq!(main.routes[1].key, live.routes[1].key());
        assert_eq!(main.routes[1].route_name, "profile");
        assert_eq!(main.routes[1].params, user_params(7));
        assert_eq!(main.default_route_config.get("color"), Some(&json!("red")));
        assert_eq!(snapshot.current_navigator_uid, Some(NavigatorUid::from("main")));
    }

    #[test]
    fn restore_keeps_identity_and_configuration() {
        let router = router();
        let state = sample_state(&router);
        let json = to_json(&capture(&state).unwrap()).unwrap();
        let restored = restore(&from_json(&json).unwrap(), &router).unwrap();

        let before = state.navigator(&NavigatorUid::from("main")).unwrap();
        let after = restored.navigator(&NavigatorUid::from("main")).unwrap();
        assert_eq!(after.index, before.index);
        assert_eq!(
            after.routes.iter().map(Route::key).collect::<Vec<_>>(),
            before.routes.iter().map(Route::key).collect::<Vec<_>>()
        );
        assert_eq!(after.routes[0].title().as_deref(), Some("Home"));
        assert_eq!(after.routes[1].config().get("color"), Some(&json!("red")));
        assert_eq!(after.routes[1].render(), "profile:1");
        assert_eq!(restored.current_navigator_uid, state.current_navigator_uid);
    }

    #[test]
    fn capture_refuses_opaque_params() {
        let router = router();
        let mut params = Params::new();
        params.insert(String::from("on_done"), ParamValue::opaque(|| ()));
        let mut reducer = Reducer::new();
        let state = reducer
            .reduce(&initial_state(), Action::Push {
                navigator_uid: NavigatorUid::from("main"),
                child: router.get_route("profile", params).unwrap(),
            })
            .unwrap();

        let err = capture(&state).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnserializableParams { ref path, .. } if path == "on_done"
        ));
    }

    #[test]
    fn restore_fails_for_unregistered_route() {
        let router = router();
        let mut snapshot = capture(&sample_state(&router)).unwrap();
        snapshot
            .navigators
            .get_mut(&NavigatorUid::from("main"))
            .unwrap()
            .routes[0]
            .route_name = String::from("removed");

        let err = restore(&snapshot, &router).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Route {
                source: RouterError::RouteNotFound { .. }
            }
        ));
    }

    #[test]
    fn restore_rejects_out_of_range_index() {
        let router = router();
        let mut snapshot = capture(&sample_state(&router)).unwrap();
        snapshot
            .navigators
            .get_mut(&NavigatorUid::from("main"))
            .unwrap()
            .index = 9;

        let err = restore(&snapshot, &router).unwrap_err();
        assert!(matches!(err, PersistError::InvalidSnapshot { .. }));
    }

    #[test]
    fn restore_rejects_focus_on_missing_navigator() {
        let router = router();
        let snapshot = from_json(
            r#"{"saved_at":"2026-01-01T00:00:00Z","current_navigator_uid":"ghost","navigators":{}}"#,
        )
        .unwrap();

        let err = restore(&snapshot, &router).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidSnapshot { ref navigator_uid, .. } if navigator_uid.as_str() == "ghost"
        ));
    }

    #[test]
    fn restore_accepts_unfocused_snapshot() {
        let router = router();
        let mut snapshot = capture(&sample_state(&router)).unwrap();
        snapshot.current_navigator_uid = None;
        let restored = restore(&snapshot, &router).unwrap();
        assert_eq!(restored.current_navigator_uid, None);
        assert_eq!(restored.navigators.len(), 1);
    }

    #[test]
    fn restore_applies_navigator_defaults_to_every_route() {
        let router = router();
        let mut reducer = Reducer::new();
        let state = reducer
            .reduce(&initial_state(), Action::SetCurrentNavigator {
                navigator_uid: NavigatorUid::from("tabs"),
                parent_navigator_uid: None,
                navigator_type: NavigatorType::Tab,
                default_route_config: RouteConfig::from_json(json!({ "color": "red" })),
                routes: Some(vec![router.get_route("home", Params::new()).unwrap()]),
                index: 0,
            })
            .unwrap();
        let state = reducer
            .reduce(&state, Action::JumpToTab {
                navigator_uid: NavigatorUid::from("tabs"),
                tab: router.get_route("profile", user_params(2)).unwrap(),
            })
            .unwrap();
        let jumped = &state.navigator(&NavigatorUid::from("tabs")).unwrap().routes[1];
        assert!(jumped.config().get("color").is_none());

        let restored = restore(&capture(&state).unwrap(), &router).unwrap();
        let restored_tab = &restored.navigator(&NavigatorUid::from("tabs")).unwrap().routes[1];
        assert_eq!(restored_tab.key(), jumped.key());
        assert_eq!(restored_tab.config().get("color"), Some(&json!("red")));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            from_json("{\"navigators\": 3}"),
            Err(PersistError::Json { .. })
        ));
    }
}
