//! The navigation state tree.
//!
//! [`NavigationState`] is a forest of navigators keyed by UID plus the UID
//! of the navigator that currently owns input focus. Navigator entries are
//! held behind [`Arc`] so that every transition can build a new root and a
//! new mapping while reusing untouched navigators by reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use waypoint_router::{Route, RouteConfig};
use waypoint_types::{LocalAlert, NavigatorType, NavigatorUid, RouteKey};

/// State of one navigator.
pub struct NavigatorState<E> {
    /// Owner-assigned identifier.
    pub navigator_uid: NavigatorUid,
    /// Routes in stack/tab order.
    pub routes: Vec<Route<E>>,
    /// Position of the active route in `routes`.
    pub index: usize,
    /// Kind of navigator.
    pub navigator_type: NavigatorType,
    /// Navigator that owns this one; focus falls back to it on removal.
    pub parent_navigator_uid: Option<NavigatorUid>,
    /// Low-priority base for every child route's config.
    pub default_route_config: RouteConfig,
    /// Local alert banner, shown until hidden.
    pub alert: Option<LocalAlert>,
}

impl<E> NavigatorState<E> {
    /// An empty navigator with no routes and no defaults.
    pub fn new(navigator_uid: NavigatorUid, navigator_type: NavigatorType) -> Self {
        Self {
            navigator_uid,
            routes: Vec::new(),
            index: 0,
            navigator_type,
            parent_navigator_uid: None,
            default_route_config: RouteConfig::new(),
            alert: None,
        }
    }

    /// The route at `index`, if any.
    pub fn active_route(&self) -> Option<&Route<E>> {
        self.routes.get(self.index)
    }

    /// Position of the route with `key`.
    pub fn index_of(&self, key: RouteKey) -> Option<usize> {
        self.routes.iter().position(|route| route.key() == key)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the navigator holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<E> Clone for NavigatorState<E> {
    fn clone(&self) -> Self {
        Self {
            navigator_uid: self.navigator_uid.clone(),
            routes: self.routes.clone(),
            index: self.index,
            navigator_type: self.navigator_type,
            parent_navigator_uid: self.parent_navigator_uid.clone(),
            default_route_config: self.default_route_config.clone(),
            alert: self.alert.clone(),
        }
    }
}

impl<E> core::fmt::Debug for NavigatorState<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigatorState")
            .field("navigator_uid", &self.navigator_uid)
            .field("routes", &self.routes)
            .field("index", &self.index)
            .field("navigator_type", &self.navigator_type)
            .field("parent_navigator_uid", &self.parent_navigator_uid)
            .field("default_route_config", &self.default_route_config)
            .field("alert", &self.alert)
            .finish()
    }
}

/// Root of the navigation state.
pub struct NavigationState<E> {
    /// All navigators by UID.
    pub navigators: BTreeMap<NavigatorUid, Arc<NavigatorState<E>>>,
    /// Navigator that receives input and back presses; `None` before the
    /// first navigator registers.
    pub current_navigator_uid: Option<NavigatorUid>,
}

impl<E> NavigationState<E> {
    /// The empty state produced by initialization.
    pub const fn new() -> Self {
        Self {
            navigators: BTreeMap::new(),
            current_navigator_uid: None,
        }
    }

    /// Look up a navigator.
    pub fn navigator(&self, navigator_uid: &NavigatorUid) -> Option<&NavigatorState<E>> {
        self.navigators.get(navigator_uid).map(|navigator| &**navigator)
    }

    /// The focused navigator.
    pub fn current_navigator(&self) -> Option<&NavigatorState<E>> {
        self.current_navigator_uid
            .as_ref()
            .and_then(|uid| self.navigator(uid))
    }

    /// A new root with `navigator` stored under its UID; every other entry
    /// is shared with `self`.
    #[must_use]
    pub fn with_navigator(&self, navigator: NavigatorState<E>) -> Self {
        let mut navigators = self.navigators.clone();
        navigators.insert(navigator.navigator_uid.clone(), Arc::new(navigator));
        Self {
            navigators,
            current_navigator_uid: self.current_navigator_uid.clone(),
        }
    }

    /// A new root without the given navigator.
    #[must_use]
    pub fn without_navigator(&self, navigator_uid: &NavigatorUid) -> Self {
        let mut navigators = self.navigators.clone();
        navigators.remove(navigator_uid);
        Self {
            navigators,
            current_navigator_uid: self.current_navigator_uid.clone(),
        }
    }

    /// Move focus to `navigator_uid`.
    #[must_use]
    pub fn focused_on(mut self, navigator_uid: Option<NavigatorUid>) -> Self {
        self.current_navigator_uid = navigator_uid;
        self
    }
}

impl<E> Default for NavigationState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for NavigationState<E> {
    fn clone(&self) -> Self {
        Self {
            navigators: self.navigators.clone(),
            current_navigator_uid: self.current_navigator_uid.clone(),
        }
    }
}

impl<E> core::fmt::Debug for NavigationState<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigationState")
            .field("navigators", &self.navigators)
            .field("current_navigator_uid", &self.current_navigator_uid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_navigator_shares_untouched_entries() {
        let a = NavigatorUid::from("a");
        let b = NavigatorUid::from("b");
        let state: NavigationState<String> = NavigationState::new()
            .with_navigator(NavigatorState::new(a.clone(), NavigatorType::Stack))
            .with_navigator(NavigatorState::new(b.clone(), NavigatorType::Tab));

        let mut replacement = NavigatorState::new(b.clone(), NavigatorType::Tab);
        replacement.alert = Some(LocalAlert::new("saved"));
        let next = state.with_navigator(replacement);

        let (Some(before), Some(after)) = (state.navigators.get(&a), next.navigators.get(&a))
        else {
            panic!("navigator a missing");
        };
        assert!(Arc::ptr_eq(before, after));
        assert!(!Arc::ptr_eq(&state.navigators[&b], &next.navigators[&b]));
    }

    #[test]
    fn current_navigator_follows_focus() {
        let uid = NavigatorUid::from("root");
        let state: NavigationState<String> = NavigationState::new()
            .with_navigator(NavigatorState::new(uid.clone(), NavigatorType::Drawer))
            .focused_on(Some(uid));
        assert_eq!(
            state.current_navigator().map(|n| n.navigator_type),
            Some(NavigatorType::Drawer)
        );
        assert!(NavigationState::<String>::new().current_navigator().is_none());
    }

    #[test]
    fn without_navigator_removes_only_that_entry() {
        let a = NavigatorUid::from("a");
        let b = NavigatorUid::from("b");
        let state: NavigationState<String> = NavigationState::new()
            .with_navigator(NavigatorState::new(a.clone(), NavigatorType::Stack))
            .with_navigator(NavigatorState::new(b.clone(), NavigatorType::Stack));
        let next = state.without_navigator(&a);
        assert!(next.navigator(&a).is_none());
        assert!(next.navigator(&b).is_some());
        assert!(state.navigator(&a).is_some());
    }
}
