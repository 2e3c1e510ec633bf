//! The single-writer navigation state container.
//!
//! [`NavigationStore`] owns the current state and the [`Reducer`], applies
//! dispatched actions one at a time, and publishes a [`StateChange`] on a
//! broadcast channel whenever the state object is replaced. Observers read
//! the state through shared `Arc` snapshots; they never see a partially
//! applied transition.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::trace;
use waypoint_types::NavigatorUid;

use crate::action::Action;
use crate::config::StoreSettings;
use crate::error::NavigationError;
use crate::reducer::{Reducer, initial_state};
use crate::state::{NavigationState, NavigatorState};

/// Default capacity of the state change channel.
///
/// A subscriber that falls behind by more than this many changes receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;

/// Published after every dispatch that replaced the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Focused navigator after the change.
    pub current_navigator_uid: Option<NavigatorUid>,
    /// Navigators that were added, replaced, or removed.
    pub changed_navigators: Vec<NavigatorUid>,
}

/// Holds navigation state and serializes transitions.
pub struct NavigationStore<E> {
    state: Arc<NavigationState<E>>,
    reducer: Reducer,
    changes: broadcast::Sender<StateChange>,
}

impl<E> NavigationStore<E> {
    /// An empty store with [`DEFAULT_CHANGE_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANGE_CAPACITY)
    }

    /// An empty store with a custom change channel capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_state(NavigationState::new(), capacity)
    }

    /// An empty store configured from the `store` config section.
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self::with_capacity(settings.change_channel_capacity)
    }

    /// A store starting from existing state, e.g. a restored snapshot.
    pub fn from_state(state: NavigationState<E>, capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            state: Arc::new(state),
            reducer: Reducer::new(),
            changes,
        }
    }

    /// The current state.
    pub const fn state(&self) -> &Arc<NavigationState<E>> {
        &self.state
    }

    /// The reducer, for inspecting its restoration stack.
    pub const fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Look up a navigator in the current state.
    pub fn navigator(&self, navigator_uid: &NavigatorUid) -> Option<&NavigatorState<E>> {
        self.state.navigator(navigator_uid)
    }

    /// The focused navigator.
    pub fn current_navigator(&self) -> Option<&NavigatorState<E>> {
        self.state.current_navigator()
    }

    /// Subscribe to changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Apply `action` and publish the change, if any.
    ///
    /// On error the state is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the reducer's [`NavigationError`].
    pub fn dispatch(&mut self, action: Action<E>) -> Result<Arc<NavigationState<E>>, NavigationError> {
        let next = self.reducer.reduce(&self.state, action)?;
        if Arc::ptr_eq(&next, &self.state) {
            trace!("dispatch left navigation state unchanged");
            return Ok(next);
        }

        let change = StateChange {
            current_navigator_uid: next.current_navigator_uid.clone(),
            changed_navigators: changed_navigators(&self.state, &next),
        };
        self.state = Arc::clone(&next);
        self.publish(change);
        Ok(next)
    }

    /// Replace the whole state, e.g. after restoring a snapshot, and
    /// publish the change.
    pub fn replace(&mut self, state: NavigationState<E>) {
        let next = Arc::new(state);
        let change = StateChange {
            current_navigator_uid: next.current_navigator_uid.clone(),
            changed_navigators: changed_navigators(&self.state, &next),
        };
        self.state = next;
        self.publish(change);
    }

    /// Reset to the empty state and clear the restoration stack.
    pub fn reset(&mut self) {
        let previous = std::mem::replace(&mut self.state, initial_state());
        self.reducer = Reducer::new();
        let change = StateChange {
            current_navigator_uid: None,
            changed_navigators: changed_navigators(&previous, &self.state),
        };
        self.publish(change);
    }

    fn publish(&self, change: StateChange) {
        let receivers = self.changes.send(change).unwrap_or(0);
        trace!(receivers, "navigation state change published");
    }
}

impl<E> Default for NavigationStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for NavigationStore<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigationStore")
            .field("state", &self.state)
            .field("reducer", &self.reducer)
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}

/// UIDs whose entry differs by reference between the two states, in
/// sorted order.
fn changed_navigators<E>(
    before: &NavigationState<E>,
    after: &NavigationState<E>,
) -> Vec<NavigatorUid> {
    let mut changed: Vec<NavigatorUid> = after
        .navigators
        .iter()
        .filter(|(uid, navigator)| {
            before
                .navigators
                .get(*uid)
                .is_none_or(|previous| !Arc::ptr_eq(previous, navigator))
        })
        .map(|(uid, _)| uid.clone())
        .collect();
    changed.extend(
        before
            .navigators
            .keys()
            .filter(|uid| !after.navigators.contains_key(*uid))
            .cloned(),
    );
    changed.sort();
    changed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use waypoint_router::{Route, RouteConfig};
    use waypoint_types::{NavigatorType, Params, RouteKey};

    use super::*;

    fn route(name: &str) -> Route<String> {
        Route::new(
            RouteKey::new(),
            name,
            Params::new(),
            RouteConfig::new(),
            Arc::new(|route: &Route<String>| route.route_name().to_owned()),
        )
    }

    fn push(navigator: &str, name: &str) -> Action<String> {
        Action::Push {
            navigator_uid: NavigatorUid::from(navigator),
            child: route(name),
        }
    }

    #[test]
    fn dispatch_publishes_changed_navigators() {
        let mut store = NavigationStore::new();
        store.dispatch(push("a", "home")).unwrap();
        let mut rx = store.subscribe();

        store.dispatch(push("b", "modal")).unwrap();
        let change = rx.try_recv().unwrap();
        assert_eq!(change.current_navigator_uid, Some(NavigatorUid::from("b")));
        assert_eq!(change.changed_navigators, vec![NavigatorUid::from("b")]);
    }

    #[test]
    fn no_op_dispatch_publishes_nothing() {
        let mut store = NavigationStore::new();
        store.dispatch(push("a", "home")).unwrap();
        let before = Arc::clone(store.state());
        let mut rx = store.subscribe();

        let after = store
            .dispatch(Action::Pop {
                navigator_uid: NavigatorUid::from("a"),
            })
            .unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failed_dispatch_keeps_state() {
        let mut store: NavigationStore<String> = NavigationStore::new();
        store.dispatch(push("a", "home")).unwrap();
        let before = Arc::clone(store.state());

        let err = store
            .dispatch(Action::JumpToTab {
                navigator_uid: NavigatorUid::from("a"),
                tab: route("feed"),
            })
            .unwrap_err();
        assert!(matches!(err, NavigationError::WrongNavigatorType { .. }));
        assert!(Arc::ptr_eq(&before, store.state()));
    }

    #[test]
    fn removal_is_reported_and_focus_restored() {
        let mut store = NavigationStore::new();
        store.dispatch(push("a", "home")).unwrap();
        store.dispatch(push("b", "modal")).unwrap();
        let mut rx = store.subscribe();

        store
            .dispatch(Action::RemoveNavigator {
                navigator_uid: NavigatorUid::from("b"),
            })
            .unwrap();
        let change = rx.try_recv().unwrap();
        assert_eq!(change.changed_navigators, vec![NavigatorUid::from("b")]);
        assert_eq!(
            store.current_navigator().map(|n| n.navigator_uid.clone()),
            Some(NavigatorUid::from("a"))
        );
        assert_eq!(
            store.navigator(&NavigatorUid::from("a")).map(|n| n.navigator_type),
            Some(NavigatorType::Stack)
        );
    }

    #[test]
    fn reset_clears_state_and_restoration() {
        let mut store = NavigationStore::from_settings(&StoreSettings::default());
        store.dispatch(push("a", "home")).unwrap();
        assert_eq!(store.reducer().restoration_stack().len(), 1);
        let mut rx = store.subscribe();

        store.reset();
        assert!(store.state().navigators.is_empty());
        assert!(store.reducer().restoration_stack().is_empty());
        assert_eq!(rx.try_recv().unwrap().changed_navigators, vec![NavigatorUid::from("a")]);
    }
}
