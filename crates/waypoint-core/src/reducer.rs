//! The navigation state reducer.
//!
//! [`Reducer::reduce`] maps a state and an [`Action`] to the next state.
//! It never mutates its input: every transition that touches a navigator
//! returns a new root holding a new navigator mapping, in which only the
//! touched entry is new and every other entry is shared by reference.
//! Transitions that change nothing return the input `Arc` itself.
//!
//! The one piece of state outside the tree is the restoration stack: the
//! focus targets saved when a push moves focus to another navigator, popped
//! again when a navigator is removed. It belongs to the [`Reducer`] value,
//! so independent navigation trees keep independent stacks, and it is only
//! touched once a transition is known to succeed.

use std::sync::Arc;

use tracing::{debug, trace};
use waypoint_router::{Route, RouteConfig};
use waypoint_types::{LocalAlert, NavigatorType, NavigatorUid};

use crate::action::Action;
use crate::error::NavigationError;
use crate::state::{NavigationState, NavigatorState};

/// The empty navigation state.
pub fn initial_state<E>() -> Arc<NavigationState<E>> {
    Arc::new(NavigationState::new())
}

/// Applies actions to navigation state and owns the restoration stack.
#[derive(Debug, Default)]
pub struct Reducer {
    navigators_to_restore: Vec<Option<NavigatorUid>>,
}

impl Reducer {
    /// A reducer with an empty restoration stack.
    pub const fn new() -> Self {
        Self {
            navigators_to_restore: Vec::new(),
        }
    }

    /// Focus targets saved by pushes, oldest first.
    pub fn restoration_stack(&self) -> &[Option<NavigatorUid>] {
        &self.navigators_to_restore
    }

    /// Like [`reduce`](Self::reduce), starting from the empty state when
    /// `state` is `None`.
    ///
    /// # Errors
    ///
    /// See [`reduce`](Self::reduce).
    pub fn reduce_or_init<E>(
        &mut self,
        state: Option<&Arc<NavigationState<E>>>,
        action: Action<E>,
    ) -> Result<Arc<NavigationState<E>>, NavigationError> {
        match state {
            Some(state) => self.reduce(state, action),
            None => self.reduce(&initial_state(), action),
        }
    }

    /// Compute the state that follows `state` under `action`.
    ///
    /// # Errors
    ///
    /// - [`NavigationError::NavigatorNotFound`] for Pop, `ToggleDrawer`,
    ///   `UpdateRouteAtIndex`, `RemoveNavigator`, `JumpToItem` and
    ///   `JumpToTab` on a missing navigator.
    /// - [`NavigationError::WrongNavigatorType`] for `JumpToItem` on a
    ///   non-drawer or `JumpToTab` on a non-tab navigator.
    /// - [`NavigationError::IndexOutOfBounds`] when an index does not point
    ///   into the route list.
    /// - [`NavigationError::EmptyRoutes`] for a reset without routes.
    /// - [`NavigationError::DuplicateRouteKey`] for a push of a route whose
    ///   key the navigator already holds.
    pub fn reduce<E>(
        &mut self,
        state: &Arc<NavigationState<E>>,
        action: Action<E>,
    ) -> Result<Arc<NavigationState<E>>, NavigationError> {
        debug!(
            action = %action.kind(),
            navigator = action.navigator_uid().map_or("-", NavigatorUid::as_str),
            "reducing navigation action"
        );

        match action {
            Action::Initialize => Ok(self.initialize()),
            Action::SetCurrentNavigator {
                navigator_uid,
                parent_navigator_uid,
                navigator_type,
                default_route_config,
                routes,
                index,
            } => set_current_navigator(
                state,
                NavigatorState {
                    navigator_uid,
                    routes: Vec::new(),
                    index,
                    navigator_type,
                    parent_navigator_uid,
                    default_route_config,
                    alert: None,
                },
                routes,
            ),
            Action::RemoveNavigator { navigator_uid } => {
                self.remove_navigator(state, &navigator_uid)
            }
            Action::Push {
                navigator_uid,
                child,
            } => self.push(state, navigator_uid, &child),
            Action::Pop { navigator_uid } | Action::ToggleDrawer { navigator_uid } => {
                pop(state, &navigator_uid)
            }
            Action::ImmediatelyResetStack {
                navigator_uid,
                routes,
                index,
            } => reset(state, navigator_uid, &routes, index),
            Action::UpdateRouteAtIndex {
                navigator_uid,
                index,
                new_route,
            } => update_route_at_index(state, &navigator_uid, index, new_route),
            Action::ShowLocalAlert {
                navigator_uid,
                alert,
            } => Ok(show_local_alert(state, navigator_uid, alert)),
            Action::HideLocalAlert { navigator_uid } => Ok(hide_local_alert(state, &navigator_uid)),
            Action::JumpToItem {
                navigator_uid,
                item,
            } => update_selected(state, navigator_uid, item, NavigatorType::Drawer),
            Action::JumpToTab { navigator_uid, tab } => {
                update_selected(state, navigator_uid, tab, NavigatorType::Tab)
            }
            Action::Unknown { kind } => {
                trace!(kind, "ignoring unrecognized navigation action");
                Ok(Arc::clone(state))
            }
        }
    }

    fn initialize<E>(&mut self) -> Arc<NavigationState<E>> {
        self.navigators_to_restore.clear();
        initial_state()
    }

    fn remove_navigator<E>(
        &mut self,
        state: &Arc<NavigationState<E>>,
        navigator_uid: &NavigatorUid,
    ) -> Result<Arc<NavigationState<E>>, NavigationError> {
        let parent = existing(state, navigator_uid)?.parent_navigator_uid.clone();
        let remaining = state.without_navigator(navigator_uid);
        // Focus may only land on a navigator that survives the removal.
        let restored = match self.navigators_to_restore.pop() {
            Some(Some(previous)) if remaining.navigators.contains_key(&previous) => Some(previous),
            _ => parent.filter(|uid| remaining.navigators.contains_key(uid)),
        };
        Ok(Arc::new(remaining.focused_on(restored)))
    }

    fn push<E>(
        &mut self,
        state: &Arc<NavigationState<E>>,
        navigator_uid: NavigatorUid,
        child: &Route<E>,
    ) -> Result<Arc<NavigationState<E>>, NavigationError> {
        let mut navigator = state
            .navigator(&navigator_uid)
            .cloned()
            .unwrap_or_else(|| NavigatorState::new(navigator_uid.clone(), NavigatorType::Stack));
        if navigator.index_of(child.key()).is_some() {
            return Err(NavigationError::DuplicateRouteKey {
                navigator_uid,
                route_key: child.key(),
            });
        }

        if state.current_navigator_uid.as_ref() != Some(&navigator_uid) {
            self.navigators_to_restore
                .push(state.current_navigator_uid.clone());
        }

        let child = child.configured_under(&navigator.default_route_config);
        navigator.routes.push(child);
        navigator.index = last_index(&navigator.routes);

        Ok(Arc::new(
            state.with_navigator(navigator).focused_on(Some(navigator_uid)),
        ))
    }
}

fn existing<'a, E>(
    state: &'a NavigationState<E>,
    navigator_uid: &NavigatorUid,
) -> Result<&'a NavigatorState<E>, NavigationError> {
    state
        .navigator(navigator_uid)
        .ok_or_else(|| NavigationError::NavigatorNotFound(navigator_uid.clone()))
}

const fn last_index<T>(items: &[T]) -> usize {
    items.len().saturating_sub(1)
}

/// An empty route list may only be paired with index 0.
fn check_index(
    navigator_uid: &NavigatorUid,
    index: usize,
    len: usize,
) -> Result<(), NavigationError> {
    if index < len || (len == 0 && index == 0) {
        Ok(())
    } else {
        Err(NavigationError::IndexOutOfBounds {
            navigator_uid: navigator_uid.clone(),
            index,
            len,
        })
    }
}

fn configure_all<E>(routes: &[Route<E>], defaults: &RouteConfig) -> Vec<Route<E>> {
    routes
        .iter()
        .map(|route| route.configured_under(defaults))
        .collect()
}

fn set_current_navigator<E>(
    state: &Arc<NavigationState<E>>,
    mut navigator: NavigatorState<E>,
    routes: Option<Vec<Route<E>>>,
) -> Result<Arc<NavigationState<E>>, NavigationError> {
    let navigator_uid = navigator.navigator_uid.clone();
    let Some(routes) = routes else {
        if state.navigator(&navigator_uid).is_none() {
            trace!(navigator = %navigator_uid, "nothing to focus");
            return Ok(Arc::clone(state));
        }
        return Ok(Arc::new(
            state.as_ref().clone().focused_on(Some(navigator_uid)),
        ));
    };

    check_index(&navigator_uid, navigator.index, routes.len())?;
    navigator.routes = configure_all(&routes, &navigator.default_route_config);
    Ok(Arc::new(
        state.with_navigator(navigator).focused_on(Some(navigator_uid)),
    ))
}

fn pop<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: &NavigatorUid,
) -> Result<Arc<NavigationState<E>>, NavigationError> {
    let navigator = existing(state, navigator_uid)?;
    if navigator.index == 0 {
        trace!(navigator = %navigator_uid, "already at the first route");
        return Ok(Arc::clone(state));
    }

    let mut navigator = navigator.clone();
    if navigator.index < navigator.routes.len() {
        navigator.routes.remove(navigator.index);
    }
    navigator.index = navigator.index.saturating_sub(1);
    Ok(Arc::new(state.with_navigator(navigator)))
}

fn reset<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: NavigatorUid,
    routes: &[Route<E>],
    index: Option<usize>,
) -> Result<Arc<NavigationState<E>>, NavigationError> {
    if routes.is_empty() {
        return Err(NavigationError::EmptyRoutes { navigator_uid });
    }
    let index = index.unwrap_or_else(|| last_index(routes));
    check_index(&navigator_uid, index, routes.len())?;

    let mut navigator = state
        .navigator(&navigator_uid)
        .cloned()
        .unwrap_or_else(|| NavigatorState::new(navigator_uid.clone(), NavigatorType::Stack));
    navigator.routes = configure_all(routes, &navigator.default_route_config);
    navigator.index = index;

    Ok(Arc::new(
        state.with_navigator(navigator).focused_on(Some(navigator_uid)),
    ))
}

fn update_route_at_index<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: &NavigatorUid,
    index: usize,
    new_route: Route<E>,
) -> Result<Arc<NavigationState<E>>, NavigationError> {
    let mut navigator = existing(state, navigator_uid)?.clone();
    let len = navigator.routes.len();
    let Some(slot) = navigator.routes.get_mut(index) else {
        return Err(NavigationError::IndexOutOfBounds {
            navigator_uid: navigator_uid.clone(),
            index,
            len,
        });
    };
    *slot = new_route;
    Ok(Arc::new(state.with_navigator(navigator)))
}

fn show_local_alert<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: NavigatorUid,
    alert: LocalAlert,
) -> Arc<NavigationState<E>> {
    let mut navigator = state
        .navigator(&navigator_uid)
        .cloned()
        .unwrap_or_else(|| NavigatorState::new(navigator_uid, NavigatorType::Stack));
    navigator.alert = Some(alert);
    Arc::new(state.with_navigator(navigator))
}

fn hide_local_alert<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: &NavigatorUid,
) -> Arc<NavigationState<E>> {
    let Some(navigator) = state.navigator(navigator_uid) else {
        return Arc::clone(state);
    };
    let mut navigator = navigator.clone();
    navigator.alert = None;
    Arc::new(state.with_navigator(navigator))
}

/// Select `target` in a tab or drawer navigator: an entry already present
/// (by key) moves to the end, a new one is appended.
fn update_selected<E>(
    state: &Arc<NavigationState<E>>,
    navigator_uid: NavigatorUid,
    target: Route<E>,
    expected: NavigatorType,
) -> Result<Arc<NavigationState<E>>, NavigationError> {
    let navigator = existing(state, &navigator_uid)?;
    if navigator.navigator_type != expected {
        return Err(NavigationError::WrongNavigatorType {
            navigator_uid,
            expected,
            actual: navigator.navigator_type,
        });
    }
    if navigator
        .active_route()
        .is_some_and(|selected| selected.key() == target.key())
    {
        trace!(navigator = %navigator_uid, "target already selected");
        return Ok(Arc::clone(state));
    }

    let mut navigator = navigator.clone();
    match navigator.index_of(target.key()) {
        Some(position) => {
            let moved = navigator.routes.remove(position);
            navigator.routes.push(moved);
        }
        None => navigator.routes.push(target),
    }
    navigator.index = last_index(&navigator.routes);

    Ok(Arc::new(
        state.with_navigator(navigator).focused_on(Some(navigator_uid)),
    ))
}
