//! Navigation actions.
//!
//! Every state transition is described by one [`Action`]. The reducer
//! matches on the variant exhaustively; [`Action::Unknown`] carries kinds
//! this version does not understand and leaves the state untouched.

use waypoint_router::{Route, RouteConfig};
use waypoint_types::{LocalAlert, NavigatorType, NavigatorUid};

/// A navigation state transition request.
pub enum Action<E> {
    /// Replace the whole state with the empty state.
    Initialize,

    /// Focus a navigator, (re)creating its entry when `routes` is given.
    SetCurrentNavigator {
        /// Navigator to focus.
        navigator_uid: NavigatorUid,
        /// Owning navigator, if nested.
        parent_navigator_uid: Option<NavigatorUid>,
        /// Kind of navigator to create.
        navigator_type: NavigatorType,
        /// Defaults applied beneath every child route's config.
        default_route_config: RouteConfig,
        /// Initial routes; `None` only refocuses an existing navigator.
        routes: Option<Vec<Route<E>>>,
        /// Initially active route.
        index: usize,
    },

    /// Tear down a navigator and restore the previous focus.
    RemoveNavigator {
        /// Navigator to remove.
        navigator_uid: NavigatorUid,
    },

    /// Push a route onto a navigator, creating a stack if needed.
    Push {
        /// Target navigator.
        navigator_uid: NavigatorUid,
        /// Route to push.
        child: Route<E>,
    },

    /// Remove the active route of a navigator.
    Pop {
        /// Target navigator.
        navigator_uid: NavigatorUid,
    },

    /// Replace all routes of a navigator, bypassing push/pop history.
    ImmediatelyResetStack {
        /// Target navigator.
        navigator_uid: NavigatorUid,
        /// New routes.
        routes: Vec<Route<E>>,
        /// Active route; `None` selects the last one.
        index: Option<usize>,
    },

    /// Replace the route at `index` in place.
    UpdateRouteAtIndex {
        /// Target navigator.
        navigator_uid: NavigatorUid,
        /// Position to replace.
        index: usize,
        /// Replacement route.
        new_route: Route<E>,
    },

    /// Attach a local alert to a navigator.
    ShowLocalAlert {
        /// Target navigator.
        navigator_uid: NavigatorUid,
        /// Alert to show.
        alert: LocalAlert,
    },

    /// Clear a navigator's local alert.
    HideLocalAlert {
        /// Target navigator.
        navigator_uid: NavigatorUid,
    },

    /// Select an item of a drawer navigator.
    JumpToItem {
        /// Target drawer navigator.
        navigator_uid: NavigatorUid,
        /// Item to select.
        item: Route<E>,
    },

    /// Select a tab of a tab navigator.
    JumpToTab {
        /// Target tab navigator.
        navigator_uid: NavigatorUid,
        /// Tab to select.
        tab: Route<E>,
    },

    /// Close the top entry of a drawer navigator.
    ToggleDrawer {
        /// Target navigator.
        navigator_uid: NavigatorUid,
    },

    /// An action kind this reducer does not handle.
    Unknown {
        /// The unrecognized kind.
        kind: String,
    },
}

/// Discriminant of an [`Action`], for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// [`Action::Initialize`]
    Initialize,
    /// [`Action::SetCurrentNavigator`]
    SetCurrentNavigator,
    /// [`Action::RemoveNavigator`]
    RemoveNavigator,
    /// [`Action::Push`]
    Push,
    /// [`Action::Pop`]
    Pop,
    /// [`Action::ImmediatelyResetStack`]
    ImmediatelyResetStack,
    /// [`Action::UpdateRouteAtIndex`]
    UpdateRouteAtIndex,
    /// [`Action::ShowLocalAlert`]
    ShowLocalAlert,
    /// [`Action::HideLocalAlert`]
    HideLocalAlert,
    /// [`Action::JumpToItem`]
    JumpToItem,
    /// [`Action::JumpToTab`]
    JumpToTab,
    /// [`Action::ToggleDrawer`]
    ToggleDrawer,
    /// [`Action::Unknown`]
    Unknown,
}

impl ActionKind {
    /// Wire name of the action kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "INITIALIZE",
            Self::SetCurrentNavigator => "SET_CURRENT_NAVIGATOR",
            Self::RemoveNavigator => "REMOVE_NAVIGATOR",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::ImmediatelyResetStack => "IMMEDIATELY_RESET_STACK",
            Self::UpdateRouteAtIndex => "UPDATE_ROUTE_AT_INDEX",
            Self::ShowLocalAlert => "SHOW_LOCAL_ALERT_BAR",
            Self::HideLocalAlert => "HIDE_LOCAL_ALERT_BAR",
            Self::JumpToItem => "JUMP_TO_ITEM",
            Self::JumpToTab => "JUMP_TO_TAB",
            Self::ToggleDrawer => "TOGGLE_DRAWER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<E> Action<E> {
    /// The action's kind.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Initialize => ActionKind::Initialize,
            Self::SetCurrentNavigator { .. } => ActionKind::SetCurrentNavigator,
            Self::RemoveNavigator { .. } => ActionKind::RemoveNavigator,
            Self::Push { .. } => ActionKind::Push,
            Self::Pop { .. } => ActionKind::Pop,
            Self::ImmediatelyResetStack { .. } => ActionKind::ImmediatelyResetStack,
            Self::UpdateRouteAtIndex { .. } => ActionKind::UpdateRouteAtIndex,
            Self::ShowLocalAlert { .. } => ActionKind::ShowLocalAlert,
            Self::HideLocalAlert { .. } => ActionKind::HideLocalAlert,
            Self::JumpToItem { .. } => ActionKind::JumpToItem,
            Self::JumpToTab { .. } => ActionKind::JumpToTab,
            Self::ToggleDrawer { .. } => ActionKind::ToggleDrawer,
            Self::Unknown { .. } => ActionKind::Unknown,
        }
    }

    /// The navigator the action targets, if it targets one.
    pub const fn navigator_uid(&self) -> Option<&NavigatorUid> {
        match self {
            Self::Initialize | Self::Unknown { .. } => None,
            Self::SetCurrentNavigator { navigator_uid, .. }
            | Self::RemoveNavigator { navigator_uid }
            | Self::Push { navigator_uid, .. }
            | Self::Pop { navigator_uid }
            | Self::ImmediatelyResetStack { navigator_uid, .. }
            | Self::UpdateRouteAtIndex { navigator_uid, .. }
            | Self::ShowLocalAlert { navigator_uid, .. }
            | Self::HideLocalAlert { navigator_uid }
            | Self::JumpToItem { navigator_uid, .. }
            | Self::JumpToTab { navigator_uid, .. }
            | Self::ToggleDrawer { navigator_uid } => Some(navigator_uid),
        }
    }

    /// Focus a navigator that already exists, without touching its routes.
    pub fn focus(navigator_uid: impl Into<NavigatorUid>) -> Self {
        Self::SetCurrentNavigator {
            navigator_uid: navigator_uid.into(),
            parent_navigator_uid: None,
            navigator_type: NavigatorType::Stack,
            default_route_config: RouteConfig::new(),
            routes: None,
            index: 0,
        }
    }

    /// Register a navigator with its initial routes and focus it.
    pub fn register(
        navigator_uid: impl Into<NavigatorUid>,
        navigator_type: NavigatorType,
        routes: Vec<Route<E>>,
        index: usize,
    ) -> Self {
        Self::SetCurrentNavigator {
            navigator_uid: navigator_uid.into(),
            parent_navigator_uid: None,
            navigator_type,
            default_route_config: RouteConfig::new(),
            routes: Some(routes),
            index,
        }
    }
}

impl<E> core::fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind())
            .field("navigator_uid", &self.navigator_uid())
            .finish_non_exhaustive()
    }
}
