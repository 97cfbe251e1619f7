//! Mobile menu open/close sequencing.
//!
//! The menu has no state of its own: whether it is open is read back from
//! the `hidden` class on the container. Each transition is one immediate DOM
//! step followed by one deferred step so the slide transition can play.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Id of the menu container.
pub const MENU_ID: &str = "mobileMenu";
/// Selector of the sliding panel inside the container.
pub const PANEL_SELECTOR: &str = "#mobileMenu > div:last-child";
/// Class hiding the container.
pub const HIDDEN_CLASS: &str = "hidden";
/// Class parking the panel off-screen.
pub const OFFSCREEN_CLASS: &str = "-translate-x-full";

/// Delays between the immediate and deferred step of each transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuTimings {
    /// Delay before sliding the panel in after revealing the container.
    pub open_delay_ms: u32,
    /// Delay before hiding the container after sliding the panel out; matches
    /// the CSS transition duration.
    pub close_delay_ms: u32,
}

impl Default for MenuTimings {
    fn default() -> Self {
        Self {
            open_delay_ms: 10,
            close_delay_ms: 300,
        }
    }
}

/// Visibility of the menu as reflected in the DOM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// Container hidden.
    Closed,
    /// Container visible.
    Open,
}

impl MenuState {
    /// State implied by the container's `hidden` class.
    #[must_use]
    pub const fn from_hidden(hidden: bool) -> Self {
        if hidden { Self::Closed } else { Self::Open }
    }
}

/// Requested transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Reveal and slide in.
    Open,
    /// Slide out and hide.
    Close,
}

/// Single DOM mutation on the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuStep {
    /// Remove [`HIDDEN_CLASS`] from the container.
    Reveal,
    /// Add [`HIDDEN_CLASS`] to the container.
    Hide,
    /// Remove [`OFFSCREEN_CLASS`] from the panel.
    SlideIn,
    /// Add [`OFFSCREEN_CLASS`] to the panel.
    SlideOut,
}

/// Element that triggers a transition when clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuTrigger {
    /// Hamburger button in the header.
    MenuButton,
    /// Close button inside the panel.
    CloseButton,
    /// Dimmed overlay behind the panel.
    Overlay,
    /// Any link inside the menu.
    Link,
}

impl MenuTrigger {
    /// Triggers addressed by element id.
    pub const BY_ID: [Self; 3] = [Self::MenuButton, Self::CloseButton, Self::Overlay];

    /// Element id of the trigger, or `None` for the link group.
    #[must_use]
    pub const fn element_id(self) -> Option<&'static str> {
        match self {
            Self::MenuButton => Some("mobileMenuButton"),
            Self::CloseButton => Some("closeMobileMenu"),
            Self::Overlay => Some("mobileMenuOverlay"),
            Self::Link => None,
        }
    }

    /// Transition requested by the trigger.
    #[must_use]
    pub const fn action(self) -> MenuAction {
        match self {
            Self::MenuButton => MenuAction::Open,
            Self::CloseButton | Self::Overlay | Self::Link => MenuAction::Close,
        }
    }
}

/// Immediate step, delay, and deferred step of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuPlan {
    /// Applied synchronously.
    pub immediate: MenuStep,
    /// Wait before the deferred step.
    pub delay: Duration,
    /// Applied after `delay`.
    pub deferred: MenuStep,
    /// State once both steps ran.
    pub settles_to: MenuState,
}

/// Plan the DOM steps for `action`.
#[must_use]
pub fn plan(action: MenuAction, timings: MenuTimings) -> MenuPlan {
    match action {
        MenuAction::Open => MenuPlan {
            immediate: MenuStep::Reveal,
            delay: Duration::from_millis(u64::from(timings.open_delay_ms)),
            deferred: MenuStep::SlideIn,
            settles_to: MenuState::Open,
        },
        MenuAction::Close => MenuPlan {
            immediate: MenuStep::SlideOut,
            delay: Duration::from_millis(u64::from(timings.close_delay_ms)),
            deferred: MenuStep::Hide,
            settles_to: MenuState::Closed,
        },
    }
}

/// Plan `action` from the current `state`; `None` when the menu already
/// settles where the action would leave it.
#[must_use]
pub fn plan_from(state: MenuState, action: MenuAction, timings: MenuTimings) -> Option<MenuPlan> {
    let plan = plan(action, timings);
    (plan.settles_to != state).then_some(plan)
}
