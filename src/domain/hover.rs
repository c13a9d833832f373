use serde::{Deserialize, Serialize};

/// Hover interaction state for the active candidate image.
///
/// State transitions:
/// - Idle -> Debouncing (pointer enters, debounce timer starts)
/// - Debouncing -> Idle (pointer leaves or page scrolls before the timer fires)
/// - Debouncing -> Showing (timer fires, loading tooltip shown, lookup started)
/// - Showing -> Idle (pointer leaves or page scrolls, tooltip hidden, lookup cancelled)
/// - Showing -> Showing (pointer moves, tooltip repositioned)
///
/// Images other than the active one are always Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Debouncing,
    Showing,
}

/// Input events driving [`HoverState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    PointerEnter,
    PointerLeave,
    PointerMove,
    TimerFired,
    Scroll,
}

impl HoverState {
    /// Apply an event. Events that make no sense in the current state leave
    /// it unchanged.
    #[must_use]
    pub fn next(self, event: HoverEvent) -> HoverState {
        use HoverEvent::*;
        match (self, event) {
            (HoverState::Idle, PointerEnter) => HoverState::Debouncing,
            (HoverState::Debouncing, PointerLeave | Scroll) => HoverState::Idle,
            (HoverState::Debouncing, TimerFired) => HoverState::Showing,
            (HoverState::Showing, PointerLeave | Scroll) => HoverState::Idle,
            (state, _) => state,
        }
    }

    /// Whether a pending debounce timer or a visible tooltip must be torn down.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        !matches!(self, HoverState::Idle)
    }
}
