//! Open/close state, search text and port wiring.
//!
//! The [`InteractionController`] owns everything about the widget that is not
//! the option list or the selection: whether the dropdown is open, the
//! two-stage search text, and the connections to the host's
//! [`OutsidePointerPort`] and [`FocusPort`].
//!
//! # State Machine
//!
//! ```text
//!            toggle / open
//!   Closed ----------------> Open
//!     ^                        |
//!     +------------------------+
//!      toggle / close / outside pointer
//! ```
//!
//! Outside pointer interactions are ignored while closed. Search input and
//! selection never change the open state.

use horizon_select_core::logging::targets;
use horizon_select_core::{DeferredValue, Property, Signal};

use crate::config::SearchScheduling;
use crate::port::{
    DismissHandle, DismissReceiver, FocusPort, OutsidePointerPort, RegionId, SubscriptionId,
    dismiss_channel,
};

/// Whether the dropdown is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PopupState {
    /// Dropdown hidden.
    #[default]
    Closed,
    /// Dropdown visible.
    Open,
}

impl PopupState {
    /// Whether this is [`PopupState::Open`].
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Drives the dropdown and the search text.
///
/// # Signals
///
/// - `opened_changed(bool)`: Emitted when the dropdown opens or closes.
pub struct InteractionController {
    region: RegionId,
    state: Property<PopupState>,
    with_search: bool,
    search: DeferredValue<String>,

    outside_pointer: Option<Box<dyn OutsidePointerPort>>,
    subscription: Option<SubscriptionId>,
    focus: Option<Box<dyn FocusPort>>,
    dismiss_handle: DismissHandle,
    dismissals: DismissReceiver,

    /// Signal emitted when the dropdown opens or closes.
    pub opened_changed: Signal<bool>,
}

impl InteractionController {
    /// Create a closed controller for `region`.
    pub fn new(region: RegionId, with_search: bool, scheduling: SearchScheduling) -> Self {
        let (dismiss_handle, dismissals) = dismiss_channel();
        Self {
            region,
            state: Property::new(PopupState::Closed),
            with_search,
            search: DeferredValue::new(String::new(), scheduling.max_lag_turns()),
            outside_pointer: None,
            subscription: None,
            focus: None,
            dismiss_handle,
            dismissals,
            opened_changed: Signal::new(),
        }
    }

    /// The region this controller watches.
    pub fn region(&self) -> RegionId {
        self.region
    }

    // =========================================================================
    // Ports
    // =========================================================================

    /// Install the outside-pointer port.
    ///
    /// If the controller is mounted, the subscription moves to the new port.
    pub fn set_outside_pointer_port(&mut self, port: Box<dyn OutsidePointerPort>) {
        let was_mounted = self.is_mounted();
        self.unmount();
        self.outside_pointer = Some(port);
        if was_mounted {
            self.mount();
        }
    }

    /// Install the focus port.
    pub fn set_focus_port(&mut self, port: Box<dyn FocusPort>) {
        self.focus = Some(port);
    }

    /// Subscribe to outside pointer interactions.
    ///
    /// Does nothing if already mounted or no port is installed.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        if let Some(port) = self.outside_pointer.as_mut() {
            let id = port.subscribe(self.region, self.dismiss_handle.clone());
            self.subscription = Some(id);
            tracing::debug!(target: targets::CONTROLLER, region = %self.region, "mounted");
        }
    }

    /// Release the outside pointer subscription.
    pub fn unmount(&mut self) {
        let Some(id) = self.subscription.take() else {
            return;
        };
        if let Some(port) = self.outside_pointer.as_mut() {
            port.unsubscribe(id);
        }
        // Anything queued before unmounting is stale.
        self.dismissals.drain();
        tracing::debug!(target: targets::CONTROLLER, region = %self.region, "unmounted");
    }

    /// Whether an outside pointer subscription is active.
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// A handle that dismisses this controller, for hosts that detect outside
    /// interactions themselves.
    pub fn dismiss_handle(&self) -> DismissHandle {
        self.dismiss_handle.clone()
    }

    /// Apply every dismissal queued since the last call.
    ///
    /// Returns `true` if the dropdown closed.
    pub fn process_dismissals(&mut self) -> bool {
        if self.dismissals.drain() > 0 {
            self.dismiss_outside()
        } else {
            false
        }
    }

    // =========================================================================
    // Open State
    // =========================================================================

    /// The current popup state.
    pub fn state(&self) -> PopupState {
        self.state.get()
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) -> bool {
        let next = match self.state() {
            PopupState::Closed => PopupState::Open,
            PopupState::Open => PopupState::Closed,
        };
        self.transition(next)
    }

    /// Open the dropdown. Returns `true` if it was closed.
    pub fn open(&mut self) -> bool {
        self.transition(PopupState::Open)
    }

    /// Close the dropdown. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        self.transition(PopupState::Closed)
    }

    /// Handle a pointer interaction outside the widget.
    ///
    /// Closes the dropdown if open; otherwise does nothing.
    pub fn dismiss_outside(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        tracing::trace!(target: targets::CONTROLLER, region = %self.region, "outside pointer");
        self.close()
    }

    fn transition(&mut self, next: PopupState) -> bool {
        if !self.state.set(next) {
            return false;
        }
        tracing::debug!(target: targets::CONTROLLER, region = %self.region, state = ?next, "popup state changed");

        if next.is_open() && self.with_search {
            if let Some(focus) = self.focus.as_mut() {
                focus.focus_search_input(self.region);
            }
        }
        self.opened_changed.emit(next.is_open());
        true
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Whether the search box is enabled.
    pub fn with_search(&self) -> bool {
        self.with_search
    }

    /// Enable or disable the search box.
    pub fn set_with_search(&mut self, with_search: bool) {
        self.with_search = with_search;
    }

    /// Text currently in the search box.
    pub fn search_text(&self) -> &str {
        self.search.immediate()
    }

    /// Search text that filtering and highlighting use.
    ///
    /// Empty when the search box is disabled.
    pub fn effective_search(&self) -> &str {
        if self.with_search {
            self.search.effective()
        } else {
            ""
        }
    }

    /// Whether the effective search is behind the search box.
    pub fn is_search_stale(&self) -> bool {
        self.search.is_stale()
    }

    /// Counter bumped whenever the effective search text changes.
    pub fn search_generation(&self) -> u64 {
        self.search.generation()
    }

    /// Replace the search box text.
    ///
    /// Returns `true` if the effective search changed in this call.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        self.search.set(text.into())
    }

    /// Change the deferral policy.
    pub fn set_search_scheduling(&mut self, scheduling: SearchScheduling) -> bool {
        self.search.set_max_lag_turns(scheduling.max_lag_turns())
    }

    /// Advance one scheduling turn.
    ///
    /// Applies queued dismissals, then advances the search pipeline. Returns
    /// `true` if the effective search changed.
    pub fn tick(&mut self) -> bool {
        self.process_dismissals();
        self.search.tick()
    }

    /// Bring the effective search up to date immediately.
    pub fn flush_search(&mut self) -> bool {
        self.search.flush()
    }
}

impl Drop for InteractionController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("region", &self.region)
            .field("state", &self.state())
            .field("with_search", &self.with_search)
            .field("search_text", &self.search.immediate())
            .field("effective_search", &self.search.effective())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PointerRegistry;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn controller(with_search: bool) -> InteractionController {
        InteractionController::new(RegionId::next(), with_search, SearchScheduling::Immediate)
    }

    #[test]
    fn test_starts_closed() {
        let controller = controller(false);
        assert_eq!(controller.state(), PopupState::Closed);
        assert!(!controller.is_mounted());
    }

    #[test]
    fn test_toggle_and_signal() {
        let mut controller = controller(false);
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        controller.opened_changed.connect(move |open| log_clone.lock().push(*open));

        assert!(controller.toggle());
        assert!(controller.is_open());
        assert!(!controller.open());
        assert!(controller.toggle());
        assert!(!controller.is_open());
        assert!(!controller.close());

        assert_eq!(*log.lock(), vec![true, false]);
    }

    #[test]
    fn test_outside_dismissal_only_when_open() {
        let mut controller = controller(false);
        assert!(!controller.dismiss_outside());
        assert_eq!(controller.state(), PopupState::Closed);

        controller.open();
        assert!(controller.dismiss_outside());
        assert_eq!(controller.state(), PopupState::Closed);
    }

    #[test]
    fn test_focus_on_open_with_search() {
        let focused = Arc::new(Mutex::new(Vec::new()));
        let focused_clone = focused.clone();

        let mut controller = controller(true);
        let region = controller.region();
        controller.set_focus_port(Box::new(move |r: RegionId| focused_clone.lock().push(r)));

        controller.open();
        controller.close();
        controller.toggle();
        assert_eq!(*focused.lock(), vec![region, region]);
    }

    #[test]
    fn test_no_focus_without_search() {
        let focused = Arc::new(Mutex::new(0));
        let focused_clone = focused.clone();

        let mut controller = controller(false);
        controller.set_focus_port(Box::new(move |_: RegionId| *focused_clone.lock() += 1));
        controller.open();
        assert_eq!(*focused.lock(), 0);
    }

    #[test]
    fn test_mount_and_dismiss_through_port() {
        let registry = PointerRegistry::shared();
        let mut controller = controller(false);
        controller.set_outside_pointer_port(Box::new(registry.clone()));
        assert!(!controller.is_mounted());

        controller.mount();
        controller.mount();
        assert!(controller.is_mounted());
        assert_eq!(registry.lock().subscription_count(), 1);

        controller.open();
        registry.lock().pointer_pressed(Some(controller.region()));
        assert!(!controller.process_dismissals());
        assert!(controller.is_open());

        registry.lock().pointer_pressed(None);
        assert!(controller.is_open());
        assert!(controller.process_dismissals());
        assert!(!controller.is_open());

        controller.unmount();
        assert_eq!(registry.lock().subscription_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry = PointerRegistry::shared();
        {
            let mut controller = controller(false);
            controller.set_outside_pointer_port(Box::new(registry.clone()));
            controller.mount();
            assert_eq!(registry.lock().subscription_count(), 1);
        }
        assert_eq!(registry.lock().subscription_count(), 0);
    }

    #[test]
    fn test_search_does_not_change_open_state() {
        let mut controller = controller(true);
        controller.set_search_text("abc");
        assert!(!controller.is_open());

        controller.open();
        controller.set_search_text("");
        assert!(controller.is_open());
    }

    #[test]
    fn test_effective_search_empty_without_search_box() {
        let mut controller = controller(false);
        controller.set_search_text("abc");
        assert_eq!(controller.search_text(), "abc");
        assert_eq!(controller.effective_search(), "");

        controller.set_with_search(true);
        assert_eq!(controller.effective_search(), "abc");
    }

    #[test]
    fn test_deferred_search_commits_on_quiet_turn() {
        let mut controller = InteractionController::new(
            RegionId::next(),
            true,
            SearchScheduling::Deferred { max_lag_turns: 2 },
        );
        assert!(!controller.set_search_text("op"));
        assert!(controller.is_search_stale());
        assert_eq!(controller.effective_search(), "");

        assert!(!controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.effective_search(), "op");
        assert_eq!(controller.search_generation(), 1);
    }

    #[test]
    fn test_switching_to_immediate_flushes() {
        let mut controller = InteractionController::new(
            RegionId::next(),
            true,
            SearchScheduling::default(),
        );
        controller.set_search_text("x");
        assert!(controller.set_search_scheduling(SearchScheduling::Immediate));
        assert_eq!(controller.effective_search(), "x");
    }
}
