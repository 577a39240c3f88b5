//! Collaborator ports consumed by the selection widget.
//!
//! The widget does not detect pointer interactions or move input focus
//! itself. Hosts provide both capabilities through the traits in this
//! module:
//!
//! - [`OutsidePointerPort`] - notifies the widget when a pointer interaction
//!   happens outside its region. The widget subscribes on mount and
//!   unsubscribes on unmount.
//! - [`FocusPort`] - moves input focus to the widget's search box.
//!
//! Dismissals travel over a channel: the port holds a [`DismissHandle`] and
//! calls [`DismissHandle::dismiss`] once per qualifying interaction. The
//! widget drains queued dismissals at the start of every event it handles and
//! every scheduling turn.
//!
//! [`PointerRegistry`] is a ready-made port for hosts that already know which
//! region a pointer press landed in.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use horizon_select_core::logging::targets;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

// ============================================================================
// Identifiers
// ============================================================================

/// A process-unique identifier for a widget's on-screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl RegionId {
    /// Allocate a new region identifier.
    pub fn next() -> Self {
        static NEXT_REGION_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this region ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region-{}", self.0)
    }
}

new_key_type! {
    /// Identifies one outside-pointer subscription.
    pub struct SubscriptionId;
}

// ============================================================================
// Dismissal Channel
// ============================================================================

/// Sending half of a widget's dismissal queue.
///
/// Cloneable and cheap; held by the outside-pointer port for as long as the
/// widget is subscribed.
#[derive(Debug, Clone)]
pub struct DismissHandle {
    sender: Sender<()>,
}

impl DismissHandle {
    /// Queue one dismissal for the widget.
    ///
    /// Returns `false` if the widget no longer exists.
    pub fn dismiss(&self) -> bool {
        self.sender.send(()).is_ok()
    }
}

/// Receiving half of a widget's dismissal queue.
#[derive(Debug)]
pub struct DismissReceiver {
    receiver: Receiver<()>,
}

impl DismissReceiver {
    /// Take every queued dismissal, returning how many there were.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(()) => count += 1,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        count
    }
}

/// Create a connected dismissal handle and receiver.
pub fn dismiss_channel() -> (DismissHandle, DismissReceiver) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (DismissHandle { sender }, DismissReceiver { receiver })
}

// ============================================================================
// Ports
// ============================================================================

/// Detects pointer interactions outside a registered region.
///
/// While subscribed, implementations call [`DismissHandle::dismiss`] exactly
/// once per pointer interaction that lands outside `region`.
pub trait OutsidePointerPort: Send {
    /// Start watching `region`.
    fn subscribe(&mut self, region: RegionId, handle: DismissHandle) -> SubscriptionId;

    /// Stop watching. Unknown IDs are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Moves input focus programmatically.
pub trait FocusPort: Send {
    /// Focus the search input belonging to `region`.
    fn focus_search_input(&mut self, region: RegionId);
}

impl<F> FocusPort for F
where
    F: FnMut(RegionId) + Send,
{
    fn focus_search_input(&mut self, region: RegionId) {
        self(region)
    }
}

// ============================================================================
// Pointer Registry
// ============================================================================

struct Watch {
    region: RegionId,
    handle: DismissHandle,
}

/// An outside-pointer detector driven by hit-tested pointer presses.
///
/// The host reports every pointer press with the region it landed in (or
/// `None` for empty space); every subscribed widget whose region was missed
/// receives one dismissal.
///
/// Share one registry between widgets through [`SharedPointerRegistry`].
#[derive(Default)]
pub struct PointerRegistry {
    watches: SlotMap<SubscriptionId, Watch>,
}

impl PointerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry wrapped for sharing between widgets.
    pub fn shared() -> SharedPointerRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.watches.len()
    }

    /// Report a pointer press that landed in `hit`.
    ///
    /// Returns the number of widgets that were dismissed.
    pub fn pointer_pressed(&self, hit: Option<RegionId>) -> usize {
        let mut dismissed = 0;
        for watch in self.watches.values() {
            if Some(watch.region) != hit && watch.handle.dismiss() {
                dismissed += 1;
            }
        }
        tracing::trace!(target: targets::CONTROLLER, ?hit, dismissed, "pointer pressed");
        dismissed
    }
}

impl OutsidePointerPort for PointerRegistry {
    fn subscribe(&mut self, region: RegionId, handle: DismissHandle) -> SubscriptionId {
        self.watches.insert(Watch { region, handle })
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.watches.remove(id);
    }
}

impl fmt::Debug for PointerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerRegistry")
            .field("subscriptions", &self.watches.len())
            .finish()
    }
}

/// A pointer registry shared between several widgets and the host.
pub type SharedPointerRegistry = Arc<Mutex<PointerRegistry>>;

impl OutsidePointerPort for SharedPointerRegistry {
    fn subscribe(&mut self, region: RegionId, handle: DismissHandle) -> SubscriptionId {
        self.lock().subscribe(region, handle)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.lock().unsubscribe(id);
    }
}
