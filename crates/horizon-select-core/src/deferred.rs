//! Deferred values for low-priority derived state.
//!
//! A [`DeferredValue<T>`] is a two-stage value pipeline. The *immediate* value
//! follows every write, while the *effective* value (the one expensive derived
//! state is computed from) is allowed to lag behind by a bounded number of
//! scheduling turns.
//!
//! # Scheduling Turns
//!
//! The host advances the pipeline by calling [`DeferredValue::tick`] once per
//! scheduling turn (a frame, an idle callback, an event loop iteration):
//!
//! - A turn in which new input arrived is spent on the urgent update (echoing
//!   the input) and leaves the effective value alone.
//! - The first quiet turn commits the latest immediate value.
//! - Under continuous input the value is committed anyway once it has been
//!   deferred for `max_lag_turns` turns.
//!
//! Intermediate values that were superseded before a commit are never
//! observed through [`effective`](DeferredValue::effective).
//!
//! # Example
//!
//! ```
//! use horizon_select_core::DeferredValue;
//!
//! let mut search = DeferredValue::new(String::new(), 2);
//! search.set("ap".to_string());
//! assert_eq!(search.immediate(), "ap");
//! assert_eq!(search.effective(), "");
//!
//! // The turn that received the keystroke defers; the next one commits.
//! assert!(!search.tick());
//! assert!(search.tick());
//! assert_eq!(search.effective(), "ap");
//! ```

use std::fmt;

use crate::logging::targets;

/// A value whose effective view may lag its immediate view by a bounded
/// number of scheduling turns.
#[derive(Clone)]
pub struct DeferredValue<T> {
    immediate: T,
    effective: T,
    max_lag_turns: u32,
    /// Turns the pending value has been deferred so far.
    lag_turns: u32,
    /// Whether the effective value is behind the immediate value.
    pending: bool,
    /// Whether input arrived since the last turn.
    input_this_turn: bool,
    /// Bumped every time the effective value changes.
    generation: u64,
}

impl<T: Clone + PartialEq> DeferredValue<T> {
    /// Create a deferred value with the same initial immediate and effective
    /// value.
    ///
    /// A `max_lag_turns` of `0` disables deferral: writes commit immediately.
    pub fn new(initial: T, max_lag_turns: u32) -> Self {
        Self {
            immediate: initial.clone(),
            effective: initial,
            max_lag_turns,
            lag_turns: 0,
            pending: false,
            input_this_turn: false,
            generation: 0,
        }
    }

    /// The latest written value.
    pub fn immediate(&self) -> &T {
        &self.immediate
    }

    /// The value derived state should be computed from.
    pub fn effective(&self) -> &T {
        &self.effective
    }

    /// Maximum number of turns the effective value may be deferred.
    pub fn max_lag_turns(&self) -> u32 {
        self.max_lag_turns
    }

    /// Change the staleness bound.
    ///
    /// Lowering the bound to `0` commits any pending value right away.
    /// Returns `true` if the effective value changed.
    pub fn set_max_lag_turns(&mut self, max_lag_turns: u32) -> bool {
        self.max_lag_turns = max_lag_turns;
        if self.pending && self.lag_turns >= max_lag_turns {
            self.commit()
        } else {
            false
        }
    }

    /// Number of turns the pending value has been deferred so far.
    pub fn lag_turns(&self) -> u32 {
        self.lag_turns
    }

    /// Whether the effective value is behind the immediate value.
    pub fn is_stale(&self) -> bool {
        self.pending
    }

    /// Counter that increases every time the effective value changes.
    ///
    /// Useful as a cheap cache key for state derived from the effective value.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Write a new immediate value.
    ///
    /// Returns `true` if the effective value changed as part of this call,
    /// which only happens when deferral is disabled.
    pub fn set(&mut self, value: T) -> bool {
        if self.immediate == value {
            return false;
        }
        self.immediate = value;

        if self.max_lag_turns == 0 {
            return self.commit();
        }

        if self.immediate == self.effective {
            // Typed back to the committed value; the pending one is superseded.
            self.pending = false;
            self.lag_turns = 0;
            self.input_this_turn = false;
        } else {
            self.pending = true;
            self.input_this_turn = true;
        }
        false
    }

    /// Advance one scheduling turn.
    ///
    /// Returns `true` if the effective value changed during this turn.
    pub fn tick(&mut self) -> bool {
        if !self.pending {
            return false;
        }

        if self.input_this_turn && self.lag_turns < self.max_lag_turns {
            self.lag_turns += 1;
            self.input_this_turn = false;
            tracing::trace!(
                target: targets::DEFERRED,
                lag_turns = self.lag_turns,
                max_lag_turns = self.max_lag_turns,
                "deferring effective value"
            );
            return false;
        }

        self.commit()
    }

    /// Commit the immediate value now, regardless of the turn budget.
    ///
    /// Returns `true` if the effective value changed.
    pub fn flush(&mut self) -> bool {
        if self.pending { self.commit() } else { false }
    }

    fn commit(&mut self) -> bool {
        let changed = self.effective != self.immediate;
        if changed {
            self.effective = self.immediate.clone();
            self.generation += 1;
        }
        tracing::trace!(
            target: targets::DEFERRED,
            lag_turns = self.lag_turns,
            generation = self.generation,
            "committed effective value"
        );
        self.pending = false;
        self.lag_turns = 0;
        self.input_this_turn = false;
        changed
    }
}

impl<T: Clone + PartialEq + Default> Default for DeferredValue<T> {
    fn default() -> Self {
        Self::new(T::default(), 0)
    }
}

impl<T: fmt::Debug> fmt::Debug for DeferredValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredValue")
            .field("immediate", &self.immediate)
            .field("effective", &self.effective)
            .field("lag_turns", &self.lag_turns)
            .field("max_lag_turns", &self.max_lag_turns)
            .field("pending", &self.pending)
            .finish()
    }
}
