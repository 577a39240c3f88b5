//! Core systems for Horizon Select.
//!
//! This crate provides the foundational pieces the selection widgets are
//! built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Values with change detection
//! - **Deferred Values**: Two-stage values whose derived state may lag by a
//!   bounded number of scheduling turns
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Deferred Value Example
//!
//! ```
//! use horizon_select_core::DeferredValue;
//!
//! let mut query = DeferredValue::new(String::new(), 3);
//! query.set("ban".to_string());
//!
//! // Input echoes immediately; derived work sees the old value until a
//! // quiet scheduling turn.
//! assert_eq!(query.immediate(), "ban");
//! assert_eq!(query.effective(), "");
//! query.tick();
//! query.tick();
//! assert_eq!(query.effective(), "ban");
//! ```

pub mod deferred;
pub mod logging;
pub mod property;
pub mod signal;

pub use deferred::DeferredValue;
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
