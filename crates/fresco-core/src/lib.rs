//! Core systems for Fresco.
//!
//! This crate provides the foundational components of the Fresco widget
//! toolkit, with no knowledge of parameters, layouts, or gestures:
//!
//! - **Property System**: value cells with change detection
//! - **Signal/Slot System**: typed notification to connected sinks
//! - **Timer Service**: one-shot deferred callbacks on a host-advanced
//!   logical clock
//!
//! Everything here is single-threaded and cooperative by design - the host
//! runtime delivers one event at a time and owns the clock. Interior
//! mutability (`parking_lot`) keeps the types shareable without threading
//! `&mut` through every layer.
//!
//! # Property Example
//!
//! ```
//! use fresco_core::{Property, Signal};
//!
//! struct Gain {
//!     level: Property<f64>,
//!     level_changed: Signal<f64>,
//! }
//!
//! impl Gain {
//!     fn set_level(&self, value: f64) {
//!         if self.level.set(value) {
//!             self.level_changed.emit(value);
//!         }
//!     }
//! }
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use fresco_core::TimerService;
//!
//! let timers = TimerService::new();
//! let id = timers.schedule(Duration::from_millis(250));
//!
//! // The host drives time; nothing fires until it does.
//! assert!(timers.advance(Duration::from_millis(200)).is_empty());
//! assert_eq!(timers.advance(Duration::from_millis(50)), vec![id]);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;
mod timer;

pub use error::SignalError;
pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerService};
