//! Signal/slot notification for Fresco.
//!
//! A [`Signal<Args>`] is the outward-facing edge of the toolkit: the surface
//! controller emits parameter echoes, redraw requests, and validation
//! warnings through signals, and the host connects whatever sinks it wants.
//! Slots run synchronously in the emitting call - the whole toolkit is
//! single-threaded and cooperative, so there is no queued or cross-thread
//! delivery here.
//!
//! # Example
//!
//! ```
//! use fresco_core::Signal;
//!
//! let redraw_requested = Signal::<()>::new();
//! let id = redraw_requested.connect(|_| println!("repaint"));
//! redraw_requested.emit(());
//! redraw_requested.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; valid until passed to
    /// [`Signal::disconnect`] or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Box<dyn Fn(&Args) + Send + Sync>,
}

/// A typed signal with any number of connected slots.
///
/// Emitting invokes every connected slot, in connection order, with a
/// reference to the arguments. Emission while the signal is
/// [blocked](Self::block) is a no-op.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot to this signal.
    ///
    /// Returns a [`ConnectionId`] for later disconnection.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Box::new(slot),
        })
    }

    /// Disconnect a previously connected slot.
    pub fn disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        match self.connections.lock().remove(id) {
            Some(_) => Ok(()),
            None => Err(SignalError::InvalidConnection),
        }
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        if self.blocked.load(Ordering::Relaxed) {
            return;
        }
        let connections = self.connections.lock();
        for (_, connection) in connections.iter() {
            (connection.slot)(&args);
        }
    }

    /// Temporarily suppress emission.
    pub fn block(&self) {
        self.blocked.store(true, Ordering::Relaxed);
    }

    /// Re-enable emission after [`block`](Self::block).
    pub fn unblock(&self) {
        self.blocked.store(false, Ordering::Relaxed);
    }

    /// Number of currently connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }
}

/// RAII connection that disconnects when dropped.
///
/// Useful in tests and short-lived hosts where explicit disconnection is
/// easy to forget.
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<'a, Args> ConnectionGuard<'a, Args> {
    /// Connect `slot` to `signal`, disconnecting automatically on drop.
    pub fn connect<F>(signal: &'a Signal<Args>, slot: F) -> Self
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = signal.connect(slot);
        Self { signal, id }
    }

    /// The underlying connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        let _ = self.signal.disconnect(self.id);
    }
}
