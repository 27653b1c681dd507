//! Reactive value cells with change detection.
//!
//! A [`Property<T>`] wraps a value and reports from `set` whether the value
//! actually changed. Fresco parameters keep their current coerced value in a
//! property so that "did this set do anything" is answered in one place; the
//! caller decides what to emit when the answer is `true`.
//!
//! # Example
//!
//! ```
//! use fresco_core::Property;
//!
//! let level = Property::new(0.5_f64);
//! assert!(!level.set(0.5)); // same value: no change
//! assert!(level.set(0.75)); // changed
//! assert_eq!(level.get(), 0.75);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell that tracks changes.
///
/// `set()` compares the incoming value against the current one with
/// `PartialEq` and only writes (and reports a change) when they differ.
/// Interior mutability lets a property live inside an otherwise shared
/// structure without threading `&mut` through every accessor.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    ///
    /// For large values prefer [`with`](Self::with), which borrows instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the current value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without change detection.
    ///
    /// Used during construction, before anyone observes the cell.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it actually changed.
    ///
    /// When this returns `true` the caller is expected to run its change
    /// side effects (notification, echo, redraw request).
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the previous value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Exposes the getter while keeping the setter private to the owner.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// Create a read-only view of a property.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the current value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}
