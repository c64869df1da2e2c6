#![forbid(unsafe_code)]

//! Single-value holder with change notification.
//!
//! # Design
//!
//! [`ObservableValue<T>`] wraps an optional value of type `T` in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). When the value changes
//! (determined by `PartialEq`), all listeners are invoked in registration
//! order with the container handle and the previous value.
//!
//! Listeners are container-owned: they are stored as strong references,
//! there is no removal API, and no de-duplication is performed. A listener
//! registered twice runs twice.
//!
//! # Performance
//!
//! | Operation        | Complexity                 |
//! |------------------|----------------------------|
//! | `get()`          | O(1)                       |
//! | `set()`          | O(L) where L = listeners   |
//! | `add_listener()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Unbounded cascades**: listeners may mutate this value re-entrantly;
//!   recursion is bounded only by the equality gate in [`set`]. A listener
//!   that always writes a distinct value recurses until the stack runs out.
//! - **Listener accumulation**: there is no unsubscribe. A long-lived value
//!   that keeps receiving listeners keeps invoking all of them.
//!
//! [`set`]: ObservableValue::set

use std::cell::RefCell;
use std::rc::Rc;

use crate::widget::Widget;

/// A listener invoked with the dispatching handle and the previous value.
type ValueListener<T> = Rc<dyn Fn(&ObservableValue<T>, Option<&T>)>;

/// Shared interior for [`ObservableValue<T>`].
struct ValueInner<T> {
    value: Option<T>,
    version: u64,
    listeners: Vec<ValueListener<T>>,
}

/// A shared scalar holder with synchronous change notification.
///
/// Cloning an `ObservableValue` creates a new handle to the **same** inner
/// state; both handles see the same value and share listeners.
///
/// # Invariants
///
/// 1. Listeners fire if and only if an assignment actually changes the
///    value (`PartialEq`); [`trigger`](Self::trigger) is the unconditional
///    escape hatch.
/// 2. Listeners are invoked in registration order.
/// 3. `version` increments by exactly 1 on each value-changing mutation.
pub struct ObservableValue<T> {
    inner: Rc<RefCell<ValueInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ObservableValue<T> {
    /// Create a new observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_initial(Some(value))
    }

    /// Create a new observable with no value.
    ///
    /// The first [`set`](Self::set) always notifies, passing `None` as the
    /// previous value.
    #[must_use]
    pub fn unset() -> Self {
        Self::with_initial(None)
    }

    fn with_initial(value: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ValueInner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value, `None` when unset.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.borrow().value.as_ref())
    }

    /// Assign a new value.
    ///
    /// If `value` differs from the current value (by `PartialEq`), or the
    /// value is unset, the assignment is stored and every listener is
    /// invoked with `(self, previous)`. Assigning an equal value is a
    /// complete no-op: no version bump, no notification.
    pub fn set(&self, value: T) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            if inner.value.as_ref() == Some(&value) {
                return;
            }
            inner.version += 1;
            inner.value.replace(value)
        };
        self.notify(previous.as_ref());
    }

    /// Unset the value.
    ///
    /// If a value was present, listeners are notified with it as the
    /// previous value. Clearing an already-unset value is a no-op.
    pub fn clear(&self) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            match inner.value.take() {
                Some(previous) => {
                    inner.version += 1;
                    previous
                }
                None => return,
            }
        };
        self.notify(Some(&previous));
    }

    /// Modify the value in place via a closure.
    ///
    /// Listeners are notified only when the result differs from a
    /// pre-mutation snapshot; the snapshot is passed as the previous
    /// value. No-op when the value is unset.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            let Some(current) = inner.value.as_mut() else {
                return;
            };
            let snapshot = current.clone();
            f(current);
            if *current == snapshot {
                return;
            }
            inner.version += 1;
            snapshot
        };
        self.notify(Some(&previous));
    }

    /// Unconditionally invoke every listener, with no previous value.
    ///
    /// Forces consumers to refresh without a value change. Always returns
    /// `true`.
    pub fn trigger(&self) -> bool {
        self.notify(None);
        true
    }

    /// Append `listener` to the listener list.
    ///
    /// Listeners receive the dispatching handle and, for value-changing
    /// mutations, the previous value (`None` after [`trigger`](Self::trigger)
    /// or when the value was previously unset). There is no removal API.
    pub fn add_listener(&self, listener: impl Fn(&Self, Option<&T>) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(listener));
    }

    /// Establish two-way synchronization with a widget.
    ///
    /// Registers a listener that writes the current value into the
    /// widget's value slot on every change, and an on-change handler on
    /// the widget that writes the widget's slot back via
    /// [`set`](Self::set). The widget is held weakly: once dropped it is
    /// skipped during dispatch.
    ///
    /// The feedback loop is bounded by the equality gate in `set`, plus
    /// the [`Widget`] contract that programmatic slot writes stay silent.
    pub fn bind_widget<W>(&self, widget: &Rc<W>)
    where
        W: Widget<T> + ?Sized + 'static,
    {
        let slot = Rc::downgrade(widget);
        self.add_listener(move |value, _previous| {
            if let (Some(widget), Some(current)) = (slot.upgrade(), value.get()) {
                widget.set_value(current);
            }
        });

        let this = self.clone();
        let source = Rc::downgrade(widget);
        widget.on_change(Box::new(move || {
            if let Some(widget) = source.upgrade() {
                this.set(widget.value());
            }
        }));
    }

    /// Number of mutations that changed the value since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Invoke every listener with a snapshot of the listener list.
    ///
    /// All interior borrows are released before the first callback runs,
    /// so listeners may mutate this value re-entrantly.
    fn notify(&self, previous: Option<&T>) {
        let listeners: Vec<ValueListener<T>> = self.inner.borrow().listeners.clone();
        #[cfg(feature = "tracing")]
        tracing::trace!(listeners = listeners.len(), "value dispatch");
        for listener in &listeners {
            listener(self, previous);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::unset()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
