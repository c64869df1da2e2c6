#![forbid(unsafe_code)]

//! String-keyed store of per-key observable values.
//!
//! Where [`ObservableMap`](crate::ObservableMap) notifies on membership,
//! [`ObservableAssoc<V>`] keeps every value in its own
//! [`ObservableValue<V>`] and deliberately emits no map-level events at
//! all: listeners attach per key, and key creation/removal is silent.
//!
//! Per-key values are created lazily, unset, through a single path
//! ([`entry`](ObservableAssoc::entry)) shared by `set`, `add_listener` and
//! `bind_widget` — a listener attached before a key's first write observes
//! that write with no previous value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::BindingError;
use crate::value::ObservableValue;
use crate::widget::Widget;

/// Shared interior for [`ObservableAssoc<V>`].
struct AssocInner<V> {
    entries: HashMap<String, ObservableValue<V>>,
    /// Insertion order of live keys; `keys()` reports this order.
    order: Vec<String>,
}

/// A shared string-keyed store whose values are each observable.
///
/// Cloning an `ObservableAssoc` creates a new handle to the **same** inner
/// state.
pub struct ObservableAssoc<V> {
    inner: Rc<RefCell<AssocInner<V>>>,
}

impl<V> Clone for ObservableAssoc<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for ObservableAssoc<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableAssoc")
            .field("entries", &inner.entries)
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> ObservableAssoc<V> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(AssocInner {
                entries: HashMap::new(),
                order: Vec::new(),
            })),
        }
    }

    /// Create a store pre-populated with `entries`, each wrapped in a set
    /// [`ObservableValue`].
    #[must_use]
    pub fn with_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let assoc = Self::new();
        {
            let mut inner = assoc.inner.borrow_mut();
            for (key, value) in entries {
                let key = key.into();
                if inner
                    .entries
                    .insert(key.clone(), ObservableValue::new(value))
                    .is_none()
                {
                    inner.order.push(key);
                }
            }
        }
        assoc
    }

    /// The per-key value handle, created unset on first access.
    ///
    /// This is the single lazy-creation path: `set`, `add_listener` and
    /// `bind_widget` all route through it, so they agree on what "the
    /// key's value" is.
    pub fn entry(&self, key: impl Into<String>) -> ObservableValue<V> {
        let key = key.into();
        let mut inner = self.inner.borrow_mut();
        if let Some(value) = inner.entries.get(&key) {
            return value.clone();
        }
        let value = ObservableValue::unset();
        inner.order.push(key.clone());
        inner.entries.insert(key, value.clone());
        value
    }

    /// Read through to the per-key value.
    ///
    /// `None` when the key was never created, or when its value is unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.inner.borrow().entries.get(key).cloned();
        value.and_then(|value| value.get())
    }

    /// Write through to the per-key value, creating it if absent.
    ///
    /// No map-level event fires; the key's own listeners fire if the write
    /// changes the value.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entry(key).set(value);
    }

    /// Attach `listener` to the per-key value, creating it if absent.
    pub fn add_listener(
        &self,
        key: impl Into<String>,
        listener: impl Fn(&ObservableValue<V>, Option<&V>) + 'static,
    ) {
        self.entry(key).add_listener(listener);
    }

    /// Two-way bind the per-key value to a widget, creating it if absent.
    ///
    /// See [`ObservableValue::bind_widget`].
    pub fn bind_widget<W>(&self, key: impl Into<String>, widget: &Rc<W>)
    where
        W: Widget<V> + ?Sized + 'static,
    {
        self.entry(key).bind_widget(widget);
    }

    /// Whether `key` currently has an entry (set or unset).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Live keys, in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().order.clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Detach the entry under `key` and return its value handle.
    ///
    /// No notification fires; listeners attached to the detached value
    /// stay attached to it. Removing an absent key is an error. A
    /// subsequent `set` on the key creates a fresh value.
    pub fn remove(&self, key: &str) -> Result<ObservableValue<V>, BindingError> {
        let mut inner = self.inner.borrow_mut();
        match inner.entries.remove(key) {
            Some(value) => {
                inner.order.retain(|k| k != key);
                Ok(value)
            }
            None => Err(BindingError::AbsentKey(key.to_string())),
        }
    }
}

impl<V: Clone + PartialEq + 'static> Default for ObservableAssoc<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
