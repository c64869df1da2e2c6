#![forbid(unsafe_code)]

//! String-keyed store with add/remove notification.
//!
//! [`ObservableMap<V>`] notifies on membership changes, not on per-value
//! change: `add` fires exactly when a key transitions from absent to
//! present (including re-adding a previously removed key), and `remove`
//! fires when a present key is deleted. Overwriting an existing key is
//! silent. For per-key value-change listeners, use
//! [`ObservableAssoc`](crate::ObservableAssoc) instead.
//!
//! Reads and writes go through [`get`](ObservableMap::get) /
//! [`set`](ObservableMap::set) only; there is no index facade, because an
//! index write could not be routed through the instrumented `set` path.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::BindingError;

/// Membership event kinds of an [`ObservableMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    /// A key transitioned from absent to present.
    Add,
    /// A present key was deleted.
    Remove,
}

/// A listener invoked with the dispatching handle and the affected key.
type MapListener<V> = Rc<dyn Fn(&ObservableMap<V>, &str)>;

/// Shared interior for [`ObservableMap<V>`].
struct MapInner<V> {
    entries: HashMap<String, V>,
    /// Insertion order of live keys; `keys()` reports this order.
    order: Vec<String>,
    add_listeners: Vec<MapListener<V>>,
    remove_listeners: Vec<MapListener<V>>,
}

/// A shared string-keyed store with membership notification.
///
/// Cloning an `ObservableMap` creates a new handle to the **same** inner
/// state.
///
/// # Invariants
///
/// 1. `add` fires if and only if a key transitions absent → present.
/// 2. `remove` fires if and only if a present key is deleted.
/// 3. `keys()` preserves insertion order.
pub struct ObservableMap<V> {
    inner: Rc<RefCell<MapInner<V>>>,
}

impl<V> Clone for ObservableMap<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for ObservableMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableMap")
            .field("entries", &inner.entries)
            .field("listener_count", &(inner.add_listeners.len() + inner.remove_listeners.len()))
            .finish()
    }
}

impl<V: Clone + 'static> ObservableMap<V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MapInner {
                entries: HashMap::new(),
                order: Vec::new(),
                add_listeners: Vec::new(),
                remove_listeners: Vec::new(),
            })),
        }
    }

    /// Create a map pre-populated with `entries`.
    ///
    /// Initial entries do not fire `add`: no listener can be registered
    /// before construction completes.
    #[must_use]
    pub fn with_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Self::new();
        {
            let mut inner = map.inner.borrow_mut();
            for (key, value) in entries {
                let key = key.into();
                if inner.entries.insert(key.clone(), value).is_none() {
                    inner.order.push(key);
                }
            }
        }
        map
    }

    /// Get a clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Whether `key` currently has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Store `value` under `key`.
    ///
    /// If the key was absent, every `add` listener fires with
    /// `(self, key)` after the write. If the key was present, the value is
    /// overwritten silently.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let added = {
            let mut inner = self.inner.borrow_mut();
            let added = inner.entries.insert(key.clone(), value).is_none();
            if added {
                inner.order.push(key.clone());
            }
            added
        };
        if added {
            self.notify(MapEvent::Add, &key);
        }
    }

    /// Delete the entry under `key` and return its value.
    ///
    /// Every `remove` listener fires with `(self, key)` after the delete.
    /// Removing an absent key is an error and fires nothing.
    pub fn remove(&self, key: &str) -> Result<V, BindingError> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let removed = inner.entries.remove(key);
            if removed.is_some() {
                inner.order.retain(|k| k != key);
            }
            removed
        };
        match removed {
            Some(value) => {
                self.notify(MapEvent::Remove, key);
                Ok(value)
            }
            None => Err(BindingError::AbsentKey(key.to_string())),
        }
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

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Append `listener` to the channel selected by `event`.
    pub fn add_listener(&self, event: MapEvent, listener: impl Fn(&Self, &str) + 'static) {
        let mut inner = self.inner.borrow_mut();
        let channel = match event {
            MapEvent::Add => &mut inner.add_listeners,
            MapEvent::Remove => &mut inner.remove_listeners,
        };
        channel.push(Rc::new(listener));
    }

    /// Invoke every listener on `event`'s channel with a snapshot.
    fn notify(&self, event: MapEvent, key: &str) {
        let listeners: Vec<MapListener<V>> = {
            let inner = self.inner.borrow();
            match event {
                MapEvent::Add => inner.add_listeners.clone(),
                MapEvent::Remove => inner.remove_listeners.clone(),
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(?event, key, listeners = listeners.len(), "map dispatch");
        for listener in &listeners {
            listener(self, key);
        }
    }
}

impl<V: Clone + 'static> Default for ObservableMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
