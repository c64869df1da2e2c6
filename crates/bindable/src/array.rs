#![forbid(unsafe_code)]

//! Sequence whose mutating operations are observable.
//!
//! # Design
//!
//! [`ObservableArray<T>`] owns a plain `Vec<T>` rather than extending a
//! sequence type: every mutation flows through an event-emitting operation,
//! so no native operation can bypass emission. Five channels exist, keyed
//! by [`ArrayEvent`]; each mutating operation applies the native `Vec`
//! semantics first, then fires its channel set, with [`Change`] always and
//! last.
//!
//! | Operation                | add | remove | rearrange | shift | change |
//! |--------------------------|-----|--------|-----------|-------|--------|
//! | `fill`                   |     |        |           |       | ✓      |
//! | `reverse`                |     |        | ✓         |       | ✓      |
//! | `sort` / `sort_by`       |     |        | ✓         |       | ✓      |
//! | `pop`                    |     | ✓      |           |       | ✓      |
//! | `pop_front`              |     |        |           | ✓     | ✓      |
//! | `push` / `extend`        | ✓   |        |           |       | ✓      |
//! | `push_front`             | ✓   |        |           |       | ✓      |
//! | `splice`                 | net growth | any excised |  |    | ✓      |
//!
//! Channels are operation-keyed, not effect-keyed: `pop` on an empty array
//! still fires. Listeners receive only the dispatching handle, with no
//! positional information.
//!
//! [`Change`]: ArrayEvent::Change

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

/// Event channels of an [`ObservableArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayEvent {
    /// Elements were appended or inserted.
    Add,
    /// Elements were taken from the back or excised by `splice`.
    Remove,
    /// Element order changed in place.
    Rearrange,
    /// Any mutating operation ran. Fires last, on every mutation.
    Change,
    /// The front element was taken.
    ///
    /// `pop_front` fires this channel instead of [`Remove`](Self::Remove);
    /// the asymmetry with [`pop`](ObservableArray::pop) is part of the
    /// contract. Subscribe to both channels to observe every shrink.
    Shift,
}

/// A channel listener; receives only the dispatching handle.
type ArrayListener<T> = Rc<dyn Fn(&ObservableArray<T>)>;

/// Shared interior for [`ObservableArray<T>`].
struct ArrayInner<T> {
    items: Vec<T>,
    add: Vec<ArrayListener<T>>,
    remove: Vec<ArrayListener<T>>,
    rearrange: Vec<ArrayListener<T>>,
    change: Vec<ArrayListener<T>>,
    shift: Vec<ArrayListener<T>>,
}

impl<T> ArrayInner<T> {
    fn channel(&self, event: ArrayEvent) -> &Vec<ArrayListener<T>> {
        match event {
            ArrayEvent::Add => &self.add,
            ArrayEvent::Remove => &self.remove,
            ArrayEvent::Rearrange => &self.rearrange,
            ArrayEvent::Change => &self.change,
            ArrayEvent::Shift => &self.shift,
        }
    }

    fn channel_mut(&mut self, event: ArrayEvent) -> &mut Vec<ArrayListener<T>> {
        match event {
            ArrayEvent::Add => &mut self.add,
            ArrayEvent::Remove => &mut self.remove,
            ArrayEvent::Rearrange => &mut self.rearrange,
            ArrayEvent::Change => &mut self.change,
            ArrayEvent::Shift => &mut self.shift,
        }
    }
}

/// A shared sequence with per-operation change notification.
///
/// Cloning an `ObservableArray` creates a new handle to the **same** inner
/// state.
///
/// # Invariants
///
/// 1. Every mutating operation fires [`ArrayEvent::Change`], after its
///    operation-specific channels.
/// 2. Listeners on one channel are invoked in registration order.
/// 3. No exposed operation mutates the sequence without emission; element
///    access is clone- or borrow-based only.
pub struct ObservableArray<T> {
    inner: Rc<RefCell<ArrayInner<T>>>,
}

impl<T> Clone for ObservableArray<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableArray")
            .field("items", &inner.items)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ObservableArray<T> {
    /// Create an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an array owning `items`. No events fire at construction.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ArrayInner {
                items,
                add: Vec::new(),
                remove: Vec::new(),
                rearrange: Vec::new(),
                change: Vec::new(),
                shift: Vec::new(),
            })),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Get a clone of the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Clone the whole sequence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.borrow().items.clone()
    }

    /// Access the sequence by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    /// Append `listener` to the channel selected by `event`.
    pub fn add_listener(&self, event: ArrayEvent, listener: impl Fn(&Self) + 'static) {
        self.inner
            .borrow_mut()
            .channel_mut(event)
            .push(Rc::new(listener));
    }

    /// Append an element to the back. Fires `Add`, `Change`.
    pub fn push(&self, item: T) {
        self.inner.borrow_mut().items.push(item);
        self.notify(ArrayEvent::Add);
        self.notify(ArrayEvent::Change);
    }

    /// Append every element of `items` to the back. Fires `Add`, `Change`
    /// once for the whole batch.
    pub fn extend(&self, items: impl IntoIterator<Item = T>) {
        self.inner.borrow_mut().items.extend(items);
        self.notify(ArrayEvent::Add);
        self.notify(ArrayEvent::Change);
    }

    /// Insert an element at the front. Fires `Add`, `Change`.
    pub fn push_front(&self, item: T) {
        self.inner.borrow_mut().items.insert(0, item);
        self.notify(ArrayEvent::Add);
        self.notify(ArrayEvent::Change);
    }

    /// Take the back element. Fires `Remove`, `Change`, even when empty.
    pub fn pop(&self) -> Option<T> {
        let item = self.inner.borrow_mut().items.pop();
        self.notify(ArrayEvent::Remove);
        self.notify(ArrayEvent::Change);
        item
    }

    /// Take the front element. Fires `Shift`, `Change`, even when empty.
    ///
    /// Note the channel: `Shift`, not `Remove`. See [`ArrayEvent::Shift`].
    pub fn pop_front(&self) -> Option<T> {
        let item = {
            let mut inner = self.inner.borrow_mut();
            if inner.items.is_empty() {
                None
            } else {
                Some(inner.items.remove(0))
            }
        };
        self.notify(ArrayEvent::Shift);
        self.notify(ArrayEvent::Change);
        item
    }

    /// Overwrite every element with clones of `value`. Fires `Change`.
    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        self.inner.borrow_mut().items.fill(value);
        self.notify(ArrayEvent::Change);
    }

    /// Reverse the element order in place. Fires `Rearrange`, `Change`.
    pub fn reverse(&self) {
        self.inner.borrow_mut().items.reverse();
        self.notify(ArrayEvent::Rearrange);
        self.notify(ArrayEvent::Change);
    }

    /// Sort in ascending order. Fires `Rearrange`, `Change`.
    pub fn sort(&self)
    where
        T: Ord,
    {
        self.inner.borrow_mut().items.sort();
        self.notify(ArrayEvent::Rearrange);
        self.notify(ArrayEvent::Change);
    }

    /// Sort with a comparator. Fires `Rearrange`, `Change`.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.inner.borrow_mut().items.sort_by(compare);
        self.notify(ArrayEvent::Rearrange);
        self.notify(ArrayEvent::Change);
    }

    /// Excise up to `delete_count` elements starting at `start`, inserting
    /// `items` in their place, and return the excised elements.
    ///
    /// `start` and `delete_count` are clamped to the current length.
    /// Fires `Remove` if any elements were excised, then `Add` if the
    /// length grew, then `Change` unconditionally.
    pub fn splice(&self, start: usize, delete_count: usize, items: Vec<T>) -> Vec<T> {
        let (removed, grew) = {
            let mut inner = self.inner.borrow_mut();
            let old_len = inner.items.len();
            let start = start.min(old_len);
            let end = start.saturating_add(delete_count).min(old_len);
            let removed: Vec<T> = inner.items.splice(start..end, items).collect();
            (removed, inner.items.len() > old_len)
        };
        if !removed.is_empty() {
            self.notify(ArrayEvent::Remove);
        }
        if grew {
            self.notify(ArrayEvent::Add);
        }
        self.notify(ArrayEvent::Change);
        removed
    }

    /// Invoke every listener on `event`'s channel with a snapshot.
    ///
    /// All interior borrows are released before the first callback runs,
    /// so listeners may mutate this array re-entrantly.
    fn notify(&self, event: ArrayEvent) {
        let listeners: Vec<ArrayListener<T>> = self.inner.borrow().channel(event).clone();
        #[cfg(feature = "tracing")]
        tracing::trace!(?event, listeners = listeners.len(), "array dispatch");
        for listener in &listeners {
            listener(self);
        }
    }
}

impl<T: 'static> Default for ObservableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> FromIterator<T> for ObservableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Attach a counter to every channel; returns them in
    /// add/remove/rearrange/change/shift order.
    fn counters(array: &ObservableArray<i32>) -> [Rc<Cell<u32>>; 5] {
        [
            ArrayEvent::Add,
            ArrayEvent::Remove,
            ArrayEvent::Rearrange,
            ArrayEvent::Change,
            ArrayEvent::Shift,
        ]
        .map(|event| {
            let count = Rc::new(Cell::new(0u32));
            let c = Rc::clone(&count);
            array.add_listener(event, move |_| c.set(c.get() + 1));
            count
        })
    }

    #[test]
    fn push_fires_add_and_change() {
        let array = ObservableArray::new();
        let [add, remove, rearrange, change, shift] = counters(&array);

        array.push(1);
        array.push(2);

        assert_eq!(array.to_vec(), vec![1, 2]);
        assert_eq!(add.get(), 2);
        assert_eq!(change.get(), 2);
        assert_eq!(remove.get() + rearrange.get() + shift.get(), 0);
    }

    #[test]
    fn pop_fires_remove_and_change_even_when_empty() {
        let array = ObservableArray::from_vec(vec![1]);
        let [_, remove, _, change, _] = counters(&array);

        assert_eq!(array.pop(), Some(1));
        assert_eq!(array.pop(), None);

        assert_eq!(remove.get(), 2);
        assert_eq!(change.get(), 2);
    }

    #[test]
    fn pop_front_fires_shift_not_remove() {
        let array = ObservableArray::from_vec(vec![1, 2, 3]);
        let [_, remove, _, change, shift] = counters(&array);

        assert_eq!(array.pop_front(), Some(1));
        assert_eq!(array.to_vec(), vec![2, 3]);
        assert_eq!(shift.get(), 1);
        assert_eq!(remove.get(), 0);
        assert_eq!(change.get(), 1);
    }

    #[test]
    fn push_front_prepends() {
        let array = ObservableArray::from_vec(vec![2, 3]);
        let [add, _, _, change, _] = counters(&array);

        array.push_front(1);
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
        assert_eq!(add.get(), 1);
        assert_eq!(change.get(), 1);
    }

    #[test]
    fn extend_fires_once_per_batch() {
        let array = ObservableArray::new();
        let [add, _, _, change, _] = counters(&array);

        array.extend([1, 2, 3]);
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
        assert_eq!(add.get(), 1);
        assert_eq!(change.get(), 1);
    }

    #[test]
    fn fill_fires_change_only() {
        let array = ObservableArray::from_vec(vec![1, 2, 3]);
        let [add, remove, rearrange, change, shift] = counters(&array);

        array.fill(7);
        assert_eq!(array.to_vec(), vec![7, 7, 7]);
        assert_eq!(change.get(), 1);
        assert_eq!(add.get() + remove.get() + rearrange.get() + shift.get(), 0);
    }

    #[test]
    fn reverse_and_sort_fire_rearrange() {
        let array = ObservableArray::from_vec(vec![3, 1, 2]);
        let [_, _, rearrange, change, _] = counters(&array);

        array.reverse();
        assert_eq!(array.to_vec(), vec![2, 1, 3]);
        array.sort();
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
        array.sort_by(|a, b| b.cmp(a));
        assert_eq!(array.to_vec(), vec![3, 2, 1]);

        assert_eq!(rearrange.get(), 3);
        assert_eq!(change.get(), 3);
    }

    #[test]
    fn splice_removes_and_inserts() {
        let array = ObservableArray::from_vec(vec![1, 2, 3, 4]);
        let [add, remove, _, change, _] = counters(&array);

        // Shrinks: remove fires, add does not.
        let excised = array.splice(1, 2, vec![9]);
        assert_eq!(excised, vec![2, 3]);
        assert_eq!(array.to_vec(), vec![1, 9, 4]);
        assert_eq!(remove.get(), 1);
        assert_eq!(add.get(), 0);

        // Grows: both fire.
        let excised = array.splice(1, 1, vec![5, 6]);
        assert_eq!(excised, vec![9]);
        assert_eq!(array.to_vec(), vec![1, 5, 6, 4]);
        assert_eq!(remove.get(), 2);
        assert_eq!(add.get(), 1);

        // Pure insertion: no removal.
        let excised = array.splice(0, 0, vec![0]);
        assert!(excised.is_empty());
        assert_eq!(remove.get(), 2);
        assert_eq!(add.get(), 2);

        assert_eq!(change.get(), 3);
    }

    #[test]
    fn splice_clamps_out_of_range() {
        let array = ObservableArray::from_vec(vec![1, 2]);
        let [add, remove, _, change, _] = counters(&array);

        let excised = array.splice(10, 10, vec![3]);
        assert!(excised.is_empty());
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
        assert_eq!(remove.get(), 0);
        assert_eq!(add.get(), 1);
        assert_eq!(change.get(), 1);
    }

    #[test]
    fn splice_equal_length_replacement_fires_change_and_both() {
        let array = ObservableArray::from_vec(vec![1, 2]);
        let [add, remove, _, change, _] = counters(&array);

        let excised = array.splice(0, 1, vec![9]);
        assert_eq!(excised, vec![1]);
        // Same length: elements were excised, but the array did not grow.
        assert_eq!(remove.get(), 1);
        assert_eq!(add.get(), 0);
        assert_eq!(change.get(), 1);
    }

    #[test]
    fn listener_order_is_registration_order() {
        let array: ObservableArray<i32> = ObservableArray::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for label in ['A', 'B', 'C'] {
            let log = Rc::clone(&log);
            array.add_listener(ArrayEvent::Change, move |_| log.borrow_mut().push(label));
        }

        array.push(1);
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn listener_can_mutate_array_reentrantly() {
        // A remove listener that replenishes the array.
        let array = ObservableArray::from_vec(vec![1, 2]);
        array.add_listener(ArrayEvent::Remove, |a| {
            if a.is_empty() {
                a.push(0);
            }
        });

        array.pop();
        array.pop();
        assert_eq!(array.to_vec(), vec![0]);
    }

    #[test]
    fn reads_do_not_fire() {
        let array = ObservableArray::from_vec(vec![1, 2, 3]);
        let [add, remove, rearrange, change, shift] = counters(&array);

        assert_eq!(array.len(), 3);
        assert!(!array.is_empty());
        assert_eq!(array.get(1), Some(2));
        assert_eq!(array.with(|items| items.iter().sum::<i32>()), 6);
        let _ = array.to_vec();

        let total = add.get() + remove.get() + rearrange.get() + change.get() + shift.get();
        assert_eq!(total, 0);
    }

    #[test]
    fn from_iterator_collects() {
        let array: ObservableArray<i32> = (1..=3).collect();
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn clone_shares_state() {
        let a = ObservableArray::new();
        let b = a.clone();
        a.push(1);
        assert_eq!(b.to_vec(), vec![1]);
    }
}
