#![forbid(unsafe_code)]

//! Observable value containers with synchronous change notification.
//!
//! Four independent container kinds wrap plain data so that mutation
//! notifies registered listeners, letting UI widgets track state without a
//! templating or virtual-DOM layer:
//!
//! - [`ObservableValue`]: a single optional scalar with change
//!   notification and two-way widget binding.
//! - [`ObservableMap`]: a string-keyed store with `add`/`remove` channels.
//! - [`ObservableArray`]: a sequence whose every mutating operation fires
//!   the matching event channels.
//! - [`ObservableAssoc`]: a string-keyed store of per-key
//!   [`ObservableValue`]s with per-key listeners.
//!
//! # Architecture
//!
//! Each container is a clone-shared handle over `Rc<RefCell<..>>`; cloning
//! aliases the same state. Dispatch is collect-then-call: the listener
//! list is snapshotted and every interior borrow released before any
//! callback runs, so listeners may re-entrantly mutate containers,
//! including the one currently dispatching.
//!
//! # Invariants
//!
//! 1. Listeners run synchronously, on the caller's stack, before the
//!    mutating call returns.
//! 2. Listener order is registration order, exactly.
//! 3. Listeners are container-owned: there is no removal API and no
//!    de-duplication.
//!
//! # Example
//!
//! ```
//! use bindable::ObservableValue;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = ObservableValue::new(12);
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! count.add_listener(move |value, _previous| {
//!     sink.set(value.get().unwrap_or_default());
//! });
//! count.set(15);
//! assert_eq!(seen.get(), 15);
//! ```

pub mod array;
pub mod assoc;
pub mod error;
pub mod map;
pub mod markup;
pub mod value;
pub mod widget;

pub use array::{ArrayEvent, ObservableArray};
pub use assoc::ObservableAssoc;
pub use error::BindingError;
pub use map::{MapEvent, ObservableMap};
pub use markup::{MarkupQuery, MarkupTarget, markup_writer};
pub use value::ObservableValue;
pub use widget::Widget;
