#![forbid(unsafe_code)]

//! The widget seam consumed by two-way binding.

/// A UI control with an externally-observable value slot and a change
/// notification.
///
/// [`ObservableValue::bind_widget`](crate::ObservableValue::bind_widget)
/// reads and writes the slot through [`value`](Widget::value) /
/// [`set_value`](Widget::set_value) and subscribes to user-driven change
/// through [`on_change`](Widget::on_change).
///
/// # Contract
///
/// - `set_value` must NOT raise the change notification: programmatic
///   writes are silent. Only genuine user-driven change fires the
///   registered callbacks. Together with the equality gate in
///   `ObservableValue::set`, this bounds the binding feedback loop.
/// - Implementations retain every callback passed to `on_change` and
///   invoke them in registration order.
pub trait Widget<T> {
    /// Current contents of the value slot.
    fn value(&self) -> T;

    /// Write the value slot without raising the change notification.
    fn set_value(&self, value: T);

    /// Register a callback fired on user-driven change.
    fn on_change(&self, callback: Box<dyn Fn()>);
}
