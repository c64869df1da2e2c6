#![forbid(unsafe_code)]

//! Markup mirroring for DOM-like element trees.

use std::fmt;
use std::rc::Rc;

use crate::value::ObservableValue;

/// An element with a writable markup-content slot.
pub trait MarkupTarget {
    /// Replace the element's markup content.
    fn write_markup(&self, markup: &str);
}

/// A tree of markup targets addressable by selector.
pub trait MarkupQuery {
    /// Every element matching `selector`, possibly none.
    fn select(&self, selector: &str) -> Vec<Rc<dyn MarkupTarget>>;
}

/// Build a listener that mirrors a value into selector-matched elements.
///
/// On every invocation, the listener formats the current value and writes
/// it into each element `root.select(selector)` yields at that moment.
/// Unset values write nothing. Attach the result with
/// [`ObservableValue::add_listener`]:
///
/// ```
/// use bindable::markup::{MarkupQuery, MarkupTarget};
/// use bindable::{ObservableValue, markup_writer};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// struct Label(RefCell<String>);
/// impl MarkupTarget for Label {
///     fn write_markup(&self, markup: &str) {
///         *self.0.borrow_mut() = markup.to_string();
///     }
/// }
///
/// struct Page(Rc<Label>);
/// impl MarkupQuery for Page {
///     fn select(&self, selector: &str) -> Vec<Rc<dyn MarkupTarget>> {
///         if selector == ".count" {
///             vec![Rc::clone(&self.0) as Rc<dyn MarkupTarget>]
///         } else {
///             Vec::new()
///         }
///     }
/// }
///
/// let label = Rc::new(Label(RefCell::new(String::new())));
/// let page = Rc::new(Page(Rc::clone(&label)));
///
/// let count = ObservableValue::new(0);
/// count.add_listener(markup_writer(page, ".count"));
/// count.set(3);
/// assert_eq!(*label.0.borrow(), "3");
/// ```
pub fn markup_writer<Q, T>(
    root: Rc<Q>,
    selector: impl Into<String>,
) -> impl Fn(&ObservableValue<T>, Option<&T>)
where
    Q: MarkupQuery + ?Sized + 'static,
    T: Clone + PartialEq + fmt::Display + 'static,
{
    let selector = selector.into();
    move |value: &ObservableValue<T>, _previous: Option<&T>| {
        let Some(current) = value.get() else {
            return;
        };
        let markup = current.to_string();
        for target in root.select(&selector) {
            target.write_markup(&markup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Element {
        markup: RefCell<String>,
    }

    impl MarkupTarget for Element {
        fn write_markup(&self, markup: &str) {
            *self.markup.borrow_mut() = markup.to_string();
        }
    }

    /// A stub tree: selector -> elements.
    struct Tree {
        matched: Vec<Rc<Element>>,
        selector: String,
    }

    impl MarkupQuery for Tree {
        fn select(&self, selector: &str) -> Vec<Rc<dyn MarkupTarget>> {
            if selector == self.selector {
                self.matched
                    .iter()
                    .map(|e| Rc::clone(e) as Rc<dyn MarkupTarget>)
                    .collect()
            } else {
                Vec::new()
            }
        }
    }

    fn element() -> Rc<Element> {
        Rc::new(Element {
            markup: RefCell::new(String::new()),
        })
    }

    #[test]
    fn mirrors_into_every_match() {
        let a = element();
        let b = element();
        let tree = Rc::new(Tree {
            matched: vec![Rc::clone(&a), Rc::clone(&b)],
            selector: ".status".to_string(),
        });

        let status = ObservableValue::new("idle".to_string());
        status.add_listener(markup_writer(tree, ".status"));

        status.set("busy".to_string());
        assert_eq!(*a.markup.borrow(), "busy");
        assert_eq!(*b.markup.borrow(), "busy");
    }

    #[test]
    fn no_match_writes_nothing() {
        let a = element();
        let tree = Rc::new(Tree {
            matched: vec![Rc::clone(&a)],
            selector: ".present".to_string(),
        });

        let value = ObservableValue::new(1);
        value.add_listener(markup_writer(tree, ".absent"));
        value.set(2);

        assert!(a.markup.borrow().is_empty());
    }

    #[test]
    fn trigger_refreshes_targets() {
        let a = element();
        let tree = Rc::new(Tree {
            matched: vec![Rc::clone(&a)],
            selector: "#n".to_string(),
        });

        let value = ObservableValue::new(7);
        value.add_listener(markup_writer(tree, "#n"));

        value.trigger();
        assert_eq!(*a.markup.borrow(), "7");
    }

    #[test]
    fn formats_via_display() {
        let a = element();
        let tree = Rc::new(Tree {
            matched: vec![Rc::clone(&a)],
            selector: "#f".to_string(),
        });

        let value = ObservableValue::new(1.5f64);
        value.add_listener(markup_writer(tree, "#f"));
        value.set(2.5);

        assert_eq!(*a.markup.borrow(), "2.5");
    }
}
