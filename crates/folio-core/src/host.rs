//! Host abstraction over the page document
//!
//! Every component talks to the page through [`PageHost`]. The browser
//! runtime implements it over `web_sys::Document`; [`crate::memory::MemoryPage`]
//! implements it in memory for tests.
//!
//! Methods take `&self`. Implementations use interior mutability so one host
//! can be shared by the reveal coordinator, the modal controller and the
//! slideshow timers at the same time.

use crate::types::ElementId;

/// Page document operations needed by the runtime
pub trait PageHost {
    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Element with the given DOM id.
    fn element_by_id(&self, dom_id: &str) -> Option<ElementId>;

    /// DOM id attribute of an element, if it has one.
    fn dom_id(&self, element: ElementId) -> Option<String>;

    /// Attribute value of an element.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&self, element: ElementId, class: &str);

    fn remove_class(&self, element: ElementId, class: &str);

    /// Set an inline style property (`display`, `background-image`, ...).
    fn set_style(&self, element: ElementId, property: &str, value: &str);

    /// Set an inline style property on the document body.
    fn set_body_style(&self, property: &str, value: &str);

    /// Whether the element is still attached to the document.
    fn is_attached(&self, element: ElementId) -> bool;

    /// Current value of a form field looked up by DOM id.
    fn field_value(&self, dom_id: &str) -> Option<String>;

    /// Navigate the current page to `url`.
    fn navigate(&self, url: &str);

    /// Show a blocking notice to the visitor.
    fn notify(&self, message: &str);

    /// Reset every field of the form with the given DOM id.
    fn reset_form(&self, dom_id: &str);
}
