//! Browser implementation of the page host
//!
//! Elements handed to the core are stamped with a `data-folio-id` attribute
//! holding their [`ElementId`]. The registry keeps the element alive so the
//! id can be turned back into a node later, until
//! [`DomPage::sweep_detached`] drops nodes that left the document.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use folio_core::{ElementId, FolioError, FolioResult, PageHost};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    Window,
};

use crate::log;

/// Attribute carrying the element handle
pub const ID_ATTRIBUTE: &str = "data-folio-id";

/// Convert a rejected DOM call into a [`FolioError`]
pub(crate) fn dom_error(context: &'static str) -> impl Fn(JsValue) -> FolioError {
    move |err| FolioError::Dom(format!("{}: {:?}", context, err))
}

/// Log a rejected DOM call that has no caller to report to
fn log_failure(context: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log(&format!("[folio] {} failed: {:?}", context, err));
    }
}

#[derive(Default)]
struct Registry {
    elements: BTreeMap<ElementId, Element>,
    next: ElementId,
}

/// Page host over the live document
#[derive(Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
    registry: Rc<RefCell<Registry>>,
}

impl DomPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Host over the global window's document.
    pub fn from_global() -> FolioResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| FolioError::Dom("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| FolioError::Dom("window has no document".to_string()))?;
        Ok(Self::new(window, document))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Handle for an element, assigning one on first sight.
    ///
    /// Returns `None` when the element cannot be stamped; it is then not
    /// tracked at all.
    pub fn register(&self, element: &Element) -> Option<ElementId> {
        if let Some(id) = self.known_id(element) {
            return Some(id);
        }

        let mut registry = self.registry.borrow_mut();
        let id = registry.next;
        if let Err(err) = element.set_attribute(ID_ATTRIBUTE, &id.to_string()) {
            log(&format!("[folio] cannot stamp element: {:?}", err));
            return None;
        }
        registry.next += 1;
        registry.elements.insert(id, element.clone());
        Some(id)
    }

    /// Element behind a handle.
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().elements.get(&id).cloned()
    }

    /// Number of elements currently tracked.
    pub fn tracked(&self) -> usize {
        self.registry.borrow().elements.len()
    }

    /// Forget every element no longer in the document. Returns how many
    /// were dropped; their handles never resolve again.
    pub fn sweep_detached(&self) -> usize {
        let mut registry = self.registry.borrow_mut();
        let before = registry.elements.len();
        registry.elements.retain(|_, element| element.is_connected());
        before - registry.elements.len()
    }

    fn known_id(&self, element: &Element) -> Option<ElementId> {
        let id: ElementId = element.get_attribute(ID_ATTRIBUTE)?.parse().ok()?;
        let registry = self.registry.borrow();
        let known: &JsValue = registry.elements.get(&id)?.as_ref();
        // Cloned nodes carry the attribute of their original
        let candidate: &JsValue = element.as_ref();
        (known == candidate).then_some(id)
    }

    fn html_element(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }
}

impl PageHost for DomPage {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let nodes = match self.document.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log(&format!("[folio] invalid selector '{}': {:?}", selector, err));
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|element| self.register(&element))
            .collect()
    }

    fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.document
            .get_element_by_id(dom_id)
            .and_then(|element| self.register(&element))
    }

    fn dom_id(&self, element: ElementId) -> Option<String> {
        let id = self.element(element)?.id();
        (!id.is_empty()).then_some(id)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .map(|el| el.class_list().contains(class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: ElementId, class: &str) {
        if let Some(el) = self.element(element) {
            log_failure("add class", el.class_list().add_1(class));
        }
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        if let Some(el) = self.element(element) {
            log_failure("remove class", el.class_list().remove_1(class));
        }
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.html_element(element) {
            log_failure("set style", el.style().set_property(property, value));
        }
    }

    fn set_body_style(&self, property: &str, value: &str) {
        if let Some(body) = self.document.body() {
            log_failure("set body style", body.style().set_property(property, value));
        }
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.element(element)
            .map(|el| el.is_connected())
            .unwrap_or(false)
    }

    fn field_value(&self, dom_id: &str) -> Option<String> {
        let element = self.document.get_element_by_id(dom_id)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value)
    }

    fn navigate(&self, url: &str) {
        log_failure("navigation", self.window.location().set_href(url));
    }

    fn notify(&self, message: &str) {
        log_failure("notice", self.window.alert_with_message(message));
    }

    fn reset_form(&self, dom_id: &str) {
        if let Some(form) = self
            .document
            .get_element_by_id(dom_id)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }
}
