//! In-memory page host, observer and timer for testing.
//!
//! [`MemoryPage`] keeps elements in a `Vec` and understands a subset of CSS
//! selectors: `.class`, `#id`, `[attr]`, compounds of those and comma lists.
//! Clones share the same document.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::host::PageHost;
use crate::reveal::VisibilityObserver;
use crate::slideshow::Ticker;
use crate::types::ElementId;

#[derive(Clone, Debug, Default)]
struct MemoryElement {
    dom_id: Option<String>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    /// Field value for form controls
    value: Option<String>,
    /// Owning form for form controls
    form: Option<String>,
    attached: bool,
}

#[derive(Debug, Default)]
struct PageState {
    elements: Vec<MemoryElement>,
    body_styles: BTreeMap<String, String>,
    location: Option<String>,
    notices: Vec<String>,
    resets: Vec<String>,
}

/// In-memory document for testing.
#[derive(Clone, Debug, Default)]
pub struct MemoryPage {
    state: Rc<RefCell<PageState>>,
}

impl MemoryPage {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element carrying the given classes.
    pub fn create_element(&self, classes: &[&str]) -> ElementId {
        let mut state = self.state.borrow_mut();
        state.elements.push(MemoryElement {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attached: true,
            ..Default::default()
        });
        (state.elements.len() - 1) as ElementId
    }

    /// Append an element with a DOM id and classes.
    pub fn create_element_with_id(&self, dom_id: &str, classes: &[&str]) -> ElementId {
        let element = self.create_element(classes);
        self.with_element(element, |el| el.dom_id = Some(dom_id.to_string()));
        element
    }

    /// Append a form element.
    pub fn create_form(&self, dom_id: &str) -> ElementId {
        self.create_element_with_id(dom_id, &[])
    }

    /// Append a field belonging to `form_id` with an initial value.
    pub fn create_field(&self, form_id: &str, dom_id: &str, value: &str) -> ElementId {
        let element = self.create_element_with_id(dom_id, &[]);
        self.with_element(element, |el| {
            el.value = Some(value.to_string());
            el.form = Some(form_id.to_string());
        });
        element
    }

    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        self.with_element(element, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        });
    }

    /// Simulate the visitor typing into a field.
    pub fn set_field(&self, dom_id: &str, value: &str) {
        if let Some(element) = self.element_by_id(dom_id) {
            self.with_element(element, |el| el.value = Some(value.to_string()));
        }
    }

    /// Remove an element from the document.
    pub fn detach(&self, element: ElementId) {
        self.with_element(element, |el| el.attached = false);
    }

    /// Inline style of an element.
    pub fn style(&self, element: ElementId, property: &str) -> Option<String> {
        let state = self.state.borrow();
        state
            .elements
            .get(element as usize)
            .and_then(|el| el.styles.get(property).cloned())
    }

    /// Inline style of the document body.
    pub fn body_style(&self, property: &str) -> Option<String> {
        self.state.borrow().body_styles.get(property).cloned()
    }

    /// Last URL the page navigated to.
    pub fn location(&self) -> Option<String> {
        self.state.borrow().location.clone()
    }

    /// Notices shown so far, oldest first.
    pub fn notices(&self) -> Vec<String> {
        self.state.borrow().notices.clone()
    }

    /// How many times the form was reset.
    pub fn reset_count(&self, form_id: &str) -> usize {
        self.state
            .borrow()
            .resets
            .iter()
            .filter(|id| *id == form_id)
            .count()
    }

    fn with_element(&self, element: ElementId, f: impl FnOnce(&mut MemoryElement)) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(element as usize) {
            f(el);
        }
    }

    fn read_element<T>(&self, element: ElementId, f: impl FnOnce(&MemoryElement) -> T) -> Option<T> {
        self.state.borrow().elements.get(element as usize).map(f)
    }
}

impl PageHost for MemoryPage {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let compounds: Vec<Compound> = selector.split(',').filter_map(Compound::parse).collect();
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.attached && compounds.iter().any(|c| c.matches(el)))
            .map(|(index, _)| index as ElementId)
            .collect()
    }

    fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .position(|el| el.attached && el.dom_id.as_deref() == Some(dom_id))
            .map(|index| index as ElementId)
    }

    fn dom_id(&self, element: ElementId) -> Option<String> {
        self.read_element(element, |el| el.dom_id.clone()).flatten()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.read_element(element, |el| el.attributes.get(name).cloned())
            .flatten()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.read_element(element, |el| el.classes.contains(class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: ElementId, class: &str) {
        self.with_element(element, |el| {
            el.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        self.with_element(element, |el| {
            el.classes.remove(class);
        });
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        self.with_element(element, |el| {
            el.styles.insert(property.to_string(), value.to_string());
        });
    }

    fn set_body_style(&self, property: &str, value: &str) {
        self.state
            .borrow_mut()
            .body_styles
            .insert(property.to_string(), value.to_string());
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.read_element(element, |el| el.attached).unwrap_or(false)
    }

    fn field_value(&self, dom_id: &str) -> Option<String> {
        let element = self.element_by_id(dom_id)?;
        self.read_element(element, |el| el.value.clone()).flatten()
    }

    fn navigate(&self, url: &str) {
        self.state.borrow_mut().location = Some(url.to_string());
    }

    fn notify(&self, message: &str) {
        self.state.borrow_mut().notices.push(message.to_string());
    }

    fn reset_form(&self, dom_id: &str) {
        let mut state = self.state.borrow_mut();
        for el in state.elements.iter_mut() {
            if el.form.as_deref() == Some(dom_id) {
                el.value = Some(String::new());
            }
        }
        state.resets.push(dom_id.to_string());
    }
}

/// One compound selector such as `.project-image[data-project]`
#[derive(Debug, Default)]
struct Compound {
    classes: Vec<String>,
    id: Option<String>,
    attributes: Vec<String>,
}

impl Compound {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut compound = Compound::default();
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '.' | '#' => {
                    let mut ident = String::new();
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '-' || next == '_' {
                            ident.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if ident.is_empty() {
                        return None;
                    }
                    if c == '.' {
                        compound.classes.push(ident);
                    } else {
                        compound.id = Some(ident);
                    }
                }
                '[' => {
                    let ident: String = chars.by_ref().take_while(|ch| *ch != ']').collect();
                    let ident = ident.trim();
                    if ident.is_empty() {
                        return None;
                    }
                    compound.attributes.push(ident.to_string());
                }
                // Type selectors and combinators are not supported
                _ => return None,
            }
        }
        Some(compound)
    }

    fn matches(&self, el: &MemoryElement) -> bool {
        self.classes.iter().all(|c| el.classes.contains(c))
            && self
                .id
                .as_ref()
                .map_or(true, |id| el.dom_id.as_ref() == Some(id))
            && self
                .attributes
                .iter()
                .all(|a| el.attributes.contains_key(a))
    }
}

/// Observation session that records calls instead of watching a viewport.
#[derive(Clone, Debug, Default)]
pub struct ManualObserver {
    observing: BTreeSet<ElementId>,
    observe_calls: BTreeMap<ElementId, usize>,
    unobserve_calls: BTreeMap<ElementId, usize>,
    disconnects: usize,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observing.contains(&element)
    }

    /// Elements currently observed, ascending.
    pub fn observed(&self) -> Vec<ElementId> {
        self.observing.iter().copied().collect()
    }

    pub fn observe_calls(&self, element: ElementId) -> usize {
        self.observe_calls.get(&element).copied().unwrap_or(0)
    }

    pub fn unobserve_calls(&self, element: ElementId) -> usize {
        self.unobserve_calls.get(&element).copied().unwrap_or(0)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnects
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnects > 0
    }
}

impl VisibilityObserver for ManualObserver {
    fn observe(&mut self, element: ElementId) {
        self.observing.insert(element);
        *self.observe_calls.entry(element).or_insert(0) += 1;
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observing.remove(&element);
        *self.unobserve_calls.entry(element).or_insert(0) += 1;
    }

    fn disconnect(&mut self) {
        self.observing.clear();
        self.disconnects += 1;
    }
}

/// Handle of a timer scheduled on a [`ManualTicker`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerHandle(u64);

struct ManualTimer {
    period_ms: u64,
    next_due: u64,
    callback: Box<dyn FnMut()>,
}

#[derive(Default)]
struct TickerState {
    now: u64,
    next_handle: u64,
    timers: BTreeMap<TimerHandle, ManualTimer>,
    cancelled: BTreeSet<TimerHandle>,
}

/// Repeating timers driven by a virtual clock.
///
/// Nothing fires until [`ManualTicker::advance`] moves the clock. Clones
/// share the same clock, so a test can keep one clone while the component
/// under test owns another.
#[derive(Clone, Default)]
pub struct ManualTicker {
    state: Rc<RefCell<TickerState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Number of timers still scheduled.
    pub fn active(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Move the clock forward, firing every timer that falls due on the way.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;

        loop {
            // Take the next due timer out so its callback runs without a borrow held
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .timers
                    .iter()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(handle, t)| (t.next_due, **handle))
                    .map(|(handle, _)| *handle);
                match due {
                    Some(handle) => {
                        let timer = state.timers.remove(&handle);
                        if let Some(timer) = &timer {
                            state.now = timer.next_due;
                        }
                        timer.map(|t| (handle, t))
                    }
                    None => None,
                }
            };

            let Some((handle, mut timer)) = next else {
                break;
            };
            (timer.callback)();

            let mut state = self.state.borrow_mut();
            if !state.cancelled.remove(&handle) {
                timer.next_due += timer.period_ms;
                state.timers.insert(handle, timer);
            }
        }

        self.state.borrow_mut().now = target;
    }
}

impl Ticker for ManualTicker {
    type Handle = TimerHandle;

    fn schedule(&mut self, period_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let handle = TimerHandle(state.next_handle);
        state.next_handle += 1;
        let period_ms = u64::from(period_ms.max(1));
        let next_due = state.now + period_ms;
        state.timers.insert(
            handle,
            ManualTimer {
                period_ms,
                next_due,
                callback: tick,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let mut state = self.state.borrow_mut();
        if state.timers.remove(&handle).is_none() {
            // Cancelled from inside its own callback
            state.cancelled.insert(handle);
        }
    }
}
