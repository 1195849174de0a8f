//! IntersectionObserver-backed observation session

use folio_core::{ElementId, FolioResult, ObserverOptions, VisibilityEvent, VisibilityObserver};
use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::{dom_error, DomPage};

/// One `IntersectionObserver` plus the closure it calls back into
///
/// Entries count as intersecting whenever the browser reports
/// `isIntersecting`. The threshold only decides when the browser calls back,
/// so an element too tall to ever reach it still reveals. Dropping the
/// session disconnects the observer before its closure is freed.
pub struct IntersectionSession {
    page: DomPage,
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl IntersectionSession {
    /// Open a session delivering every batch to `on_batch`.
    pub fn new(
        page: DomPage,
        options: &ObserverOptions,
        mut on_batch: impl FnMut(Vec<VisibilityEvent>) + 'static,
    ) -> FolioResult<Self> {
        let lookup = page.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let events = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| visibility_event(&lookup, &entry))
                    .collect();
                on_batch(events);
            },
        );

        let init = IntersectionObserverInit::new();
        Reflect::set(&init, &"rootMargin".into(), &JsValue::from_str(&options.root_margin))
            .map_err(dom_error("rootMargin"))?;
        Reflect::set(&init, &"threshold".into(), &JsValue::from_f64(options.threshold))
            .map_err(dom_error("threshold"))?;
        if let Some(selector) = &options.root {
            let root = page
                .document()
                .query_selector(selector)
                .map_err(dom_error("observer root"))?;
            if let Some(root) = root {
                Reflect::set(&init, &"root".into(), &root).map_err(dom_error("root"))?;
            }
        }

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_error("IntersectionObserver"))?;

        Ok(Self {
            page,
            observer,
            _callback: callback,
        })
    }
}

/// Translate one browser entry; entries whose target cannot be tracked are dropped.
fn visibility_event(page: &DomPage, entry: &IntersectionObserverEntry) -> Option<VisibilityEvent> {
    Some(VisibilityEvent {
        target: page.register(&entry.target())?,
        ratio: entry.intersection_ratio(),
        is_intersecting: entry.is_intersecting(),
    })
}

impl VisibilityObserver for IntersectionSession {
    fn observe(&mut self, element: ElementId) {
        if let Some(el) = self.page.element(element) {
            self.observer.observe(&el);
        }
    }

    fn unobserve(&mut self, element: ElementId) {
        if let Some(el) = self.page.element(element) {
            self.observer.unobserve(&el);
        }
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for IntersectionSession {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
