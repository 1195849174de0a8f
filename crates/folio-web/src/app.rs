//! Page wiring
//!
//! Mounts every component on the live document. Each listener captures only
//! the component it drives, so the reveal session, the modal listeners, the
//! slideshow timers and the contact form share nothing but the document.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::{
    ContactAdapter, FolioConfig, FolioResult, ModalController, RevealCoordinator, SlideshowDeck,
};
use gloo::events::{EventListener, EventListenerOptions};
use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent, MutationObserver, MutationObserverInit};

use crate::dom::{dom_error, DomPage};
use crate::log;
use crate::observer::IntersectionSession;
use crate::ticker::IntervalTicker;

type SharedReveal = Rc<RefCell<Option<RevealCoordinator<IntersectionSession>>>>;
type SharedModals = Rc<RefCell<ModalController>>;
type SharedSlides = Rc<RefCell<SlideshowDeck<IntervalTicker>>>;

/// Watches the document for removed nodes and prunes their slideshows
struct RemovalWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

/// Everything mounted on the page
pub struct PortfolioApp {
    page: DomPage,
    reveal: SharedReveal,
    modals: SharedModals,
    slides: SharedSlides,
    removal_watch: Option<RemovalWatch>,
    listeners: Vec<EventListener>,
}

impl PortfolioApp {
    /// Mount on the global document.
    pub fn mount(config: FolioConfig) -> FolioResult<Self> {
        config.validate()?;
        let page = DomPage::from_global()?;

        let reveal = mount_reveal(&page, &config)?;
        let modals: SharedModals = Rc::new(RefCell::new(ModalController::new(config.modal)));
        let slides: SharedSlides = Rc::new(RefCell::new(SlideshowDeck::new(
            config.slideshow,
            IntervalTicker,
        )?));
        let started = slides.borrow_mut().start(&page);

        let mut app = Self {
            page,
            reveal,
            modals,
            slides,
            removal_watch: None,
            listeners: Vec::new(),
        };
        app.listen_for_dismissal();
        app.watch_removals()?;
        app.listen_for_contact(ContactAdapter::new(config.contact));

        log(&format!(
            "[folio] mounted: {} reveal targets, {} slideshows, {} listeners",
            app.reveal_pending(),
            started,
            app.listeners.len()
        ));
        Ok(app)
    }

    pub fn open_modal(&self, modal_id: &str) -> bool {
        self.modals.borrow_mut().open(&self.page, modal_id)
    }

    pub fn close_modal(&self, modal_id: &str) -> bool {
        self.modals.borrow_mut().close(&self.page, modal_id)
    }

    pub fn page(&self) -> &DomPage {
        &self.page
    }

    /// Elements still waiting to be revealed.
    pub fn reveal_pending(&self) -> usize {
        self.reveal.borrow().as_ref().map_or(0, |r| r.pending())
    }

    /// Snapshot of the runtime state as JSON.
    pub fn status(&self) -> serde_json::Value {
        let reveal = self.reveal.borrow();
        let modals = self.modals.borrow();
        serde_json::json!({
            "reveal": {
                "pending": reveal.as_ref().map_or(0, |r| r.pending()),
                "revealed": reveal.as_ref().map_or(0, |r| r.revealed()),
                "disposed": reveal.as_ref().map_or(true, |r| r.is_disposed()),
            },
            "modals": {
                "open": modals.open_count(),
                "scroll_locked": modals.is_scroll_locked(),
            },
            "slideshows": self.slides.borrow().running(),
        })
    }

    /// Release the observation session, timers and listeners.
    pub fn dispose(&mut self) {
        if let Some(reveal) = self.reveal.borrow_mut().as_mut() {
            reveal.dispose();
        }
        self.slides.borrow_mut().stop_all();
        if let Some(watch) = self.removal_watch.take() {
            watch.observer.disconnect();
        }
        self.listeners.clear();
        log("[folio] disposed");
    }

    /// Outside-click and Escape dismissal.
    fn listen_for_dismissal(&mut self) {
        let marker = self.modals.borrow().config().marker_class.clone();

        let page = self.page.clone();
        let modals = Rc::downgrade(&self.modals);
        let click = EventListener::new(self.page.window(), "click", move |event| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            // Only backdrops get a handle; other clicks never reach the controller
            if !target.class_list().contains(&marker) {
                return;
            }
            let Some(target) = page.register(&target) else {
                return;
            };
            with_modals(&modals, |m| {
                m.handle_click(&page, target);
            });
        });

        let page = self.page.clone();
        let modals = Rc::downgrade(&self.modals);
        let keydown = EventListener::new(self.page.document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = event.key();
            with_modals(&modals, |m| {
                m.handle_key(&page, &key);
            });
        });

        self.listeners.push(click);
        self.listeners.push(keydown);
    }

    /// Stop slideshows whose element leaves the document and forget the
    /// detached nodes.
    fn watch_removals(&mut self) -> FolioResult<()> {
        let page = self.page.clone();
        let slides = Rc::downgrade(&self.slides);
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |_records: Array, _observer: MutationObserver| {
                let Some(slides) = slides.upgrade() else {
                    return;
                };
                let Ok(mut deck) = slides.try_borrow_mut() else {
                    return;
                };
                let stopped = deck.prune(&page);
                if !stopped.is_empty() {
                    log(&format!("[folio] stopped {} detached slideshows", stopped.len()));
                }
                page.sweep_detached();
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(dom_error("MutationObserver"))?;
        let init = MutationObserverInit::new();
        Reflect::set(&init, &"childList".into(), &JsValue::TRUE).map_err(dom_error("childList"))?;
        Reflect::set(&init, &"subtree".into(), &JsValue::TRUE).map_err(dom_error("subtree"))?;
        observer
            .observe_with_options(self.page.document(), &init)
            .map_err(dom_error("observe"))?;

        self.removal_watch = Some(RemovalWatch {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    /// Submit handler; skipped when the page has no contact form.
    fn listen_for_contact(&mut self, adapter: ContactAdapter) {
        if !adapter.is_available(&self.page) {
            return;
        }
        let Some(form) = self
            .page
            .document()
            .get_element_by_id(&adapter.config().form_id)
        else {
            return;
        };

        let page = self.page.clone();
        let submit = EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                adapter.submit(&page);
            },
        );
        self.listeners.push(submit);
    }
}

impl Drop for PortfolioApp {
    fn drop(&mut self) {
        if let Some(watch) = self.removal_watch.take() {
            watch.observer.disconnect();
        }
    }
}

/// Create the reveal coordinator and hand its session the batch callback.
fn mount_reveal(page: &DomPage, config: &FolioConfig) -> FolioResult<SharedReveal> {
    let slot: SharedReveal = Rc::new(RefCell::new(None));

    let weak = Rc::downgrade(&slot);
    let host = page.clone();
    let session = IntersectionSession::new(page.clone(), &config.reveal.observer, move |events| {
        let Some(slot) = weak.upgrade() else {
            return;
        };
        let Ok(mut reveal) = slot.try_borrow_mut() else {
            return;
        };
        if let Some(reveal) = reveal.as_mut() {
            reveal.handle_batch(&host, &events);
        }
    })?;

    let mut reveal = RevealCoordinator::new(config.reveal.clone(), session)?;
    reveal.mount(page);
    *slot.borrow_mut() = Some(reveal);
    Ok(slot)
}

fn with_modals(modals: &Weak<RefCell<ModalController>>, f: impl FnOnce(&mut ModalController)) {
    if let Some(modals) = modals.upgrade() {
        if let Ok(mut modals) = modals.try_borrow_mut() {
            f(&mut modals);
        }
    }
}
