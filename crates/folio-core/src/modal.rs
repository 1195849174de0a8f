//! Modal dialog controller
//!
//! Tracks which modals are open and derives the page scroll lock from that
//! set: the body is locked while at least one modal is open and unlocked
//! only once the last one closes.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ModalConfig;
use crate::host::PageHost;
use crate::types::{ElementId, ModalId};

/// Key that dismisses every modal
pub const ESCAPE_KEY: &str = "Escape";

/// Opens and closes modals and owns the page scroll lock
#[derive(Clone, Debug, Default)]
pub struct ModalController {
    config: ModalConfig,
    open: BTreeSet<ModalId>,
}

impl ModalController {
    pub fn new(config: ModalConfig) -> Self {
        Self {
            config,
            open: BTreeSet::new(),
        }
    }

    /// Show a modal and lock page scrolling.
    ///
    /// Unknown ids are ignored. Returns whether a modal was found.
    pub fn open(&mut self, host: &impl PageHost, modal_id: &str) -> bool {
        let Some(element) = host.element_by_id(modal_id) else {
            debug!(modal_id, "open ignored: no such modal");
            return false;
        };

        host.set_style(element, "display", &self.config.shown_display);
        self.open.insert(modal_id.to_string());
        self.apply_scroll_lock(host);
        debug!(modal_id, open = self.open.len(), "modal opened");
        true
    }

    /// Hide a modal; scrolling unlocks once no modal remains open.
    ///
    /// Unknown ids are ignored. Returns whether a modal was found.
    pub fn close(&mut self, host: &impl PageHost, modal_id: &str) -> bool {
        let Some(element) = host.element_by_id(modal_id) else {
            debug!(modal_id, "close ignored: no such modal");
            return false;
        };

        self.hide(host, element, Some(modal_id));
        self.apply_scroll_lock(host);
        true
    }

    /// Handle a click anywhere on the page.
    ///
    /// A click whose target is a modal backdrop (an element carrying the
    /// marker class) closes that modal. Returns whether a modal was closed.
    pub fn handle_click(&mut self, host: &impl PageHost, target: ElementId) -> bool {
        if !host.has_class(target, &self.config.marker_class) {
            return false;
        }

        let modal_id = host.dom_id(target);
        self.hide(host, target, modal_id.as_deref());
        self.apply_scroll_lock(host);
        true
    }

    /// Handle a key press. Escape closes every modal.
    pub fn handle_key(&mut self, host: &impl PageHost, key: &str) -> bool {
        if key != ESCAPE_KEY {
            return false;
        }
        self.close_all(host);
        true
    }

    /// Hide every element carrying the marker class and unlock scrolling.
    pub fn close_all(&mut self, host: &impl PageHost) {
        let selector = format!(".{}", self.config.marker_class);
        for element in host.query_all(&selector) {
            host.set_style(element, "display", &self.config.hidden_display);
        }
        self.open.clear();
        self.apply_scroll_lock(host);
        debug!("all modals closed");
    }

    pub fn is_open(&self, modal_id: &str) -> bool {
        self.open.contains(modal_id)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    fn hide(&mut self, host: &impl PageHost, element: ElementId, modal_id: Option<&str>) {
        host.set_style(element, "display", &self.config.hidden_display);
        if let Some(id) = modal_id {
            self.open.remove(id);
        }
        debug!(?modal_id, open = self.open.len(), "modal closed");
    }

    fn apply_scroll_lock(&self, host: &impl PageHost) {
        let overflow = if self.is_scroll_locked() { "hidden" } else { "auto" };
        host.set_body_style("overflow", overflow);
    }
}
