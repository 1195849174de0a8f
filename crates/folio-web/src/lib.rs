//! Browser Runtime for the Folio Portfolio Page
//!
//! Binds the `folio-core` state machines to the live document:
//! - [`DomPage`]: `PageHost` over `web_sys::Document`
//! - [`IntersectionSession`]: visibility observation via `IntersectionObserver`
//! - [`IntervalTicker`]: slideshow timers via `setInterval`
//! - [`PortfolioApp`]: mounts everything and owns the listeners
//!
//! ## Loading
//!
//! The module mounts itself with the default configuration once the
//! document has been parsed. Inline handlers such as
//! `onclick="openModal('project-papais')"` need the exports on `window`:
//!
//! ```js
//! import init, { openModal, closeModal } from "./pkg/folio_web.js";
//! await init();
//! Object.assign(window, { openModal, closeModal });
//! ```

use std::cell::RefCell;

use folio_core::{FolioConfig, FolioError};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;

mod app;
mod dom;
mod observer;
mod ticker;

pub use app::PortfolioApp;
pub use dom::{DomPage, ID_ATTRIBUTE};
pub use observer::IntersectionSession;
pub use ticker::IntervalTicker;

thread_local! {
    static APP: RefCell<Option<PortfolioApp>> = const { RefCell::new(None) };
}

/// Log a line to the browser console
pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

fn to_js(err: FolioError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Module entry point
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log("[folio] no document; runtime not mounted");
        return;
    };

    let loading = Reflect::get(&document, &"readyState".into())
        .ok()
        .and_then(|state| state.as_string())
        .map_or(false, |state| state == "loading");

    if loading {
        gloo::events::EventListener::once(&document, "DOMContentLoaded", |_| {
            install(FolioConfig::default());
        })
        .forget();
    } else {
        install(FolioConfig::default());
    }
}

/// Mount with the default configuration, logging failures.
fn install(config: FolioConfig) {
    if let Err(err) = replace_app(config) {
        log(&format!("[folio] mount failed: {}", err));
    }
}

fn replace_app(config: FolioConfig) -> Result<(), FolioError> {
    // Tear down the previous mount before its listeners can see the new one
    dispose();
    let app = PortfolioApp::mount(config)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Remount with a JSON configuration; omitted keys keep their defaults.
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(json: &str) -> Result<(), JsValue> {
    let config = FolioConfig::from_json(json).map_err(to_js)?;
    replace_app(config).map_err(to_js)
}

/// Show a modal by DOM id. Unknown ids are ignored.
#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(modal_id: &str) -> bool {
    APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(false, |app| app.open_modal(modal_id))
    })
}

/// Hide a modal by DOM id. Unknown ids are ignored.
#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal(modal_id: &str) -> bool {
    APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(false, |app| app.close_modal(modal_id))
    })
}

/// Runtime state as a JSON string, `null` before mounting.
#[wasm_bindgen(js_name = folioStatus)]
pub fn folio_status() -> String {
    APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(PortfolioApp::status)
            .unwrap_or(serde_json::Value::Null)
            .to_string()
    })
}

/// Release the observation session, timers and listeners.
#[wasm_bindgen]
pub fn dispose() {
    let previous = APP.with(|slot| slot.borrow_mut().take());
    if let Some(mut app) = previous {
        app.dispose();
    }
}
