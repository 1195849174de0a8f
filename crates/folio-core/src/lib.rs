//! Portfolio Page Runtime Core
//!
//! This crate provides the state machines behind the Folio portfolio page:
//! - Reveal-on-scroll for page sections (each revealed exactly once)
//! - Modal dialogs with a shared page scroll lock
//! - Project screenshot slideshows on repeating timers
//! - Contact form to `mailto:` link conversion
//!
//! ## Architecture
//!
//! - [`reveal`]: Reveal coordinator and the visibility observation trait
//! - [`modal`]: Modal controller and scroll-lock bookkeeping
//! - [`slideshow`]: Slideshow rotation and the timer trait
//! - [`contact`]: Contact form reading and mail composition
//! - [`config`]: Serde-backed configuration with page defaults
//! - [`host`]: The [`PageHost`] trait every component talks to
//! - [`memory`]: In-memory host, observer and timer for tests
//!
//! ## Example
//!
//! ```rust
//! use folio_core::memory::{ManualObserver, MemoryPage};
//! use folio_core::{RevealConfig, RevealCoordinator, RevealState, VisibilityEvent};
//!
//! let page = MemoryPage::new();
//! let intro = page.create_element(&["stunning-introduction"]);
//!
//! let mut reveal = RevealCoordinator::new(RevealConfig::default(), ManualObserver::new()).unwrap();
//! reveal.mount(&page);
//! reveal.handle_batch(&page, &[VisibilityEvent::entering(intro, 0.4)]);
//!
//! assert_eq!(reveal.state(intro), Some(RevealState::Visible));
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state lives here, testable without a browser
//! 2. **Host Abstraction**: DOM, observers and timers sit behind traits
//! 3. **Silent Misses**: Unknown modals and projects are no-ops, not errors
//! 4. **Independent Components**: Reveal, modal, slideshow and contact state never overlap

pub mod config;
pub mod contact;
pub mod error;
pub mod host;
pub mod memory;
pub mod modal;
pub mod reveal;
pub mod slideshow;
pub mod types;

// Re-export core types for convenience
pub use config::{
    ContactConfig, FolioConfig, ModalConfig, ObserverOptions, RevealConfig, SlideshowConfig,
};
pub use contact::{compose_mailto, ContactAdapter, ContactMessage};
pub use error::{FolioError, FolioResult};
pub use host::PageHost;
pub use modal::ModalController;
pub use reveal::{RevealCoordinator, RevealState, VisibilityEvent, VisibilityObserver};
pub use slideshow::{Slideshow, SlideshowDeck, Ticker};
pub use types::{ElementId, ModalId};

/// Default slideshow rotation period in milliseconds
pub use config::SLIDESHOW_INTERVAL_MS;
