//! Reveal-on-scroll module
//!
//! Sections start hidden and are revealed the first time they scroll into
//! view. Each element transitions at most once; after that it is dropped
//! from the observation session.
//!
//! ```text
//!   mount()                      handle_batch()
//!  ┌────────┐  observe(id)   ┌──────────────────┐  unobserve(id)
//!  │ Hidden │ ─────────────▶ │ is_intersecting? │ ─────────────▶ Visible
//!  └────────┘                └──────────────────┘
//! ```

mod coordinator;
mod observer;

pub use coordinator::{RevealCoordinator, RevealState};
pub use observer::{VisibilityEvent, VisibilityObserver};
