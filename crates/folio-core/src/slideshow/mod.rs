//! Project screenshot slideshows
//!
//! Each `.project-image[data-project]` element cycles through the
//! screenshots of its project on a fixed period. Timers go through the
//! [`Ticker`] trait so tests can drive them with a virtual clock.

mod deck;
mod show;

pub use deck::{SlideshowDeck, Ticker};
pub use show::Slideshow;
