//! `setInterval` timers for slideshows

use folio_core::Ticker;
use gloo::timers::callback::Interval;

/// Schedules repeating callbacks with `setInterval`
///
/// The handle is the gloo [`Interval`] itself; cancelling drops it, which
/// clears the browser timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn schedule(&mut self, period_ms: u32, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, tick)
    }

    fn cancel(&mut self, handle: Interval) {
        drop(handle);
    }
}
