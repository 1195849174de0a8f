//! Slideshow deck: one repeating timer per project image element

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::show::Slideshow;
use crate::config::SlideshowConfig;
use crate::error::FolioResult;
use crate::host::PageHost;
use crate::types::ElementId;

/// Repeating timer primitive
pub trait Ticker {
    /// Handle used to cancel a scheduled timer
    type Handle;

    /// Call `tick` every `period_ms` milliseconds until cancelled.
    fn schedule(&mut self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;

    /// Stop a timer. The callback never runs again afterwards.
    fn cancel(&mut self, handle: Self::Handle);
}

type SharedShows = Rc<RefCell<BTreeMap<ElementId, Slideshow>>>;

/// Running slideshows keyed by element
///
/// Timers are owned by the deck and stop when the element is stopped,
/// pruned after leaving the page, or when [`SlideshowDeck::stop_all`] runs.
pub struct SlideshowDeck<T: Ticker> {
    config: SlideshowConfig,
    ticker: T,
    shows: SharedShows,
    timers: BTreeMap<ElementId, T::Handle>,
}

impl<T: Ticker> SlideshowDeck<T> {
    pub fn new(config: SlideshowConfig, ticker: T) -> FolioResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ticker,
            shows: Rc::new(RefCell::new(BTreeMap::new())),
            timers: BTreeMap::new(),
        })
    }

    /// Start a slideshow on every matching element.
    ///
    /// Sets the first screenshot immediately and schedules the rotation.
    /// Elements without a project attribute and elements already running
    /// are skipped. Returns the number of slideshows started.
    pub fn start<H>(&mut self, host: &H) -> usize
    where
        H: PageHost + Clone + 'static,
    {
        let mut started = 0;
        for element in host.query_all(&self.config.selector) {
            if self.timers.contains_key(&element) {
                continue;
            }
            let Some(project) = host.attribute(element, &self.config.attribute) else {
                continue;
            };

            let count = self.config.image_count(&project);
            let show = Slideshow::new(project, count);
            host.set_style(
                element,
                "background-image",
                &show.css_background(&self.config.image_dir, &self.config.extension),
            );
            debug!(element, project = show.project(), count, "slideshow started");
            self.shows.borrow_mut().insert(element, show);

            let tick = rotate(
                Rc::downgrade(&self.shows),
                host.clone(),
                element,
                self.config.image_dir.clone(),
                self.config.extension.clone(),
            );
            let handle = self.ticker.schedule(self.config.interval_ms, tick);
            self.timers.insert(element, handle);
            started += 1;
        }
        started
    }

    /// Stop the slideshow of one element. Returns false if none was running.
    pub fn stop(&mut self, element: ElementId) -> bool {
        let Some(handle) = self.timers.remove(&element) else {
            return false;
        };
        self.ticker.cancel(handle);
        self.shows.borrow_mut().remove(&element);
        debug!(element, "slideshow stopped");
        true
    }

    /// Stop every slideshow whose element is no longer on the page.
    pub fn prune(&mut self, host: &impl PageHost) -> Vec<ElementId> {
        let detached: Vec<ElementId> = self
            .timers
            .keys()
            .copied()
            .filter(|element| !host.is_attached(*element))
            .collect();

        for element in &detached {
            self.stop(*element);
        }
        detached
    }

    pub fn stop_all(&mut self) {
        let elements: Vec<ElementId> = self.timers.keys().copied().collect();
        for element in elements {
            self.stop(element);
        }
    }

    /// Screenshot index on display for an element.
    pub fn current_index(&self, element: ElementId) -> Option<u32> {
        self.shows.borrow().get(&element).map(Slideshow::index)
    }

    /// Number of running slideshows.
    pub fn running(&self) -> usize {
        self.timers.len()
    }

    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }
}

/// Timer callback advancing one slideshow.
fn rotate<H>(
    shows: Weak<RefCell<BTreeMap<ElementId, Slideshow>>>,
    host: H,
    element: ElementId,
    dir: String,
    extension: String,
) -> Box<dyn FnMut()>
where
    H: PageHost + 'static,
{
    Box::new(move || {
        let Some(shows) = shows.upgrade() else {
            return;
        };
        let mut shows = shows.borrow_mut();
        if let Some(show) = shows.get_mut(&element) {
            show.advance();
            host.set_style(element, "background-image", &show.css_background(&dir, &extension));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::memory::{ManualTicker, MemoryPage};

    fn project_image(page: &MemoryPage, project: &str) -> ElementId {
        let element = page.create_element(&["project-image"]);
        page.set_attribute(element, "data-project", project);
        element
    }

    #[test]
    fn test_start_sets_first_image() {
        let page = MemoryPage::new();
        let papais = project_image(&page, "papais");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();

        assert_eq!(deck.start(&page), 1);
        assert_eq!(
            page.style(papais, "background-image"),
            Some("url('foto/papais (1).png')".to_string())
        );
        assert_eq!(deck.current_index(papais), Some(1));
        assert_eq!(ticker.active(), 1);
    }

    #[test]
    fn test_papais_cycles_through_eight() {
        let page = MemoryPage::new();
        let papais = project_image(&page, "papais");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);

        for k in 1..=20u32 {
            ticker.advance(3000);
            assert_eq!(deck.current_index(papais), Some((k % 8) + 1));
        }
        assert_eq!(
            page.style(papais, "background-image"),
            Some(format!("url('foto/papais ({}).png')", (20 % 8) + 1))
        );
    }

    #[test]
    fn test_no_change_before_period() {
        let page = MemoryPage::new();
        let dashboard = project_image(&page, "dashboard");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);

        ticker.advance(2999);
        assert_eq!(deck.current_index(dashboard), Some(1));
    }

    #[test]
    fn test_unknown_project_defaults_to_single_image() {
        let page = MemoryPage::new();
        let mystery = project_image(&page, "mystery");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);

        ticker.advance(9000);
        assert_eq!(deck.current_index(mystery), Some(1));
        assert_eq!(
            page.style(mystery, "background-image"),
            Some("url('foto/mystery (1).png')".to_string())
        );
    }

    #[test]
    fn test_elements_without_project_skipped() {
        let page = MemoryPage::new();
        page.create_element(&["project-image"]);
        let mut deck =
            SlideshowDeck::new(SlideshowConfig::default(), ManualTicker::new()).unwrap();

        assert_eq!(deck.start(&page), 0);
        assert_eq!(deck.running(), 0);
    }

    #[test]
    fn test_independent_timers() {
        let page = MemoryPage::new();
        let guacamole = project_image(&page, "guacamole");
        let puskesmas = project_image(&page, "puskesmas");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        assert_eq!(deck.start(&page), 2);

        ticker.advance(9000);
        assert_eq!(deck.current_index(guacamole), Some(2));
        assert_eq!(deck.current_index(puskesmas), Some(4));
    }

    #[test]
    fn test_restart_does_not_duplicate_timers() {
        let page = MemoryPage::new();
        project_image(&page, "papais");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();

        deck.start(&page);
        assert_eq!(deck.start(&page), 0);
        assert_eq!(ticker.active(), 1);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let page = MemoryPage::new();
        let papais = project_image(&page, "papais");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);
        ticker.advance(3000);

        assert!(deck.stop(papais));
        assert!(!deck.stop(papais));
        ticker.advance(30000);

        assert_eq!(ticker.active(), 0);
        assert_eq!(deck.current_index(papais), None);
        assert_eq!(
            page.style(papais, "background-image"),
            Some("url('foto/papais (2).png')".to_string())
        );
    }

    #[test]
    fn test_prune_stops_detached_elements() {
        let page = MemoryPage::new();
        let kept = project_image(&page, "papais");
        let removed = project_image(&page, "dashboard");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);

        page.detach(removed);
        assert_eq!(deck.prune(&page), vec![removed]);
        assert_eq!(deck.running(), 1);
        assert_eq!(ticker.active(), 1);

        ticker.advance(3000);
        assert_eq!(deck.current_index(kept), Some(2));
    }

    #[test]
    fn test_stop_all() {
        let page = MemoryPage::new();
        project_image(&page, "papais");
        project_image(&page, "guacamole");
        let ticker = ManualTicker::new();
        let mut deck = SlideshowDeck::new(SlideshowConfig::default(), ticker.clone()).unwrap();
        deck.start(&page);

        deck.stop_all();
        assert_eq!(deck.running(), 0);
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = SlideshowConfig {
            interval_ms: 0,
            ..Default::default()
        };
        let err = SlideshowDeck::new(config, ManualTicker::new()).err();
        assert_eq!(err, Some(FolioError::InvalidInterval));
    }
}
