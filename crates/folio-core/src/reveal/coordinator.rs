//! Reveal coordinator
//!
//! Owns one observation session and the per-element reveal state.

use std::collections::BTreeMap;

use tracing::debug;

use super::observer::{VisibilityEvent, VisibilityObserver};
use crate::config::RevealConfig;
use crate::error::FolioResult;
use crate::host::PageHost;
use crate::types::ElementId;

/// Visual state of a watched element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Not yet scrolled into view
    Hidden,
    /// Revealed; never hidden again
    Visible,
}

/// Reveals a configured set of elements, each exactly once
///
/// ## Lifecycle
///
/// 1. [`RevealCoordinator::new`] validates the configuration and takes
///    ownership of the observation session.
/// 2. [`RevealCoordinator::mount`] discovers the targets, hides them and
///    registers them with the session.
/// 3. The host delivers event batches to [`RevealCoordinator::handle_batch`].
/// 4. [`RevealCoordinator::dispose`] optionally releases the session early.
pub struct RevealCoordinator<O: VisibilityObserver> {
    config: RevealConfig,
    observer: O,
    states: BTreeMap<ElementId, RevealState>,
    disposed: bool,
}

impl<O: VisibilityObserver> RevealCoordinator<O> {
    /// Create a coordinator over an observation session.
    pub fn new(config: RevealConfig, observer: O) -> FolioResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer,
            states: BTreeMap::new(),
            disposed: false,
        })
    }

    /// Hide and start observing every element matched by the selectors.
    ///
    /// Elements matched by several selectors are registered once. Elements
    /// already known from an earlier mount are left alone. Returns the number
    /// of newly watched elements.
    pub fn mount(&mut self, host: &impl PageHost) -> usize {
        if self.disposed {
            return 0;
        }

        let mut added = 0;
        for selector in &self.config.selectors {
            let selector = selector.trim();
            if selector.is_empty() {
                continue;
            }
            for element in host.query_all(selector) {
                if self.states.contains_key(&element) {
                    continue;
                }
                host.add_class(element, &self.config.hidden_class);
                self.states.insert(element, RevealState::Hidden);
                self.observer.observe(element);
                added += 1;
            }
        }

        debug!(added, total = self.states.len(), "reveal targets mounted");
        added
    }

    /// Apply one batch of visibility events.
    ///
    /// Every intersecting event for a still-hidden element reveals it and
    /// removes it from the session. The hidden class stays on the element so
    /// page styles can transition from it to the visible class. Returns the
    /// elements revealed by this batch in delivery order.
    pub fn handle_batch(
        &mut self,
        host: &impl PageHost,
        events: &[VisibilityEvent],
    ) -> Vec<ElementId> {
        if self.disposed {
            return Vec::new();
        }

        let mut revealed = Vec::new();
        for event in events.iter().filter(|e| e.is_intersecting) {
            let Some(state) = self.states.get_mut(&event.target) else {
                continue;
            };
            if *state == RevealState::Visible {
                continue;
            }

            host.add_class(event.target, &self.config.visible_class);
            *state = RevealState::Visible;
            self.observer.unobserve(event.target);
            revealed.push(event.target);
        }

        if !revealed.is_empty() {
            debug!(count = revealed.len(), pending = self.pending(), "revealed elements");
        }
        revealed
    }

    /// Reveal state of an element, `None` if it is not watched.
    pub fn state(&self, element: ElementId) -> Option<RevealState> {
        self.states.get(&element).copied()
    }

    /// Number of elements still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.count(RevealState::Hidden)
    }

    /// Number of elements already revealed.
    pub fn revealed(&self) -> usize {
        self.count(RevealState::Visible)
    }

    fn count(&self, wanted: RevealState) -> usize {
        self.states.values().filter(|s| **s == wanted).count()
    }

    /// Release the observation session.
    ///
    /// Still-hidden elements are unobserved before the session disconnects.
    /// Later batches and mounts are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        for (element, state) in &self.states {
            if *state == RevealState::Hidden {
                self.observer.unobserve(*element);
            }
        }
        self.observer.disconnect();
        self.disposed = true;
        debug!(pending = self.pending(), "reveal session disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The underlying observation session.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::memory::{ManualObserver, MemoryPage};
    use proptest::prelude::*;

    proptest! {
        /// Exactly the intersecting elements of a batch are revealed,
        /// whatever order the batch arrives in
        #[test]
        fn batch_reveals_exactly_intersecting(
            flags in proptest::collection::vec(any::<bool>(), 1..24),
            rotate in 0usize..24,
        ) {
            let page = MemoryPage::new();
            let elements: Vec<ElementId> =
                flags.iter().map(|_| page.create_element(&["card"])).collect();
            let mut coordinator =
                RevealCoordinator::new(RevealConfig::default(), ManualObserver::new()).unwrap();
            coordinator.mount(&page);

            let mut events: Vec<VisibilityEvent> = elements
                .iter()
                .zip(&flags)
                .map(|(el, hit)| VisibilityEvent {
                    target: *el,
                    ratio: if *hit { 0.5 } else { 0.0 },
                    is_intersecting: *hit,
                })
                .collect();
            let len = events.len();
            events.rotate_left(rotate % len);

            let revealed = coordinator.handle_batch(&page, &events);
            let expected = flags.iter().filter(|f| **f).count();

            prop_assert_eq!(revealed.len(), expected);
            prop_assert_eq!(coordinator.revealed(), expected);
            prop_assert_eq!(coordinator.pending(), len - expected);
            for (el, hit) in elements.iter().zip(&flags) {
                prop_assert_eq!(page.has_class(*el, "show"), *hit);
                prop_assert!(page.has_class(*el, "hidden"));
            }
        }

        /// Replaying any event sequence after a reveal never changes state
        #[test]
        fn revealed_element_is_stable(replay in proptest::collection::vec(any::<bool>(), 0..16)) {
            let page = MemoryPage::new();
            let el = page.create_element(&["experience"]);
            let mut coordinator =
                RevealCoordinator::new(RevealConfig::default(), ManualObserver::new()).unwrap();
            coordinator.mount(&page);
            coordinator.handle_batch(&page, &[VisibilityEvent::entering(el, 1.0)]);

            for hit in replay {
                let event = if hit {
                    VisibilityEvent::entering(el, 1.0)
                } else {
                    VisibilityEvent::leaving(el)
                };
                prop_assert!(coordinator.handle_batch(&page, &[event]).is_empty());
            }

            prop_assert_eq!(coordinator.state(el), Some(RevealState::Visible));
            prop_assert_eq!(coordinator.observer().unobserve_calls(el), 1);
        }
    }
}
