//! Page Integration Tests
//!
//! Runs every component against one in-memory page, the way the browser
//! runtime wires them.

use folio_core::memory::{ManualObserver, ManualTicker, MemoryPage};
use folio_core::{
    ContactAdapter, ElementId, FolioConfig, ModalController, PageHost, RevealCoordinator,
    RevealState, SlideshowDeck, VisibilityEvent,
};

struct Portfolio {
    page: MemoryPage,
    ticker: ManualTicker,
    reveal: RevealCoordinator<ManualObserver>,
    modals: ModalController,
    slides: SlideshowDeck<ManualTicker>,
    contact: ContactAdapter,
    sections: Vec<ElementId>,
}

/// Build the portfolio page with its default configuration.
fn portfolio() -> Portfolio {
    let config = FolioConfig::default();
    let page = MemoryPage::new();

    let sections: Vec<ElementId> = [
        "stunning-introduction",
        "front-end-developer-portfolio",
        "skills-technologies",
        "experience",
        "contact",
    ]
    .into_iter()
    .map(|class| page.create_element(&[class]))
    .collect();

    page.create_element_with_id("project-papais", &["modal"]);
    page.create_element_with_id("project-dashboard", &["modal"]);

    for project in ["papais", "dashboard"] {
        let image = page.create_element(&["project-image"]);
        page.set_attribute(image, "data-project", project);
    }

    page.create_form("contactForm");
    for field in ["name", "email", "subject", "message"] {
        page.create_field("contactForm", field, "");
    }

    let ticker = ManualTicker::new();
    let mut reveal = RevealCoordinator::new(config.reveal, ManualObserver::new()).unwrap();
    let modals = ModalController::new(config.modal);
    let mut slides = SlideshowDeck::new(config.slideshow, ticker.clone()).unwrap();
    let contact = ContactAdapter::new(config.contact);

    reveal.mount(&page);
    slides.start(&page);

    Portfolio {
        page,
        ticker,
        reveal,
        modals,
        slides,
        contact,
        sections,
    }
}

/// Test that every section starts hidden and is observed.
#[test]
fn test_sections_hidden_after_setup() {
    let p = portfolio();

    for section in &p.sections {
        assert!(p.page.has_class(*section, "hidden"));
        assert_eq!(p.reveal.state(*section), Some(RevealState::Hidden));
    }
    assert_eq!(p.reveal.observer().observed(), {
        let mut sorted = p.sections.clone();
        sorted.sort();
        sorted
    });
}

/// Test that scrolling through the page reveals sections one batch at a time.
#[test]
fn test_scrolling_reveals_in_batches() {
    let mut p = portfolio();
    let page = p.page.clone();

    let first = p.reveal.handle_batch(
        &page,
        &[
            VisibilityEvent::entering(p.sections[0], 0.8),
            VisibilityEvent::entering(p.sections[1], 0.15),
            VisibilityEvent::leaving(p.sections[2]),
        ],
    );
    assert_eq!(first.len(), 2);

    let second = p.reveal.handle_batch(
        &page,
        &[
            VisibilityEvent::entering(p.sections[2], 0.3),
            VisibilityEvent::entering(p.sections[0], 1.0),
        ],
    );
    assert_eq!(second, vec![p.sections[2]]);
    assert_eq!(p.reveal.pending(), 2);
}

/// Test that modal activity leaves reveal state and slideshows untouched.
#[test]
fn test_modal_and_reveal_are_independent() {
    let mut p = portfolio();
    let page = p.page.clone();

    assert!(p.modals.open(&page, "project-papais"));
    p.modals.handle_key(&page, "Escape");

    for section in &p.sections {
        assert!(!page.has_class(*section, "show"));
    }
    assert_eq!(p.slides.running(), 2);

    p.reveal
        .handle_batch(&page, &[VisibilityEvent::entering(p.sections[4], 0.5)]);
    assert!(!p.modals.is_scroll_locked());
    assert_eq!(page.body_style("overflow"), Some("auto".to_string()));
}

/// Test that scroll lock follows the number of open modals.
#[test]
fn test_scroll_lock_tracks_open_modals() {
    let mut p = portfolio();
    let page = p.page.clone();

    p.modals.open(&page, "project-papais");
    p.modals.open(&page, "project-dashboard");
    p.modals.close(&page, "project-papais");
    assert_eq!(page.body_style("overflow"), Some("hidden".to_string()));

    let backdrop = page.element_by_id("project-dashboard").unwrap();
    p.modals.handle_click(&page, backdrop);
    assert_eq!(page.body_style("overflow"), Some("auto".to_string()));
}

/// Test that slideshows rotate and stop when their element leaves the page.
#[test]
fn test_slideshows_rotate_and_prune() {
    let mut p = portfolio();
    let page = p.page.clone();
    let images = page.query_all(".project-image[data-project]");

    p.ticker.advance(3000 * 7);
    assert_eq!(p.slides.current_index(images[0]), Some(8));
    assert_eq!(p.slides.current_index(images[1]), Some(2));

    page.detach(images[1]);
    assert_eq!(p.slides.prune(&page), vec![images[1]]);

    p.ticker.advance(3000);
    assert_eq!(p.slides.current_index(images[0]), Some(1));
    assert_eq!(p.ticker.active(), 1);
}

/// Test the contact form end to end.
#[test]
fn test_contact_submission() {
    let p = portfolio();
    let page = p.page.clone();
    page.set_field("name", "Ann");
    page.set_field("email", "a@x.com");
    page.set_field("subject", "Hi");
    page.set_field("message", "Hello");

    let link = p.contact.submit(&page);

    assert_eq!(
        link,
        "mailto:silmiyushini1919@gmail.com?subject=Hi\
         &body=Name%3A%20Ann%0D%0AEmail%3A%20a%40x.com%0D%0A%0D%0AMessage%3A%0D%0AHello"
    );
    assert_eq!(page.location(), Some(link));
    assert_eq!(page.field_value("message"), Some(String::new()));
}

/// Test that disposing the reveal session releases the observer.
#[test]
fn test_dispose_releases_observer() {
    let mut p = portfolio();
    let page = p.page.clone();

    p.reveal.dispose();
    p.slides.stop_all();

    assert!(p.reveal.observer().observed().is_empty());
    assert_eq!(p.ticker.active(), 0);
    assert!(p
        .reveal
        .handle_batch(&page, &[VisibilityEvent::entering(p.sections[0], 1.0)])
        .is_empty());
}
