//! Page configuration
//!
//! Every section deserializes with `#[serde(default)]`, so a partial JSON
//! document only overrides the keys it names. [`FolioConfig::default`]
//! describes the portfolio page the runtime was written for.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, FolioResult};

/// Default visibility threshold (10% of the element must intersect)
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default slideshow rotation period in milliseconds
pub const SLIDESHOW_INTERVAL_MS: u32 = 3000;

/// Sections animated in on first scroll into view
pub const DEFAULT_REVEAL_SELECTORS: &[&str] = &[
    ".portfolio",
    ".portfolio-1a",
    ".portfolio-22",
    ".card",
    ".card-1c",
    ".card-25",
    ".stunning-introduction",
    ".front-end-developer-portfolio",
    ".skills-technologies",
    ".experience",
    ".contact",
];

/// Full runtime configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub reveal: RevealConfig,
    pub modal: ModalConfig,
    pub slideshow: SlideshowConfig,
    pub contact: ContactConfig,
}

impl FolioConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> FolioResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values the runtime cannot work with.
    pub fn validate(&self) -> FolioResult<()> {
        self.reveal.validate()?;
        self.slideshow.validate()
    }
}

/// Options for one visibility observation session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Selector of the scrolling container; `None` observes against the viewport
    pub root: Option<String>,
    /// CSS margin grown around the root before computing intersections
    pub root_margin: String,
    /// Fraction of the element area that must intersect
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: "0px".to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ObserverOptions {
    pub fn validate(&self) -> FolioResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(FolioError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Reveal-on-scroll targets and the classes toggled on them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub hidden_class: String,
    pub visible_class: String,
    pub observer: ObserverOptions,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: DEFAULT_REVEAL_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hidden_class: "hidden".to_string(),
            visible_class: "show".to_string(),
            observer: ObserverOptions::default(),
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> FolioResult<()> {
        if self.selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(FolioError::EmptySelectors);
        }
        self.observer.validate()
    }
}

/// Modal marker class and the display values for both states
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub marker_class: String,
    pub shown_display: String,
    pub hidden_display: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            marker_class: "modal".to_string(),
            shown_display: "flex".to_string(),
            hidden_display: "none".to_string(),
        }
    }
}

/// Project screenshot rotation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    pub selector: String,
    /// Attribute naming the project of a slideshow element
    pub attribute: String,
    /// Number of screenshots per project
    pub image_counts: BTreeMap<String, u32>,
    pub interval_ms: u32,
    pub image_dir: String,
    pub extension: String,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        let image_counts = [("papais", 8), ("puskesmas", 8), ("guacamole", 2), ("dashboard", 6)]
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();

        Self {
            selector: ".project-image[data-project]".to_string(),
            attribute: "data-project".to_string(),
            image_counts,
            interval_ms: SLIDESHOW_INTERVAL_MS,
            image_dir: "foto".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl SlideshowConfig {
    /// Screenshot count for a project; unknown projects have a single image.
    pub fn image_count(&self, project: &str) -> u32 {
        self.image_counts
            .get(project)
            .copied()
            .filter(|count| *count > 0)
            .unwrap_or(1)
    }

    pub fn validate(&self) -> FolioResult<()> {
        if self.interval_ms == 0 {
            return Err(FolioError::InvalidInterval);
        }
        Ok(())
    }
}

/// Contact form field ids and the mail target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_id: String,
    pub recipient: String,
    pub name_field: String,
    pub email_field: String,
    pub subject_field: String,
    pub message_field: String,
    /// Notice shown once the mail client has been invoked
    pub notice: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_id: "contactForm".to_string(),
            recipient: "silmiyushini1919@gmail.com".to_string(),
            name_field: "name".to_string(),
            email_field: "email".to_string(),
            subject_field: "subject".to_string(),
            message_field: "message".to_string(),
            notice: "Opening your email client...".to_string(),
        }
    }
}
