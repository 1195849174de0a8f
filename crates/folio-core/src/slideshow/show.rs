//! Rotation state of a single slideshow

/// Screenshot rotation for one project
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slideshow {
    project: String,
    count: u32,
    /// 1-based index of the screenshot on display
    index: u32,
}

impl Slideshow {
    /// Start at the first screenshot. A count of zero is treated as one.
    pub fn new(project: impl Into<String>, count: u32) -> Self {
        Self {
            project: project.into(),
            count: count.max(1),
            index: 1,
        }
    }

    /// Move to the next screenshot, wrapping after the last one.
    pub fn advance(&mut self) -> u32 {
        self.index = (self.index % self.count) + 1;
        self.index
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Relative path of the current screenshot, e.g. `foto/papais (3).png`.
    pub fn image_path(&self, dir: &str, extension: &str) -> String {
        format!("{}/{} ({}).{}", dir, self.project, self.index, extension)
    }

    /// CSS `background-image` value for the current screenshot.
    pub fn css_background(&self, dir: &str, extension: &str) -> String {
        format!("url('{}')", self.image_path(dir, extension))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// After k ticks the index is (k mod count) + 1
        #[test]
        fn index_after_k_ticks(count in 1u32..16, ticks in 0u32..200) {
            let mut show = Slideshow::new("p", count);
            for _ in 0..ticks {
                show.advance();
            }
            prop_assert_eq!(show.index(), (ticks % count) + 1);
        }

        /// The index never leaves [1, count]
        #[test]
        fn index_in_range(count in 0u32..16, ticks in 0u32..64) {
            let mut show = Slideshow::new("p", count);
            for _ in 0..ticks {
                let index = show.advance();
                prop_assert!(index >= 1 && index <= show.count());
            }
        }
    }
}
