use gloo_events::EventListener;
use log::debug;
use web_sys::{Document, Element, Window};

use crate::config::HeaderConfig;
use crate::dom::{self, ClassTarget};
use crate::error::Result;

pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Marks `header` according to the current scroll offset.
pub fn apply_scroll<T: ClassTarget>(header: &T, config: &HeaderConfig, offset: f64) {
    header.set_class(&config.scrolled_class, is_scrolled(offset, config.threshold));
}

pub struct StickyHeader {
    _scroll: EventListener,
}

impl StickyHeader {
    pub fn attach(window: &Window, document: &Document, config: &HeaderConfig) -> Result<Self> {
        let header: Element = dom::query(document, &config.selector)?;

        let sync = {
            let window = window.clone();
            let config = config.clone();
            move || {
                let offset = window.scroll_y().unwrap_or(0.0);
                apply_scroll(&header, &config, offset);
            }
        };

        // Initial check
        sync();

        let scroll = EventListener::new(window, "scroll", move |_| sync());
        debug!("Sticky header attached to {}", config.selector);

        Ok(Self { _scroll: scroll })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::testing::FakeNode;

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_scrolled(0.0, 50.0));
        assert!(!is_scrolled(50.0, 50.0));
        assert!(is_scrolled(50.5, 50.0));
        assert!(is_scrolled(4000.0, 50.0));
    }

    #[test]
    fn marker_follows_offset_both_ways() {
        let config = HeaderConfig::default();
        let header = FakeNode::default();

        apply_scroll(&header, &config, 120.0);
        assert!(header.has_class("scrolled"));

        apply_scroll(&header, &config, 120.0);
        assert!(header.has_class("scrolled"));

        apply_scroll(&header, &config, 10.0);
        assert!(!header.has_class("scrolled"));
    }

    #[test]
    fn leaves_unrelated_classes_alone() {
        let config = HeaderConfig::default();
        let header = FakeNode::with_classes(&["site-header"]);

        apply_scroll(&header, &config, 51.0);
        apply_scroll(&header, &config, 0.0);
        assert!(header.has_class("site-header"));
    }
}
