//! Scroll-linked page chrome: auto-hiding header, back-to-top button and the
//! hero parallax.

/// Scroll depth after which scrolling down hides the header.
pub const HEADER_HIDE_AFTER_PX: f32 = 100.0;
/// Scroll depth after which the back-to-top button shows.
pub const BACK_TO_TOP_AFTER_PX: f32 = 300.0;
pub const PARALLAX_RATE: f32 = -0.5;

#[derive(Debug, Default, Clone)]
pub struct ScrollChrome {
    last_scroll_top: f32,
    header_hidden: bool,
    back_to_top_visible: bool,
}

impl ScrollChrome {
    pub fn on_scroll(&mut self, scroll_top: f32) {
        self.header_hidden = scroll_top > self.last_scroll_top && scroll_top > HEADER_HIDE_AFTER_PX;
        self.back_to_top_visible = scroll_top > BACK_TO_TOP_AFTER_PX;
        // overscroll on touch devices reports negative offsets
        self.last_scroll_top = scroll_top.max(0.0);
    }

    pub fn header_hidden(&self) -> bool {
        self.header_hidden
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top_visible
    }
}

/// Vertical hero offset for the current scroll, or `None` once the hero has
/// scrolled out and its transform should be left as is.
pub fn parallax_offset(scroll_top: f32, hero_height: f32) -> Option<f32> {
    (scroll_top < hero_height).then_some(scroll_top * PARALLAX_RATE)
}

/// Hero fills the viewport below the header.
pub fn hero_min_height(viewport_height: f32, header_height: f32) -> f32 {
    (viewport_height - header_height).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_hides_only_when_scrolling_down_past_threshold() {
        let mut c = ScrollChrome::default();
        c.on_scroll(80.0);
        assert!(!c.header_hidden());
        c.on_scroll(150.0);
        assert!(c.header_hidden());
        c.on_scroll(140.0);
        assert!(!c.header_hidden());
    }

    #[test]
    fn back_to_top_threshold() {
        let mut c = ScrollChrome::default();
        c.on_scroll(300.0);
        assert!(!c.back_to_top_visible());
        c.on_scroll(301.0);
        assert!(c.back_to_top_visible());
    }

    #[test]
    fn negative_scroll_resets_reference() {
        let mut c = ScrollChrome::default();
        c.on_scroll(-40.0);
        c.on_scroll(120.0);
        assert!(c.header_hidden());
    }

    #[test]
    fn parallax_and_hero() {
        assert_eq!(parallax_offset(200.0, 600.0), Some(-100.0));
        assert_eq!(parallax_offset(700.0, 600.0), None);
        assert_eq!(hero_min_height(800.0, 72.0), 728.0);
        assert_eq!(hero_min_height(50.0, 72.0), 0.0);
    }
}
